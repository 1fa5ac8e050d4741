//! The multi-cursor set: ordered cursors, the primary, and the add history.
//!
//! The set never touches the buffer. It is populated from match spans and
//! reshaped by the replicator, which calls [`MultiCursorSet::normalize`] once
//! a command has been applied at every cursor. While the session is in
//! insert mode it only re-sorts ([`MultiCursorSet::sort`]), so cursors that
//! came from separate matches keep typing separately even when they meet.

use crate::editable::{Buffer, Cursor, CursorId, Position};
use crate::error::EngineError;
use crate::search::{non_overlapping, MatchLocator, MatchSpan, Pattern};

/// Ordered set of cursors with one designated primary.
///
/// After every completed command: cursors are sorted by position, and outside
/// insert mode no two share a position.
#[derive(Debug, Clone, Default)]
pub struct MultiCursorSet {
    cursors: Vec<Cursor>,
    primary: Option<CursorId>,
    /// Ids in the order they were added; the top is removed first
    added: Vec<CursorId>,
    /// Pattern used by add-next/skip when none is given
    pattern: Option<Pattern>,
    next_id: u32,
}

impl MultiCursorSet {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    pub fn cursors_mut(&mut self) -> &mut [Cursor] {
        &mut self.cursors
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn primary_id(&self) -> Option<CursorId> {
        self.primary
    }

    /// The primary cursor (most recently added)
    pub fn primary(&self) -> Option<&Cursor> {
        let id = self.primary?;
        self.cursors.iter().find(|c| c.id == id)
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn set_pattern(&mut self, pattern: Option<Pattern>) {
        self.pattern = pattern;
    }

    /// Ids in add order, oldest first
    pub fn added(&self) -> &[CursorId] {
        &self.added
    }

    fn allocate_id(&mut self) -> CursorId {
        let id = CursorId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    fn is_taken(&self, span: &MatchSpan) -> bool {
        self.cursors.iter().any(|c| c.range_start() == span.start)
    }

    /// Next untaken span in circular order.
    ///
    /// With an empty set the scan starts at `from` and includes a span that
    /// contains it. Otherwise it starts just after the primary cursor.
    fn next_untaken(&self, spans: &[MatchSpan], from: Position, wrap: bool) -> Option<MatchSpan> {
        let origin = self.primary().map(|c| c.range_start());
        let after = |span: &MatchSpan| match origin {
            Some(origin) => span.start > origin,
            None => span.end > from,
        };

        let forward = spans.iter().find(|s| after(s) && !self.is_taken(s));
        if forward.is_some() || !wrap {
            return forward.copied();
        }
        spans
            .iter()
            .find(|s| !after(s) && !self.is_taken(s))
            .copied()
    }

    fn insert_sorted(&mut self, cursor: Cursor) {
        let idx = self
            .cursors
            .partition_point(|c| c.to_position() <= cursor.to_position());
        self.cursors.insert(idx, cursor);
    }

    /// Add a cursor at the next occurrence of `pattern` that has no cursor.
    ///
    /// `from` is the home cursor, used when the set is empty. With `select`
    /// the new cursor selects the match, head on its end; otherwise it sits
    /// on the match start.
    pub fn add_next<L: MatchLocator + ?Sized>(
        &mut self,
        buffer: &Buffer,
        locator: &L,
        pattern: &Pattern,
        from: Position,
        select: bool,
        wrap: bool,
    ) -> Result<CursorId, EngineError> {
        if pattern.is_empty() {
            return Err(EngineError::EmptyPattern);
        }
        if self.pattern.as_ref() != Some(pattern) {
            self.pattern = Some(pattern.clone());
        }

        let spans = non_overlapping(locator.locate(buffer, pattern));
        let span = self
            .next_untaken(&spans, from, wrap)
            .ok_or_else(|| EngineError::NoMatchFound {
                pattern: pattern.text.clone(),
            })?;

        let id = self.allocate_id();
        let cursor = if select {
            Cursor::spanning(id, span.start, span.end)
        } else {
            Cursor::at_position(id, span.start)
        };
        self.insert_sorted(cursor);
        self.primary = Some(id);
        self.added.push(id);
        tracing::debug!(id = id.0, at = ?span.start, "added cursor at next occurrence");
        Ok(id)
    }

    /// Replace the set with one selecting cursor per non-overlapping match.
    /// The last cursor becomes primary. Returns the number of cursors.
    pub fn add_all<L: MatchLocator + ?Sized>(
        &mut self,
        buffer: &Buffer,
        locator: &L,
        pattern: &Pattern,
    ) -> Result<usize, EngineError> {
        if pattern.is_empty() {
            return Err(EngineError::EmptyPattern);
        }
        let spans = non_overlapping(locator.locate(buffer, pattern));
        if spans.is_empty() {
            return Err(EngineError::NoMatchFound {
                pattern: pattern.text.clone(),
            });
        }

        self.clear();
        for span in spans {
            let id = self.allocate_id();
            self.cursors.push(Cursor::spanning(id, span.start, span.end));
            self.added.push(id);
        }
        self.primary = self.added.last().copied();
        self.pattern = Some(pattern.clone());
        tracing::debug!(count = self.cursors.len(), "selected all occurrences");
        Ok(self.cursors.len())
    }

    /// Drop the primary cursor and add the next occurrence after it instead.
    ///
    /// Fails without changing the set if there is no other occurrence.
    pub fn skip_next<L: MatchLocator + ?Sized>(
        &mut self,
        buffer: &Buffer,
        locator: &L,
        select: bool,
        wrap: bool,
    ) -> Result<CursorId, EngineError> {
        let pattern = self.pattern.clone().ok_or(EngineError::EmptyPattern)?;
        let skipped = *self.primary().ok_or(EngineError::NoMatchFound {
            pattern: pattern.text.clone(),
        })?;

        let spans = non_overlapping(locator.locate(buffer, &pattern));
        if self.next_untaken(&spans, skipped.range_start(), wrap).is_none() {
            return Err(EngineError::NoMatchFound {
                pattern: pattern.text,
            });
        }

        let id = self.add_next(
            buffer,
            locator,
            &pattern,
            skipped.range_start(),
            select,
            wrap,
        )?;
        self.remove(skipped.id);
        tracing::debug!(skipped = skipped.id.0, added = id.0, "skipped occurrence");
        Ok(id)
    }

    fn remove(&mut self, id: CursorId) -> Option<Cursor> {
        let idx = self.cursors.iter().position(|c| c.id == id)?;
        let removed = self.cursors.remove(idx);
        self.added.retain(|added| *added != id);
        if self.primary == Some(id) {
            self.primary = self
                .added
                .last()
                .copied()
                .or_else(|| self.cursors.last().map(|c| c.id));
        }
        Some(removed)
    }

    /// Remove the most recently added cursor; the previous one becomes primary.
    pub fn remove_last_added(&mut self) -> Option<Cursor> {
        let id = self
            .added
            .last()
            .copied()
            .or_else(|| self.cursors.last().map(|c| c.id))?;
        let removed = self.remove(id);
        if self.cursors.is_empty() {
            self.clear();
        }
        removed
    }

    /// Discard every cursor; returns the primary with its anchor cleared.
    pub fn collapse(&mut self) -> Option<Cursor> {
        let mut primary = self.primary().copied().or_else(|| self.cursors.last().copied())?;
        primary.clear_anchor();
        self.clear();
        Some(primary)
    }

    pub fn clear(&mut self) {
        self.cursors.clear();
        self.added.clear();
        self.primary = None;
        self.pattern = None;
    }

    /// Replace the cursors wholesale (history restore). The last id in
    /// `cursors` order becomes primary unless `primary` names a kept cursor.
    pub fn restore(&mut self, cursors: Vec<Cursor>, primary: Option<CursorId>) {
        self.next_id = cursors
            .iter()
            .map(|c| c.id.0 + 1)
            .max()
            .unwrap_or(1)
            .max(self.next_id);
        self.added = cursors.iter().map(|c| c.id).collect();
        self.cursors = cursors;
        self.primary = primary
            .filter(|id| self.cursors.iter().any(|c| c.id == *id))
            .or_else(|| self.cursors.last().map(|c| c.id));
        if let Some(primary) = self.primary {
            self.added.retain(|id| *id != primary);
            self.added.push(primary);
        }
        self.normalize();
    }

    /// Re-sort by position without merging. Ties keep their current order,
    /// which is the order they were replicated in.
    pub fn sort(&mut self) {
        self.cursors.sort_by_key(|c| c.to_position());
    }

    /// Re-sort by position and merge cursors that share a position.
    ///
    /// The first cursor at a position is kept; if a merged-away cursor was the
    /// primary, the kept one takes over. Returns the number of cursors merged.
    pub fn normalize(&mut self) -> usize {
        self.sort();

        let mut merges = Vec::new();
        for pair in self.cursors.windows(2) {
            if pair[0].to_position() == pair[1].to_position() {
                merges.push(pair[1].id);
            }
        }
        let mut merged = 0;
        for id in merges {
            if let Some(survivor) = self.survivor_for(id) {
                self.absorb(id, survivor);
                merged += 1;
            }
        }

        if merged > 0 {
            tracing::debug!(merged, remaining = self.cursors.len(), "merged coinciding cursors");
        }
        merged
    }

    /// The cursor just before `id` in order
    fn survivor_for(&self, id: CursorId) -> Option<CursorId> {
        let idx = self.cursors.iter().position(|c| c.id == id)?;
        idx.checked_sub(1).map(|prev| self.cursors[prev].id)
    }

    /// Remove `absorbed`, handing its primary status and its place in the
    /// add history to `into`. Returns false if either id is unknown.
    pub fn absorb(&mut self, absorbed: CursorId, into: CursorId) -> bool {
        if absorbed == into || !self.cursors.iter().any(|c| c.id == into) {
            return false;
        }
        let Some(idx) = self.cursors.iter().position(|c| c.id == absorbed) else {
            return false;
        };
        self.cursors.remove(idx);

        if self.primary == Some(absorbed) {
            self.primary = Some(into);
        }
        if let Some(slot) = self.added.iter().position(|id| *id == absorbed) {
            if self.added.contains(&into) {
                self.added.remove(slot);
            } else {
                self.added[slot] = into;
            }
        }
        tracing::trace!(absorbed = absorbed.0, into = into.0, "absorbed cursor");
        true
    }
}
