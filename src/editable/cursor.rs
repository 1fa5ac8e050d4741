//! Cursor and position types for the multi-cursor engine.

use serde::Serialize;

/// A position in the text buffer (line and column, both 0-indexed).
///
/// Columns count `char`s. Ordering is by line, then column, which is also
/// the order the replicator visits cursors in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Position just past `text` if it were inserted here.
    pub fn advanced_by(self, text: &str) -> Position {
        match text.rfind('\n') {
            Some(last_newline) => Position::new(
                self.line + text.matches('\n').count(),
                text[last_newline + 1..].chars().count(),
            ),
            None => Position::new(self.line, self.column + text.chars().count()),
        }
    }
}

/// Stable identity of a cursor. Survives re-sorting and rebasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CursorId(pub u32);

/// A cursor in the text buffer with an optional selection anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cursor {
    pub id: CursorId,
    pub line: usize,
    pub column: usize,
    /// Fixed end of the selection. Present iff the session is in a visual mode.
    pub anchor: Option<Position>,
    /// Desired column for vertical movement.
    /// When moving up/down through lines of varying length, this preserves
    /// the "intended" column position even when a shorter line is traversed.
    #[serde(skip)]
    pub desired_column: Option<usize>,
}

impl Cursor {
    pub const fn new(id: CursorId, line: usize, column: usize) -> Self {
        Self {
            id,
            line,
            column,
            anchor: None,
            desired_column: None,
        }
    }

    pub fn at_position(id: CursorId, pos: Position) -> Self {
        Self::new(id, pos.line, pos.column)
    }

    /// A cursor selecting `[start, end)`: the anchor sits on `start`, the head
    /// on `end`, so motions extend the selection past the match.
    pub fn spanning(id: CursorId, start: Position, end: Position) -> Self {
        Self {
            anchor: Some(start),
            ..Self::at_position(id, end)
        }
    }

    pub const fn to_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn set_position(&mut self, pos: Position) {
        self.line = pos.line;
        self.column = pos.column;
    }

    pub fn has_selection(&self) -> bool {
        self.anchor.is_some()
    }

    /// First position the cursor covers: the selection start, or the head
    pub fn range_start(&self) -> Position {
        self.anchor
            .map_or(self.to_position(), |anchor| anchor.min(self.to_position()))
    }

    /// Last position the cursor covers: the selection end, or the head
    pub fn range_end(&self) -> Position {
        self.anchor
            .map_or(self.to_position(), |anchor| anchor.max(self.to_position()))
    }

    /// Start a selection anchored at the current position (no-op if one exists)
    pub fn anchor_here(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(self.to_position());
        }
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Clear desired column (call after horizontal movement)
    pub fn clear_desired_column(&mut self) {
        self.desired_column = None;
    }

    /// Set desired column to current column (call before vertical movement)
    pub fn set_desired_column(&mut self) {
        if self.desired_column.is_none() {
            self.desired_column = Some(self.column);
        }
    }

    /// Get the effective column for positioning (uses desired_column if set)
    pub fn effective_column(&self) -> usize {
        self.desired_column.unwrap_or(self.column)
    }
}

impl From<Cursor> for Position {
    fn from(cursor: Cursor) -> Self {
        cursor.to_position()
    }
}
