//! Coordinate rebasing: keep stored positions valid across an edit made elsewhere.
//!
//! Every per-cursor edit the replicator performs is described by one [`Edit`].
//! [`rebase`] maps any other position through that edit. It is the only place
//! where line/column shifting arithmetic lives.

use super::cursor::{Cursor, Position};

/// One primitive edit: the text in `[start, old_end)` was replaced by text
/// that now ends at `new_end`.
///
/// A pure insertion has `start == old_end`; a pure deletion has `start == new_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub start: Position,
    pub old_end: Position,
    pub new_end: Position,
}

impl Edit {
    pub fn insert(at: Position, end: Position) -> Self {
        Self {
            start: at,
            old_end: at,
            new_end: end,
        }
    }

    pub fn delete(start: Position, end: Position) -> Self {
        Self {
            start,
            old_end: end,
            new_end: start,
        }
    }

    pub fn replace(start: Position, old_end: Position, new_end: Position) -> Self {
        Self {
            start,
            old_end,
            new_end,
        }
    }

    /// True if the edit changed nothing
    pub fn is_noop(&self) -> bool {
        self.start == self.old_end && self.start == self.new_end
    }

    /// Change in line count caused by the edit
    pub fn lines_delta(&self) -> isize {
        self.new_end.line as isize - self.old_end.line as isize
    }
}

/// Which side of an edit a position sitting exactly on its start lands on.
///
/// Cursors already visited by the replicator stay in front of a later
/// cursor's insertion at the same spot; cursors still to come move past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    Before,
    #[default]
    After,
}

/// Map `pos` through `edit`.
///
/// - before the edit: unchanged
/// - inside the replaced range: clamps to the edit start
/// - at or after the replaced range: shifted so it keeps its distance from the
///   end of the edit. On the edit's last line that means a column shift (and a
///   move onto `new_end`'s line); on later lines only the line index moves.
pub fn rebase(pos: Position, edit: &Edit) -> Position {
    rebase_biased(pos, edit, Bias::After)
}

/// [`rebase`], with `bias` deciding where a position on the edit start goes
pub fn rebase_biased(pos: Position, edit: &Edit, bias: Bias) -> Position {
    if pos < edit.start || (bias == Bias::Before && pos == edit.start) {
        return pos;
    }
    if pos < edit.old_end {
        return edit.start;
    }
    if pos.line == edit.old_end.line {
        Position::new(
            edit.new_end.line,
            edit.new_end.column + (pos.column - edit.old_end.column),
        )
    } else {
        Position::new(pos.line - edit.old_end.line + edit.new_end.line, pos.column)
    }
}

impl Edit {
    /// True if the edit removed text
    pub fn removes_text(&self) -> bool {
        self.start < self.old_end
    }

    /// True if everything in `[first, last]` was removed by the edit.
    ///
    /// A range may end on `old_end` (half-open selections do); a lone
    /// position on `old_end` survives, it sits just after the removed text.
    pub fn swallows(&self, first: Position, last: Position) -> bool {
        self.removes_text()
            && self.start <= first
            && first < self.old_end
            && last <= self.old_end
    }
}

impl Cursor {
    /// Rebase the cursor head and its anchor through `edit`.
    ///
    /// Returns true if the edit removed everything the cursor covered.
    pub fn rebase(&mut self, edit: &Edit, bias: Bias) -> bool {
        let swallowed = edit.swallows(self.range_start(), self.range_end());
        let pos = rebase_biased(self.to_position(), edit, bias);
        if pos != self.to_position() {
            tracing::trace!(
                id = self.id.0,
                from = ?self.to_position(),
                to = ?pos,
                swallowed,
                "rebased cursor"
            );
            self.set_position(pos);
        }
        if let Some(anchor) = self.anchor {
            self.anchor = Some(rebase_biased(anchor, edit, bias));
        }
        swallowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::CursorId;

    fn p(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn test_position_before_edit_is_unchanged() {
        let edit = Edit::insert(p(1, 4), p(1, 7));
        assert_eq!(rebase(p(1, 3), &edit), p(1, 3));
        assert_eq!(rebase(p(0, 10), &edit), p(0, 10));
    }

    #[test]
    fn test_insert_shifts_same_line_at_or_after() {
        let edit = Edit::insert(p(1, 4), p(1, 7));
        assert_eq!(rebase(p(1, 4), &edit), p(1, 7));
        assert_eq!(rebase(p(1, 9), &edit), p(1, 12));
        // Later lines untouched by a same-line insert
        assert_eq!(rebase(p(2, 1), &edit), p(2, 1));
    }

    #[test]
    fn test_newline_insert_moves_tail_to_new_line() {
        // "hello world" -> split at column 5
        let edit = Edit::insert(p(0, 5), p(1, 0));
        assert_eq!(rebase(p(0, 6), &edit), p(1, 1));
        assert_eq!(rebase(p(0, 5), &edit), p(1, 0));
        assert_eq!(rebase(p(0, 2), &edit), p(0, 2));
        assert_eq!(rebase(p(3, 2), &edit), p(4, 2));
    }

    #[test]
    fn test_delete_clamps_inside_and_shifts_after() {
        let edit = Edit::delete(p(0, 2), p(0, 5));
        assert_eq!(rebase(p(0, 3), &edit), p(0, 2));
        assert_eq!(rebase(p(0, 5), &edit), p(0, 2));
        assert_eq!(rebase(p(0, 8), &edit), p(0, 5));
        assert_eq!(rebase(p(0, 1), &edit), p(0, 1));
    }

    #[test]
    fn test_line_join_remaps_tail_line() {
        // Join line 0 ("abc") with line 1 by deleting the newline
        let edit = Edit::delete(p(0, 3), p(1, 0));
        assert_eq!(rebase(p(1, 0), &edit), p(0, 3));
        assert_eq!(rebase(p(1, 4), &edit), p(0, 7));
        assert_eq!(rebase(p(2, 1), &edit), p(1, 1));
        assert_eq!(edit.lines_delta(), -1);
    }

    #[test]
    fn test_multi_line_replace() {
        // Replace lines 1..3 content with a single short line
        let edit = Edit::replace(p(1, 0), p(3, 5), p(1, 2));
        assert_eq!(rebase(p(2, 3), &edit), p(1, 0));
        assert_eq!(rebase(p(3, 7), &edit), p(1, 4));
        assert_eq!(rebase(p(6, 1), &edit), p(4, 1));
    }

    #[test]
    fn test_open_line_above_shifts_whole_line() {
        let edit = Edit::insert(p(2, 0), p(3, 0));
        assert_eq!(rebase(p(2, 0), &edit), p(3, 0));
        assert_eq!(rebase(p(2, 4), &edit), p(3, 4));
        assert_eq!(rebase(p(1, 4), &edit), p(1, 4));
    }

    #[test]
    fn test_noop_edit() {
        let edit = Edit::insert(p(1, 1), p(1, 1));
        assert!(edit.is_noop());
        assert_eq!(rebase(p(1, 1), &edit), p(1, 1));
    }

    #[test]
    fn test_cursor_rebase_moves_anchor() {
        let mut cursor = Cursor::spanning(CursorId(1), p(0, 6), p(0, 11));
        let swallowed = cursor.rebase(&Edit::delete(p(0, 0), p(0, 5)), Bias::After);
        assert!(!swallowed);
        assert_eq!(cursor.to_position(), p(0, 6));
        assert_eq!(cursor.anchor, Some(p(0, 1)));
    }

    #[test]
    fn test_bias_decides_side_of_insertion_point() {
        let edit = Edit::insert(p(0, 3), p(0, 5));
        assert_eq!(rebase_biased(p(0, 3), &edit, Bias::Before), p(0, 3));
        assert_eq!(rebase_biased(p(0, 3), &edit, Bias::After), p(0, 5));
        // Only the exact start is affected
        assert_eq!(rebase_biased(p(0, 4), &edit, Bias::Before), p(0, 6));
    }

    #[test]
    fn test_adjacent_selection_is_not_swallowed() {
        // "hellohello": deleting the first match must leave the second intact
        let edit = Edit::delete(p(0, 0), p(0, 5));
        let mut cursor = Cursor::spanning(CursorId(2), p(0, 5), p(0, 10));
        assert!(!cursor.rebase(&edit, Bias::After));
        assert_eq!(cursor.range_start(), p(0, 0));
        assert_eq!(cursor.range_end(), p(0, 5));
    }

    #[test]
    fn test_cursor_inside_deleted_range_is_swallowed() {
        let edit = Edit::delete(p(0, 0), p(0, 2));
        let mut cursor = Cursor::new(CursorId(2), 0, 1);
        assert!(cursor.rebase(&edit, Bias::After));
        assert_eq!(cursor.to_position(), p(0, 0));

        // Just past the deleted text survives
        let mut cursor = Cursor::new(CursorId(3), 0, 2);
        assert!(!cursor.rebase(&edit, Bias::After));
    }

    #[test]
    fn test_selection_inside_deleted_lines_is_swallowed() {
        // Whole first line removed, newline included
        let edit = Edit::delete(p(0, 0), p(1, 0));
        let mut cursor = Cursor::spanning(CursorId(2), p(0, 6), p(0, 11));
        assert!(cursor.rebase(&edit, Bias::After));

        // A selection reaching past the deleted text is only trimmed
        let mut cursor = Cursor::spanning(CursorId(3), p(0, 6), p(1, 2));
        assert!(!cursor.rebase(&edit, Bias::After));
        assert_eq!(cursor.range_start(), p(0, 0));
        assert_eq!(cursor.range_end(), p(0, 2));
    }

    #[test]
    fn test_insertion_swallows_nothing() {
        let edit = Edit::insert(p(0, 2), p(0, 4));
        assert!(!edit.removes_text());
        assert!(!edit.swallows(p(0, 2), p(0, 2)));
    }
}
