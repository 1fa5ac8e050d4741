//! Selection types: the range a visual-mode cursor covers.

use serde::Serialize;

use super::buffer::Buffer;
use super::cursor::{Cursor, Position};

/// The type of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisualKind {
    /// Character-wise selection (v).
    CharWise,
    /// Line-wise selection (V).
    LineWise,
}

/// A text selection with anchor (start point) and head (cursor position).
/// The anchor stays fixed while the head moves during selection extension.
///
/// Char-wise selections are half-open: `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: Position,
    /// Where the cursor is (moving point)
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor with no selection)
    pub fn collapsed(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Selection of a visual-mode cursor, None if it has no anchor
    pub fn of_cursor(cursor: &Cursor) -> Option<Self> {
        cursor
            .anchor
            .map(|anchor| Self::new(anchor, cursor.to_position()))
    }

    /// Check if selection is empty (anchor == head)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the start position (minimum of anchor and head)
    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// Get the end position (maximum of anchor and head)
    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// Check if selection is reversed (head before anchor)
    pub fn is_reversed(&self) -> bool {
        self.head < self.anchor
    }

    /// Check if a position is within this selection
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start() && pos < self.end()
    }

    /// The buffer range this selection covers in the given visual kind.
    ///
    /// Line-wise selections cover whole lines, from the start of the first
    /// line to the end of the last (newline of the last line excluded).
    pub fn range(&self, kind: VisualKind, buffer: &Buffer) -> (Position, Position) {
        let start = buffer.clamp(self.start());
        let end = buffer.clamp(self.end());
        match kind {
            VisualKind::CharWise => (start, end),
            VisualKind::LineWise => (
                Position::new(start.line, 0),
                Position::new(end.line, buffer.line_length(end.line)),
            ),
        }
    }

    /// Text covered by the selection
    pub fn text(&self, kind: VisualKind, buffer: &Buffer) -> String {
        let (start, end) = self.range(kind, buffer);
        buffer.slice(buffer.position_to_offset(start)..buffer.position_to_offset(end))
    }
}

impl Cursor {
    /// Leave visual mode: the anchor goes and a forward char-wise selection
    /// leaves the head on its last selected character, as vim does.
    pub fn drop_selection(&mut self, kind: VisualKind) {
        if let Some(anchor) = self.anchor.take() {
            if kind == VisualKind::CharWise && anchor < self.to_position() && self.column > 0 {
                self.column -= 1;
            }
        }
    }
}
