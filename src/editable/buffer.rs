//! Line-oriented text buffer backed by `ropey::Rope`.
//!
//! The buffer is a plain store: it knows nothing about cursors. All position
//! bookkeeping after an edit is the replicator's job (see [`super::rebase`]).

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use super::cursor::Position;

/// Normalize `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Ordered sequence of text lines. Always holds at least one (possibly empty) line.
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer from file-like text.
    ///
    /// A single trailing newline is the file terminator, not an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let text = normalize_line_endings(text);
        let body = text.strip_suffix('\n').unwrap_or(&text);
        Self {
            rope: Rope::from_str(body),
        }
    }

    /// Create a buffer from individual lines (which must not contain newlines)
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let joined = lines
            .iter()
            .map(|l| l.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            rope: Rope::from_str(&normalize_line_endings(&joined)),
        }
    }

    /// Access the underlying Rope for rope-specific operations
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    /// Length of a specific line in characters (excluding newline)
    pub fn line_length(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let line_slice = self.rope.line(line);
        let len = line_slice.len_chars();
        if len > 0 && line_slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Total length in characters, newlines included
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Line content without its newline, None if out of bounds
    pub fn line_at(&self, line: usize) -> Option<Cow<'_, str>> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let line_slice = self.rope.line(line);
        let content = match line_slice.as_str() {
            Some(s) => Cow::Borrowed(s.strip_suffix('\n').unwrap_or(s)),
            None => {
                let s = line_slice.to_string();
                Cow::Owned(s.strip_suffix('\n').unwrap_or(&s).to_string())
            }
        };
        Some(content)
    }

    /// Character at position, None at or past end of line
    pub fn char_at(&self, pos: Position) -> Option<char> {
        if pos.line >= self.rope.len_lines() || pos.column >= self.line_length(pos.line) {
            return None;
        }
        Some(self.rope.char(self.rope.line_to_char(pos.line) + pos.column))
    }

    /// All lines, without newlines
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .map(|i| self.line_at(i).map(Cow::into_owned).unwrap_or_default())
            .collect()
    }

    /// Buffer content with lines joined by `\n`
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Buffer content as file text (terminated by a newline)
    pub fn to_file_text(&self) -> String {
        let mut text = self.text();
        text.push('\n');
        text
    }

    /// Convert (line, column) to char offset, clamping to the buffer
    pub fn position_to_offset(&self, pos: Position) -> usize {
        if pos.line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(pos.line) + pos.column.min(self.line_length(pos.line))
    }

    /// Convert char offset to (line, column), clamping to the buffer
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let clamped = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(clamped);
        Position::new(line, clamped - self.rope.line_to_char(line))
    }

    /// Position one past the last character of the last line
    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.line_length(last))
    }

    /// Nearest valid position (column one past end of line is valid)
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count() - 1);
        Position::new(line, pos.column.min(self.line_length(line)))
    }

    /// Column of first non-whitespace character on line
    pub fn first_non_whitespace_column(&self, line: usize) -> usize {
        self.line_at(line)
            .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
            .unwrap_or(0)
    }

    /// Get slice of text as String (by character offsets)
    pub fn slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Insert text at a position. Returns the position just past the inserted text.
    pub fn insert_at(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        let text = normalize_line_endings(text);
        let offset = self.position_to_offset(pos);
        self.rope.insert(offset, &text);
        pos.advanced_by(&text)
    }

    /// Delete `[start, end)`. Returns the removed text.
    pub fn delete_range(&mut self, start: Position, end: Position) -> String {
        let start = self.position_to_offset(start);
        let end = self.position_to_offset(end);
        self.remove_chars(start..end)
    }

    /// Break a line in two at `pos`. Returns the start of the new line.
    pub fn split_line(&mut self, pos: Position) -> Position {
        self.insert_at(pos, "\n")
    }

    /// Join `line` with the line below it. False if `line` is the last line.
    pub fn join_line(&mut self, line: usize) -> bool {
        if line + 1 >= self.line_count() {
            return false;
        }
        let newline = self.position_to_offset(Position::new(line, self.line_length(line)));
        self.rope.remove(newline..newline + 1);
        true
    }

    /// Insert text at a char offset (clamped)
    pub fn insert_chars(&mut self, offset: usize, text: &str) {
        let clamped = offset.min(self.len_chars());
        self.rope.insert(clamped, text);
    }

    /// Remove a char range (clamped). Returns the removed text.
    pub fn remove_chars(&mut self, range: Range<usize>) -> String {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        removed
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
