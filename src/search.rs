//! Occurrence search used by add-next and find-all.
//!
//! The engine only depends on the [`MatchLocator`] trait. [`LiteralLocator`]
//! is the built-in implementation: plain substring search over the buffer
//! text, optionally case-insensitive and optionally restricted to whole words.

use serde::Serialize;

use crate::editable::{Buffer, Position};
use crate::util::{is_word_char, word_range_at};

/// A located occurrence, `[start, end)` in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MatchSpan {
    pub start: Position,
    pub end: Position,
}

impl MatchSpan {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the two spans share at least one character
    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub text: String,
    /// Only match occurrences bounded by non-word characters
    pub whole_word: bool,
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            whole_word: false,
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            whole_word: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::literal(text)
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Pattern::literal(text)
    }
}

/// Finds occurrences of a pattern in a buffer.
///
/// Implementations return spans in ascending order. Spans may overlap; the
/// cursor set applies its own overlap policy.
pub trait MatchLocator {
    fn locate(&self, buffer: &Buffer, pattern: &Pattern) -> Vec<MatchSpan>;
}

/// Literal substring search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralLocator {
    pub case_sensitive: bool,
}

impl LiteralLocator {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    fn chars_equal(&self, a: char, b: char) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a == b || a.to_lowercase().eq(b.to_lowercase())
        }
    }

    /// Char offsets of every occurrence, overlapping ones included
    fn find_offsets(&self, haystack: &[char], pattern: &Pattern) -> Vec<(usize, usize)> {
        let needle: Vec<char> = pattern.text.chars().collect();
        if needle.is_empty() || needle.len() > haystack.len() {
            return Vec::new();
        }

        let mut results = Vec::new();
        for start in 0..=haystack.len() - needle.len() {
            let end = start + needle.len();
            let matched = haystack[start..end]
                .iter()
                .zip(&needle)
                .all(|(&h, &n)| self.chars_equal(h, n));
            if !matched {
                continue;
            }
            if pattern.whole_word {
                let before_ok = start == 0 || !is_word_char(haystack[start - 1]);
                let after_ok = end == haystack.len() || !is_word_char(haystack[end]);
                if !(before_ok && after_ok) {
                    continue;
                }
            }
            results.push((start, end));
        }
        results
    }
}

impl Default for LiteralLocator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MatchLocator for LiteralLocator {
    fn locate(&self, buffer: &Buffer, pattern: &Pattern) -> Vec<MatchSpan> {
        let haystack: Vec<char> = buffer.rope().chars().collect();
        let spans: Vec<MatchSpan> = self
            .find_offsets(&haystack, pattern)
            .into_iter()
            .map(|(start, end)| {
                MatchSpan::new(buffer.offset_to_position(start), buffer.offset_to_position(end))
            })
            .collect();
        tracing::debug!(pattern = %pattern.text, matches = spans.len(), "located occurrences");
        spans
    }
}

/// Drop spans overlapping an earlier kept span (leftmost wins).
pub fn non_overlapping(spans: Vec<MatchSpan>) -> Vec<MatchSpan> {
    let mut kept: Vec<MatchSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.is_empty() {
            continue;
        }
        if kept.last().map_or(true, |last| span.start >= last.end) {
            kept.push(span);
        }
    }
    kept
}

/// The word under (or right after) `pos` on its line, with its span
pub fn word_at(buffer: &Buffer, pos: Position) -> Option<(String, MatchSpan)> {
    let line = buffer.line_at(pos.line)?;
    let range = word_range_at(&line, pos.column)?;
    let word: String = line
        .chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect();
    Some((
        word,
        MatchSpan::new(
            Position::new(pos.line, range.start),
            Position::new(pos.line, range.end),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str, pattern: Pattern, case_sensitive: bool) -> Vec<MatchSpan> {
        LiteralLocator::new(case_sensitive).locate(&Buffer::from_text(text), &pattern)
    }

    fn span(l1: usize, c1: usize, l2: usize, c2: usize) -> MatchSpan {
        MatchSpan::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    #[test]
    fn test_locate_across_lines() {
        let found = spans("hello\nsay hello", "hello".into(), true);
        assert_eq!(found, vec![span(0, 0, 0, 5), span(1, 4, 1, 9)]);
    }

    #[test]
    fn test_locate_empty_pattern() {
        assert!(spans("hello", "".into(), true).is_empty());
    }

    #[test]
    fn test_locate_case_insensitive() {
        let found = spans("Hello HELLO hello", "hello".into(), false);
        assert_eq!(found.len(), 3);
        let found = spans("Hello HELLO hello", "hello".into(), true);
        assert_eq!(found, vec![span(0, 12, 0, 17)]);
    }

    #[test]
    fn test_locate_unicode_columns() {
        let found = spans("café café", "café".into(), true);
        assert_eq!(found, vec![span(0, 0, 0, 4), span(0, 5, 0, 9)]);
    }

    #[test]
    fn test_locate_spanning_newline() {
        let found = spans("ab\ncd", "b\nc".into(), true);
        assert_eq!(found, vec![span(0, 1, 1, 1)]);
    }

    #[test]
    fn test_whole_word() {
        let found = spans("foo food foo_bar (foo)", Pattern::word("foo"), true);
        assert_eq!(found, vec![span(0, 0, 0, 3), span(0, 18, 0, 21)]);
    }

    #[test]
    fn test_overlapping_then_filtered() {
        let found = spans("aaaa", "aa".into(), true);
        assert_eq!(found.len(), 3);
        let kept = non_overlapping(found);
        assert_eq!(kept, vec![span(0, 0, 0, 2), span(0, 2, 0, 4)]);
    }

    #[test]
    fn test_word_at() {
        let buffer = Buffer::from_text("let value = 1;\n   ");
        let (word, found) = word_at(&buffer, Position::new(0, 6)).unwrap();
        assert_eq!(word, "value");
        assert_eq!(found, span(0, 4, 0, 9));

        let (word, _) = word_at(&buffer, Position::new(0, 3)).unwrap();
        assert_eq!(word, "value");

        assert!(word_at(&buffer, Position::new(1, 0)).is_none());
    }
}
