//! Character classification for word motions and whole-word matching

use std::ops::Range;

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '/' | ':'
            | ','
            | '.'
            | '-'
            | '('
            | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | ';'
            | '"'
            | '\''
            | '<'
            | '>'
            | '='
            | '+'
            | '*'
            | '&'
            | '|'
            | '!'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '~'
            | '`'
            | '\\'
            | '?'
    )
}

/// Character type for word navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Alphanumeric characters (word characters)
    WordChar,
    /// Punctuation and symbols
    Punctuation,
}

/// Get the character type for word navigation
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_punctuation(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

/// Check if a character is part of a word
pub fn is_word_char(ch: char) -> bool {
    char_type(ch) == CharType::WordChar
}

/// Char range of the word under `column`, or of the next word on the line
/// if the column sits on whitespace or punctuation.
pub fn word_range_at(line: &str, column: usize) -> Option<Range<usize>> {
    let chars: Vec<char> = line.chars().collect();
    let start_search = chars
        .iter()
        .enumerate()
        .skip(column)
        .find(|(_, c)| is_word_char(**c))
        .map(|(i, _)| i)?;

    let mut start = start_search;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = start_search;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    Some(start..end)
}
