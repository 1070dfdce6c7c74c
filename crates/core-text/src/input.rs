//! Editable input line and immutable line snapshots.
//!
//! Invariants:
//! * `0 <= cursor <= len` holds after every operation.
//! * An operation that returns `false` changed nothing.
//! * Deletion is backspace-shaped: it removes the codepoint *before* the
//!   cursor and fails when the cursor sits at the start.

use std::fmt;

/// A single editable line of codepoints with a cursor.
///
/// The cursor addresses gaps, not characters: cursor `i` sits between the
/// `i`-th and `i+1`-th codepoints, so `cursor == len` means end of line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    chars: Vec<char>,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one codepoint at the cursor; the cursor ends up after it.
    pub fn add_character(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Insert a sequence of codepoints at the cursor.
    pub fn add_characters<I: IntoIterator<Item = char>>(&mut self, chars: I) {
        for c in chars {
            self.add_character(c);
        }
    }

    /// Remove the codepoint before the cursor. Fails at the start of the
    /// line, empty or not.
    pub fn delete_character(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_cursor_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_cursor_right(&mut self) -> bool {
        if self.cursor == self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn size(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl fmt::Display for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl From<&str> for TextInput {
    fn from(s: &str) -> Self {
        let chars: Vec<char> = s.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }
}

/// An immutable snapshot of a codepoint sequence.
///
/// Snapshots are what the history and the scrollback store: once taken they
/// never change, so views handed to the host stay valid across edits of the
/// live input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLine {
    chars: Vec<char>,
}

impl TextLine {
    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self {
            chars: chars.into_iter().collect(),
        }
    }

    /// Snapshot a sub-range of codepoints; used by scrollback wrapping.
    pub fn from_slice(chars: &[char]) -> Self {
        Self {
            chars: chars.to_vec(),
        }
    }

    /// Concatenate two lines, e.g. prompt + committed input.
    pub fn concat(&self, other: &TextLine) -> TextLine {
        let mut chars = self.chars.clone();
        chars.extend_from_slice(&other.chars);
        TextLine { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl fmt::Display for TextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl From<&str> for TextLine {
    fn from(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
        }
    }
}

impl From<&TextInput> for TextLine {
    fn from(input: &TextInput) -> Self {
        Self {
            chars: input.chars().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_moves_cursor_past_new_char() {
        let mut input = TextInput::new();
        input.add_character('a');
        input.add_character('b');
        assert_eq!(input.to_string(), "ab");
        assert_eq!(input.cursor_index(), 2);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut input = TextInput::from("ac");
        input.move_cursor_left();
        input.add_character('b');
        assert_eq!(input.to_string(), "abc");
        assert_eq!(input.cursor_index(), 2);
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut input = TextInput::from("abc");
        assert!(input.delete_character());
        assert_eq!(input.to_string(), "ab");
        assert_eq!(input.cursor_index(), 2);
    }

    #[test]
    fn backspace_fails_at_start_of_nonempty_input() {
        let mut input = TextInput::from("abc");
        input.move_cursor_to_start();
        assert!(!input.delete_character());
        assert_eq!(input.to_string(), "abc");
        assert_eq!(input.cursor_index(), 0);
    }

    #[test]
    fn backspace_fails_on_empty_input() {
        let mut input = TextInput::new();
        assert!(!input.delete_character());
        assert_eq!(input.size(), 0);
    }

    #[test]
    fn cursor_stops_at_both_ends() {
        let mut input = TextInput::from("hi");
        assert!(!input.move_cursor_right());
        assert!(input.move_cursor_left());
        assert!(input.move_cursor_left());
        assert!(!input.move_cursor_left());
        assert_eq!(input.cursor_index(), 0);
    }

    #[test]
    fn home_and_end_always_succeed() {
        let mut input = TextInput::from("abc");
        input.move_cursor_to_start();
        assert_eq!(input.cursor_index(), 0);
        input.move_cursor_to_end();
        assert_eq!(input.cursor_index(), 3);
    }

    #[test]
    fn clear_resets_text_and_cursor() {
        let mut input = TextInput::from("abc");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor_index(), 0);
    }

    #[test]
    fn multibyte_codepoints_count_as_one() {
        let mut input = TextInput::from("aä物");
        assert_eq!(input.size(), 3);
        assert!(input.delete_character());
        assert_eq!(input.to_string(), "aä");
    }

    #[test]
    fn line_concat_joins_codepoints() {
        let prompt = TextLine::from("$ ");
        let body = TextLine::from("ls");
        let joined = prompt.concat(&body);
        assert_eq!(joined.to_string(), "$ ls");
        assert_eq!(joined.len(), 4);
    }

    #[test]
    fn line_snapshot_is_detached_from_input() {
        let mut input = TextInput::from("abc");
        let line = TextLine::from(&input);
        input.add_character('d');
        assert_eq!(line.to_string(), "abc");
    }
}
