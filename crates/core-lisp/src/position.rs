//! 1-based line/column positions over codepoints.

use std::fmt;

/// A source position. Line 1, column 1 is the first codepoint; the column
/// one past the end of a line is a valid position (where the newline, or
/// end of input, sits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position after consuming `c` at this position.
    pub fn next(self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_line_one_column_one() {
        assert_eq!(TextPosition::start(), TextPosition::new(1, 1));
    }

    #[test]
    fn ordinary_codepoints_advance_the_column() {
        let pos = TextPosition::start().next('f').next('o').next('物');
        assert_eq!(pos, TextPosition::new(1, 4));
    }

    #[test]
    fn newline_advances_the_line_and_resets_the_column() {
        let pos = TextPosition::start().next('a').next('\n');
        assert_eq!(pos, TextPosition::new(2, 1));
    }

    #[test]
    fn displays_as_line_and_column() {
        assert_eq!(TextPosition::new(3, 7).to_string(), "line 3, column 7");
    }
}
