//! Positional diagnostics shared by the scanner and the parser.

use std::fmt;

use thiserror::Error;

use crate::TextPosition;

/// Every way scanning or parsing can go wrong. Recovery-oriented: each of
/// these is recorded and the pass continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid codepoint")]
    InvalidCodepoint,
    #[error("invalid escape sequence")]
    InvalidEscapeSequence,
    #[error("closing double quote missing")]
    ClosingDoubleQuoteMissing,
    #[error("invalid unsigned integer literal")]
    InvalidU64Literal,
    #[error("invalid signed integer literal")]
    InvalidI64Literal,
    #[error("invalid floating point literal")]
    InvalidF64Literal,
    #[error("function call expected")]
    FunctionCallExpected,
    #[error("empty parenthesis block")]
    EmptyParenthesisBlock,
    #[error("matching left parenthesis missing")]
    MatchingLeftParenthesisMissing,
    #[error("matching right parenthesis missing")]
    MatchingRightParenthesisMissing,
    #[error("left parenthesis closed with right bracket")]
    LeftParenthesisWithRightBracket,
    #[error("left parenthesis closed with right brace")]
    LeftParenthesisWithRightBrace,
    #[error("left bracket closed with right parenthesis")]
    LeftBracketWithRightParenthesis,
    #[error("left bracket closed with right brace")]
    LeftBracketWithRightBrace,
    #[error("left brace closed with right parenthesis")]
    LeftBraceWithRightParenthesis,
    #[error("left brace closed with right bracket")]
    LeftBraceWithRightBracket,
}

/// One recorded problem: what went wrong and where. `source_name` is empty
/// for console input and carries the file name when scanning a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub position: TextPosition,
    pub source_name: String,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, position: TextPosition) -> Self {
        Self {
            kind,
            position,
            source_name: String::new(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source_name.is_empty() {
            write!(f, "error: {} at {}", self.kind, self.position)
        } else {
            write!(
                f,
                "{}: error: {} at {}",
                self.source_name, self.kind, self.position
            )
        }
    }
}

/// Append-only ordered collection of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ErrorKind, position: TextPosition) {
        self.diagnostics.push(Diagnostic::new(kind, position));
    }

    pub fn get(&self, n: usize) -> Option<&Diagnostic> {
        self.diagnostics.get(n)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_preserves_insertion_order() {
        let mut log = ErrorLog::new();
        log.add(ErrorKind::InvalidCodepoint, TextPosition::new(1, 1));
        log.add(ErrorKind::EmptyParenthesisBlock, TextPosition::new(1, 2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0).map(|d| d.kind), Some(ErrorKind::InvalidCodepoint));
        assert_eq!(
            log.get(1).map(|d| d.kind),
            Some(ErrorKind::EmptyParenthesisBlock)
        );
    }

    #[test]
    fn console_diagnostics_display_without_a_source_name() {
        let diagnostic = Diagnostic::new(ErrorKind::InvalidCodepoint, TextPosition::new(1, 4));
        assert_eq!(
            diagnostic.to_string(),
            "error: invalid codepoint at line 1, column 4"
        );
    }

    #[test]
    fn file_diagnostics_display_with_the_source_name() {
        let mut diagnostic =
            Diagnostic::new(ErrorKind::ClosingDoubleQuoteMissing, TextPosition::new(2, 1));
        diagnostic.source_name = "init.ylisp".to_string();
        assert_eq!(
            diagnostic.to_string(),
            "init.ylisp: error: closing double quote missing at line 2, column 1"
        );
    }
}
