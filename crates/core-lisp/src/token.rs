//! Lexical tokens.

use crate::TextPosition;

/// Token kinds. Literal kinds carry the parsed payload; the raw lexeme is
/// kept on the [`Token`] either way.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParenthesis,
    RightParenthesis,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Quote,
    Dot,
    Identifier,
    /// Payload is the decoded string, escapes already applied.
    StringLiteral(String),
    U64Literal(u64),
    I64Literal(i64),
    F64Literal(f64),
}

impl TokenKind {
    pub fn is_opener(&self) -> bool {
        matches!(
            self,
            Self::LeftParenthesis | Self::LeftBracket | Self::LeftBrace
        )
    }

    pub fn is_closer(&self) -> bool {
        matches!(
            self,
            Self::RightParenthesis | Self::RightBracket | Self::RightBrace
        )
    }
}

/// One lexical unit: kind, raw lexeme, start position.
///
/// Equality compares kind and lexeme only; the position is bookkeeping for
/// diagnostics, not identity.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: TextPosition,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: TextPosition) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}
