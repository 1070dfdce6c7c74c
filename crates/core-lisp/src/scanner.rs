//! Single-pass scanner with error recovery.
//!
//! The scanner peeks one codepoint at a time and dispatches: structural
//! single-codepoint tokens, line comments, whitespace, and the three literal
//! sub-scanners (string, number, identifier). It always consumes the whole
//! input; problems are recorded in the error log and scanning continues.
//!
//! Identifier and number accumulation stops at the reserved codepoints
//! `( ) [ ] { } ' ; space CR tab LF "` and at any control codepoint.

use tracing::debug;

use crate::{ErrorKind, ErrorLog, TextPosition, Token, TokenKind};

/// Codepoints that terminate identifier and number accumulation.
fn is_reserved(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '[' | ']' | '{' | '}' | '\'' | ';' | ' ' | '\r' | '\t' | '\n' | '"'
    )
}

fn is_control(c: char) -> bool {
    (c as u32) < 0x20
}

/// Peekable codepoint walker with position bookkeeping.
struct Cursor {
    chars: Vec<char>,
    index: usize,
    position: TextPosition,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
            position: TextPosition::start(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied()?;
        self.index += 1;
        self.position = self.position.next(c);
        Some(c)
    }
}

/// Result of scanning a source string: the token list, the error log, and
/// the final position (one past the last codepoint).
#[derive(Debug)]
pub struct Scanner {
    tokens: Vec<Token>,
    error_log: ErrorLog,
    end_position: TextPosition,
}

impl Scanner {
    pub fn scan(input: &str) -> Self {
        let mut cursor = Cursor::new(input);
        let mut tokens = Vec::new();
        let mut error_log = ErrorLog::new();

        while let Some(c) = cursor.peek() {
            let start = cursor.position;
            match c {
                '(' => structural(&mut cursor, &mut tokens, TokenKind::LeftParenthesis, start),
                ')' => structural(&mut cursor, &mut tokens, TokenKind::RightParenthesis, start),
                '[' => structural(&mut cursor, &mut tokens, TokenKind::LeftBracket, start),
                ']' => structural(&mut cursor, &mut tokens, TokenKind::RightBracket, start),
                '{' => structural(&mut cursor, &mut tokens, TokenKind::LeftBrace, start),
                '}' => structural(&mut cursor, &mut tokens, TokenKind::RightBrace, start),
                '\'' => structural(&mut cursor, &mut tokens, TokenKind::Quote, start),
                '.' => structural(&mut cursor, &mut tokens, TokenKind::Dot, start),
                ';' => {
                    // Comment: consume through the end of the line.
                    while let Some(consumed) = cursor.advance() {
                        if consumed == '\n' {
                            break;
                        }
                    }
                }
                ' ' | '\r' | '\t' | '\n' => {
                    cursor.advance();
                }
                '"' => scan_string(&mut cursor, &mut tokens, &mut error_log, start),
                c if c.is_ascii_digit() || c == '-' => {
                    scan_number(&mut cursor, &mut tokens, &mut error_log, start);
                }
                c if is_control(c) => {
                    error_log.add(ErrorKind::InvalidCodepoint, start);
                    cursor.advance();
                }
                _ => scan_identifier(&mut cursor, &mut tokens, start),
            }
        }

        debug!(
            target: "lisp.scan",
            tokens = tokens.len(),
            errors = error_log.len(),
            "scan complete"
        );
        Self {
            tokens,
            error_log,
            end_position: cursor.position,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    pub fn is_success(&self) -> bool {
        self.error_log.is_empty()
    }

    /// The position one past the last codepoint of the input.
    pub fn end_position(&self) -> TextPosition {
        self.end_position
    }

    pub fn into_parts(self) -> (Vec<Token>, ErrorLog) {
        (self.tokens, self.error_log)
    }
}

fn structural(cursor: &mut Cursor, tokens: &mut Vec<Token>, kind: TokenKind, start: TextPosition) {
    if let Some(c) = cursor.advance() {
        tokens.push(Token::new(kind, c.to_string(), start));
    }
}

/// Scan a string literal; `start` is the opening quote.
///
/// Escapes `\\ \" \n \t` decode to their characters; an unknown escape is
/// recorded at the backslash and both codepoints are dropped. A control
/// codepoint is recorded just past itself but kept in the string. EOF before
/// the closing quote is recorded at the opening quote and yields no token.
fn scan_string(
    cursor: &mut Cursor,
    tokens: &mut Vec<Token>,
    error_log: &mut ErrorLog,
    start: TextPosition,
) {
    cursor.advance();
    let mut decoded = String::new();
    loop {
        let escape_position = cursor.position;
        match cursor.advance() {
            None => {
                error_log.add(ErrorKind::ClosingDoubleQuoteMissing, start);
                return;
            }
            Some('"') => {
                tokens.push(Token::new(
                    TokenKind::StringLiteral(decoded.clone()),
                    decoded,
                    start,
                ));
                return;
            }
            Some('\\') => match cursor.advance() {
                None => {
                    error_log.add(ErrorKind::ClosingDoubleQuoteMissing, start);
                    return;
                }
                Some('\\') => decoded.push('\\'),
                Some('"') => decoded.push('"'),
                Some('n') => decoded.push('\n'),
                Some('t') => decoded.push('\t'),
                Some(_) => error_log.add(ErrorKind::InvalidEscapeSequence, escape_position),
            },
            Some(c) if is_control(c) => {
                decoded.push(c);
                error_log.add(ErrorKind::InvalidCodepoint, cursor.position);
            }
            Some(c) => decoded.push(c),
        }
    }
}

/// Scan a number literal; classification order is u64, i64, f64, first
/// success wins. A failed classification records a kind matching the shape
/// of the text and yields no token.
fn scan_number(
    cursor: &mut Cursor,
    tokens: &mut Vec<Token>,
    error_log: &mut ErrorLog,
    start: TextPosition,
) {
    let text = accumulate(cursor);
    if let Ok(value) = text.parse::<u64>() {
        tokens.push(Token::new(TokenKind::U64Literal(value), text, start));
    } else if let Ok(value) = text.parse::<i64>() {
        tokens.push(Token::new(TokenKind::I64Literal(value), text, start));
    } else if let Ok(value) = text.parse::<f64>() {
        tokens.push(Token::new(TokenKind::F64Literal(value), text, start));
    } else {
        let kind = if text.contains('.') {
            ErrorKind::InvalidF64Literal
        } else if text.starts_with('-') {
            ErrorKind::InvalidI64Literal
        } else {
            ErrorKind::InvalidU64Literal
        };
        error_log.add(kind, start);
    }
}

fn scan_identifier(cursor: &mut Cursor, tokens: &mut Vec<Token>, start: TextPosition) {
    let text = accumulate(cursor);
    tokens.push(Token::new(TokenKind::Identifier, text, start));
}

/// Consume codepoints until a reserved or control codepoint, or the end of
/// input. The terminator is left for the main loop.
fn accumulate(cursor: &mut Cursor) -> String {
    let mut text = String::new();
    while let Some(c) = cursor.peek() {
        if is_reserved(c) || is_control(c) {
            break;
        }
        cursor.advance();
        text.push(c);
    }
    text
}
