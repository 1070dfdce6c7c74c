//! YliLisp surface syntax: scanner, parser, positional diagnostics.
//!
//! YliLisp is the S-expression-shaped command language behind the console.
//! This crate covers scanning a source string into tokens and parsing the
//! tokens into an expression forest; evaluation belongs to whoever registers
//! the commands.
//!
//! Error handling is recovery-oriented: both passes consume their whole
//! input, appending [`Diagnostic`]s to an [`ErrorLog`] instead of stopping
//! at the first problem. Positions are 1-based line/column over codepoints,
//! never bytes.

mod error;
mod parser;
mod position;
mod scanner;
mod token;

pub use error::{Diagnostic, ErrorKind, ErrorLog};
pub use parser::{Expr, ExprKind, Parser, SyntaxTreeList};
pub use position::TextPosition;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
