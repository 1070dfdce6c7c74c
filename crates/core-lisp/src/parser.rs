//! Stack-driven single-pass parser.
//!
//! The parser walks the token stream once, keeping a stack of unclosed
//! opening brackets. Each stack entry also remembers the expression that was
//! the current parent when the bracket opened; the first identifier inside a
//! bracket becomes a function-call head and the new current parent.
//!
//! Recovery rules, deliberately preserved from the observed behavior:
//! * a mismatched closer is reported but does not pop its opener, so a
//!   later correct closer still matches;
//! * a literal in head position is reported and dropped, the block stays
//!   open;
//! * at end of input every unclosed opener is reported once, outermost
//!   first, at the opener's own position.

use tracing::debug;

use crate::{ErrorKind, ErrorLog, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    FunctionCall,
    Identifier,
    StringLiteral,
    U64Literal,
    I64Literal,
    F64Literal,
}

/// One node of the expression forest. Only `FunctionCall` nodes have
/// children; the token is the one that produced the node (a function-call
/// node keeps its head identifier token).
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
    children: Vec<Expr>,
}

impl Expr {
    pub fn children(&self) -> &[Expr] {
        &self.children
    }

    pub fn child(&self, n: usize) -> Option<&Expr> {
        self.children.get(n)
    }
}

/// The parser output forest, in source order.
pub type SyntaxTreeList = Vec<Expr>;

/// Arena node; children are indices so a node can keep growing after it has
/// been attached to its parent.
struct Node {
    kind: ExprKind,
    token: Token,
    children: Vec<usize>,
}

/// One unclosed bracket: its token, the parent in force when it opened, and
/// whether anything has appeared inside it yet.
struct OpenBlock {
    token: Token,
    saved_parent: Option<usize>,
    has_content: bool,
}

#[derive(Debug)]
pub struct Parser {
    trees: SyntaxTreeList,
    error_log: ErrorLog,
}

impl Parser {
    pub fn parse(tokens: &[Token]) -> Self {
        let mut nodes: Vec<Node> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();
        let mut stack: Vec<OpenBlock> = Vec::new();
        let mut current_parent: Option<usize> = None;
        let mut error_log = ErrorLog::new();

        for token in tokens {
            match &token.kind {
                kind if kind.is_opener() => {
                    if let Some(top) = stack.last_mut() {
                        top.has_content = true;
                    }
                    stack.push(OpenBlock {
                        token: token.clone(),
                        saved_parent: current_parent,
                        has_content: false,
                    });
                    current_parent = None;
                }
                kind if kind.is_closer() => {
                    let Some(top) = stack.last() else {
                        error_log.add(ErrorKind::MatchingLeftParenthesisMissing, token.position);
                        continue;
                    };
                    if let Some(mismatch) = mismatch_kind(&top.token.kind, kind) {
                        // Report but keep the opener; a later correct closer
                        // still matches it.
                        error_log.add(mismatch, token.position);
                    } else if let Some(block) = stack.pop() {
                        if !block.has_content {
                            error_log.add(ErrorKind::EmptyParenthesisBlock, token.position);
                        }
                        current_parent = block.saved_parent;
                    }
                }
                TokenKind::Quote | TokenKind::Dot => {
                    // Scanned but not yet part of the grammar.
                }
                TokenKind::Identifier => {
                    if let Some(top) = stack.last_mut() {
                        top.has_content = true;
                    }
                    if let Some(parent) = current_parent {
                        let leaf = push_node(&mut nodes, ExprKind::Identifier, token);
                        nodes[parent].children.push(leaf);
                    } else if let Some(top) = stack.last() {
                        // Head position: this identifier names the call and
                        // becomes the parent for the rest of the block.
                        let head = push_node(&mut nodes, ExprKind::FunctionCall, token);
                        match top.saved_parent {
                            Some(enclosing) => nodes[enclosing].children.push(head),
                            None => roots.push(head),
                        }
                        current_parent = Some(head);
                    } else {
                        let leaf = push_node(&mut nodes, ExprKind::Identifier, token);
                        roots.push(leaf);
                    }
                }
                TokenKind::StringLiteral(_)
                | TokenKind::U64Literal(_)
                | TokenKind::I64Literal(_)
                | TokenKind::F64Literal(_) => {
                    if let Some(top) = stack.last_mut() {
                        top.has_content = true;
                    }
                    if let Some(parent) = current_parent {
                        let leaf = push_node(&mut nodes, literal_kind(&token.kind), token);
                        nodes[parent].children.push(leaf);
                    } else if !stack.is_empty() {
                        error_log.add(ErrorKind::FunctionCallExpected, token.position);
                    } else {
                        let leaf = push_node(&mut nodes, literal_kind(&token.kind), token);
                        roots.push(leaf);
                    }
                }
                _ => {}
            }
        }

        // Unclosed openers, outermost first.
        for block in &stack {
            error_log.add(
                ErrorKind::MatchingRightParenthesisMissing,
                block.token.position,
            );
        }

        let trees: SyntaxTreeList = roots.iter().map(|&root| reify(&nodes, root)).collect();
        debug!(
            target: "lisp.parse",
            trees = trees.len(),
            errors = error_log.len(),
            "parse complete"
        );
        Self { trees, error_log }
    }

    pub fn syntax_trees(&self) -> &[Expr] {
        &self.trees
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    pub fn is_success(&self) -> bool {
        self.error_log.is_empty()
    }

    pub fn into_parts(self) -> (SyntaxTreeList, ErrorLog) {
        (self.trees, self.error_log)
    }
}

fn push_node(nodes: &mut Vec<Node>, kind: ExprKind, token: &Token) -> usize {
    nodes.push(Node {
        kind,
        token: token.clone(),
        children: Vec::new(),
    });
    nodes.len() - 1
}

fn literal_kind(kind: &TokenKind) -> ExprKind {
    match kind {
        TokenKind::StringLiteral(_) => ExprKind::StringLiteral,
        TokenKind::U64Literal(_) => ExprKind::U64Literal,
        TokenKind::I64Literal(_) => ExprKind::I64Literal,
        _ => ExprKind::F64Literal,
    }
}

/// The specific diagnostic for a closer that does not match the innermost
/// opener, or `None` when the pair matches.
fn mismatch_kind(opener: &TokenKind, closer: &TokenKind) -> Option<ErrorKind> {
    match (opener, closer) {
        (TokenKind::LeftParenthesis, TokenKind::RightBracket) => {
            Some(ErrorKind::LeftParenthesisWithRightBracket)
        }
        (TokenKind::LeftParenthesis, TokenKind::RightBrace) => {
            Some(ErrorKind::LeftParenthesisWithRightBrace)
        }
        (TokenKind::LeftBracket, TokenKind::RightParenthesis) => {
            Some(ErrorKind::LeftBracketWithRightParenthesis)
        }
        (TokenKind::LeftBracket, TokenKind::RightBrace) => {
            Some(ErrorKind::LeftBracketWithRightBrace)
        }
        (TokenKind::LeftBrace, TokenKind::RightParenthesis) => {
            Some(ErrorKind::LeftBraceWithRightParenthesis)
        }
        (TokenKind::LeftBrace, TokenKind::RightBracket) => {
            Some(ErrorKind::LeftBraceWithRightBracket)
        }
        _ => None,
    }
}

fn reify(nodes: &[Node], index: usize) -> Expr {
    let node = &nodes[index];
    Expr {
        kind: node.kind,
        token: node.token.clone(),
        children: node
            .children
            .iter()
            .map(|&child| reify(nodes, child))
            .collect(),
    }
}
