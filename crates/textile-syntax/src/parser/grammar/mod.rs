//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and returns the [`Node`] it built.
//!
//! ## Module Structure
//!
//! - this module: the document root, the link rule, bracket detection and
//!   operator interiors
//! - [`inline`] - brackets, quotes, images, text runs, raw spans, inline operators
//! - [`block`] - spoilers, `[pre]` and blockquotes
//!
//! ## Staying Inside an Operator
//!
//! An operator's interior is parsed until its own `Close(op)`. Rules that
//! loop on their own (quotes) also stop at any `Close(_)`, so no rule ever
//! consumes the end of an enclosing operator.

mod block;
mod inline;

use crate::ast::Node;
use crate::parser::Parser;
use crate::token::{Op, TokenKind};

/// Parse the whole document.
pub fn root(p: &mut Parser<'_, '_>) -> Node {
    let mut nodes = Vec::new();
    while !p.at_end() {
        nodes.push(link(p));
    }
    Node::Sequence(nodes)
}

/// `quote-or-image ':' url`, or a bracketed element.
pub(super) fn link(p: &mut Parser<'_, '_>) -> Node {
    if p.at(TokenKind::LBracket) && opens_bracketed(p.nth(1)) {
        return inline::bracketed(p);
    }

    let left = inline::quote(p);

    if left.is_linkable() && p.at(TokenKind::Colon) && p.nth(1) == TokenKind::Url {
        p.bump(); // :
        let target = p.bump();
        return left.into_link(target);
    }

    left
}

/// Tokens that may start a `[...]` element: an inline operator, a quote or
/// an image.
fn opens_bracketed(kind: TokenKind) -> bool {
    match kind {
        TokenKind::Open(op) => op.is_inline(),
        TokenKind::Quote | TokenKind::Exclamation => true,
        _ => false,
    }
}

/// Consume `Open(op) ... Close(op)` and return the parsed interior.
fn operator_interior(p: &mut Parser<'_, '_>, op: Op) -> Node {
    debug_assert!(p.at(TokenKind::Open(op)));
    p.bump();

    let close = TokenKind::Close(op);
    let mut nodes = Vec::new();
    while !p.at(close) && !p.at_end() {
        nodes.push(link(p));
    }
    p.eat(close);

    Node::Sequence(nodes)
}
