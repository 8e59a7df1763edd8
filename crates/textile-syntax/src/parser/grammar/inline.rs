//! # Inline-Level Grammar
//!
//! Quotes, images and the terminal rule. The terminal rule dispatches on the
//! current token:
//!
//! | Token | Element |
//! |-------|---------|
//! | word, space, newline, paragraph | text run |
//! | `Open(Raw)` | raw span, emitted verbatim |
//! | `Open(Spoiler)`, `Open(Pre)`, `Open(Blockquote)` | see [`super::block`] |
//! | other `Open(op)` | `<tag>` from [`Op::html_tag`] |
//! | anything else | the token's own text, literally |
//!
//! ## Brackets
//!
//! `[*bold*]`, `["text":url]` and `[!image!]` apply markup in the middle of a
//! word: the brackets are dropped when they hug exactly one operator, link or
//! image. Otherwise `[` is literal.
//!
//! ## Degrading to Text
//!
//! - An unclosed `"` renders as a literal quote followed by its contents
//! - `!` without a URL is a literal `!`
//! - `!url` without the closing `!` renders as the consumed text

use super::{block, link, operator_interior};
use crate::ast::{Node, escape};
use crate::parser::Parser;
use crate::token::{Op, TokenKind};

/// `'[' link ']'`
pub(super) fn bracketed(p: &mut Parser<'_, '_>) -> Node {
    let open = p.bump();
    let inner = link(p);

    if inner.is_bracketable() && p.eat(TokenKind::RBracket) {
        inner
    } else {
        Node::Sequence(vec![Node::text(open), inner])
    }
}

/// `'"' image* '"'`
pub(super) fn quote(p: &mut Parser<'_, '_>) -> Node {
    if !p.at(TokenKind::Quote) {
        return image(p);
    }
    let open = p.bump();

    let mut children = Vec::new();
    while !p.at(TokenKind::Quote) && !p.at_end() && !p.current().is_close() {
        children.push(image(p));
    }

    if p.eat(TokenKind::Quote) {
        Node::Quote(Box::new(Node::Sequence(children)))
    } else {
        children.insert(0, Node::text(open));
        Node::Sequence(children)
    }
}

/// `'!' url [title ')'] '!'`
///
/// The URL token swallows an opening `(title` because a URL may contain `(`
/// but not end with `)`. Title words up to the `)` are collected here.
fn image(p: &mut Parser<'_, '_>) -> Node {
    if !p.at(TokenKind::Exclamation) {
        return terminal(p);
    }
    if p.nth(1) != TokenKind::Url {
        return Node::text(p.bump());
    }

    let mut consumed = String::from(p.bump()); // !
    let url = p.bump();
    consumed.push_str(url);

    if url.contains('(') {
        while matches!(p.current(), TokenKind::Word | TokenKind::Space) {
            consumed.push_str(p.bump());
        }
    }
    if p.at(TokenKind::RParen) {
        consumed.push_str(p.bump());
    }

    if p.eat(TokenKind::Exclamation) {
        Node::Image {
            target: consumed[1..].to_owned(),
        }
    } else {
        Node::Text(consumed)
    }
}

/// Text runs, operators, raw spans, and the literal fallback.
fn terminal(p: &mut Parser<'_, '_>) -> Node {
    match p.current() {
        kind if kind.is_plain() => text_run(p),
        TokenKind::Open(Op::Raw) => raw_span(p),
        TokenKind::Open(op @ (Op::Spoiler | Op::Pre | Op::Blockquote | Op::AuthoredBlockquote)) => {
            block::block(p, op)
        }
        TokenKind::Open(op) => Node::operator(op, operator_interior(p, op)),
        _ => Node::text(p.bump()),
    }
}

/// Consecutive words and whitespace as one text node.
///
/// With a substitution hook the run is escaped, handed to the hook, and kept
/// as raw text so it is not escaped a second time.
fn text_run(p: &mut Parser<'_, '_>) -> Node {
    let mut run = String::new();
    while p.current().is_plain() {
        run.push_str(p.bump());
    }

    match p.substitution() {
        Some(substitute) => Node::RawText(substitute(&escape(&run))),
        None => Node::Text(run),
    }
}

/// `Open(Raw) ... Close(Raw)`, copied verbatim.
///
/// Interior tokens may already be relabelled (including nested raw pairs);
/// only their text matters here.
fn raw_span(p: &mut Parser<'_, '_>) -> Node {
    debug_assert!(p.at(TokenKind::Open(Op::Raw)));
    p.bump();

    let mut raw = String::new();
    let mut depth = 0usize;
    while !p.at_end() {
        match p.current() {
            TokenKind::Close(Op::Raw) if depth == 0 => break,
            TokenKind::Close(Op::Raw) => depth -= 1,
            TokenKind::Open(Op::Raw) => depth += 1,
            _ => {}
        }
        raw.push_str(p.bump());
    }
    p.eat(TokenKind::Close(Op::Raw));

    Node::RawText(raw)
}
