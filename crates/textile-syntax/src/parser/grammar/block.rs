//! # Block-Level Grammar
//!
//! Bracketed block tags: `[spoiler]`, `[pre]`, `[bq]` and `[bq="author"]`.
//! Unlike inline delimiters they may span paragraph breaks and nest inside
//! each other; the resolver has already matched them.

use super::operator_interior;
use crate::ast::Node;
use crate::parser::Parser;
use crate::token::Op;

/// Parse a resolved block operator starting at its `Open(op)` token.
pub(super) fn block(p: &mut Parser<'_, '_>, op: Op) -> Node {
    match op {
        Op::Spoiler => Node::Spoiler(Box::new(operator_interior(p, op))),
        Op::Blockquote => Node::Blockquote {
            child: Box::new(operator_interior(p, op)),
            author: None,
        },
        Op::AuthoredBlockquote => {
            let open_tag = p.current_text();
            Node::blockquote(operator_interior(p, op), open_tag)
        }
        _ => Node::operator(op, operator_interior(p, op)),
    }
}
