//! # Nesting Resolution
//!
//! An asterisk may be bold or may be a literal `*` in running text; which one
//! depends on whether a partner appears later, before the next paragraph
//! break. A single pass parser cannot know that, so this pass runs between
//! the lexer and the parser and relabels every matched pair in place:
//!
//! ```text
//! [Asterisk, Word, Asterisk, Word, Asterisk]
//!   → [Open(Bold), Word, Close(Bold), Word, Asterisk]
//! ```
//!
//! Unmatched delimiters keep their lexed kind and the parser renders them as
//! literal text.
//!
//! ## Pairing
//!
//! From an opener, scan forward for its closing kind while keeping a depth
//! counter: tokens that open the same closing kind go one level deeper, and a
//! closer at depth zero completes the pair. The interior is then resolved
//! recursively on its own.
//!
//! Symmetric delimiters (`*`, `_`, `==`, ...) open and close with the same
//! kind. For them a same-kind token only counts as a nested opener when it
//! sits after whitespace and before non-whitespace, so
//! `*bold *nested* still bold*` nests while `*a* and *b*` stays flat. A
//! symmetric delimiter never pairs with its direct neighbour.

use crate::token::{Nesting, Token, TokenKind};

/// Pairs nested deeper than this are left literal.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Resolve delimiter pairs, relabelling them to [`TokenKind::Open`] and
/// [`TokenKind::Close`].
pub fn renest(mut tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    resolve(&mut tokens, 0);
    tokens
}

fn resolve(tokens: &mut [Token<'_>], depth: usize) {
    if depth >= MAX_NESTING_DEPTH {
        log::debug!("nesting depth {depth} reached, leaving delimiters literal");
        return;
    }

    let mut i = 0;
    while i < tokens.len() {
        let Some(nesting) = tokens[i].nesting else {
            i += 1;
            continue;
        };

        match find_closer(tokens, i, nesting) {
            Some(j) => {
                tokens[i].kind = TokenKind::Open(nesting.op);
                tokens[j].kind = TokenKind::Close(nesting.op);
                resolve(&mut tokens[i + 1..j], depth + 1);
                i = j + 1;
            }
            None => {
                log::trace!("unpaired {:?} {:?}", tokens[i].kind, tokens[i].text);
                i += 1;
            }
        }
    }
}

/// Index of the token closing the opener at `open`, if any.
fn find_closer(tokens: &[Token<'_>], open: usize, nesting: Nesting) -> Option<usize> {
    let symmetric = tokens[open].kind == nesting.closing;
    let mut depth = 0usize;

    for (j, token) in tokens.iter().enumerate().skip(open + 1) {
        if Some(token.kind) == nesting.boundary {
            return None;
        }

        let opens_same = token
            .nesting
            .is_some_and(|n| n.closing == nesting.closing);

        if token.kind == nesting.closing && !(symmetric && opens_nested(tokens, j)) {
            if depth == 0 {
                return (!symmetric || j > open + 1).then_some(j);
            }
            depth -= 1;
        } else if opens_same {
            depth += 1;
        }
    }

    None
}

/// Whether a symmetric delimiter at `at` reads as an opener: whitespace or
/// `[` before it, something other than whitespace after it.
fn opens_nested(tokens: &[Token<'_>], at: usize) -> bool {
    let after_space = at
        .checked_sub(1)
        .and_then(|prev| tokens.get(prev))
        .is_none_or(|t| t.kind.is_whitespace() || t.kind == TokenKind::LBracket);
    let before_text = tokens
        .get(at + 1)
        .is_some_and(|t| !t.kind.is_whitespace() && t.kind != TokenKind::Eof);
    after_space && before_text
}
