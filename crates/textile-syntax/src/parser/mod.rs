//! # Parser - Recursive Descent over Resolved Tokens
//!
//! The parser consumes the token stream after [nesting resolution] and builds
//! a [`Node`] tree. Because every `Open(op)` already has its `Close(op)`
//! somewhere ahead, the grammar never has to guess or backtrack: each rule
//! either completes a construct or emits literal text and moves on.
//!
//! [nesting resolution]: crate::renest
//!
//! ## Precedence
//!
//! Rules are tried from the top, each falling through to the next:
//!
//! ```text
//! link      '[' link ']' | quote-or-image ':' url
//! quote     '"' image* '"'
//! image     '!' url [')'] '!'
//! terminal  text run | Open(op) link* Close(op) | raw span | any token
//! ```
//!
//! The grammar lives in [`grammar`]; this module holds the cursor the rules
//! drive.
//!
//! ## No Errors
//!
//! There is no error type. The final arm of the terminal rule turns any token
//! into literal text, so every rule advances at least one token and the
//! parser terminates on any input.

mod grammar;

use crate::ast::Node;
use crate::token::{Token, TokenKind};

/// Caller hook run on every escaped text run before it enters the tree.
///
/// A text run is consecutive words and whitespace. Punctuation that lexes as
/// its own token (`:`, `)`, `[`, `]`, unpaired delimiters) and URLs shown as
/// text are emitted separately and never reach the hook, so a key like `:)`
/// cannot match. Raw spans are not passed to it either.
pub type Substitution<'a> = &'a dyn Fn(&str) -> String;

/// The parser state: a cursor over an immutable token slice.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    substitution: Option<Substitution<'t>>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of resolved tokens.
    pub fn new(tokens: &'t [Token<'input>], substitution: Option<Substitution<'t>>) -> Self {
        Self {
            tokens,
            pos: 0,
            substitution,
        }
    }

    /// Parse all tokens into a [`Node::Sequence`].
    pub fn parse(mut self) -> Node {
        grammar::root(&mut self)
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token and return its text.
    ///
    /// At end of input nothing is consumed and the text is empty.
    pub fn bump(&mut self) -> &'input str {
        if self.at_end() {
            return "";
        }
        let text = self.tokens[self.pos].text;
        self.pos += 1;
        text
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.tokens.get(self.pos).map(|t| t.text).unwrap_or("")
    }

    pub(crate) fn substitution(&self) -> Option<Substitution<'t>> {
        self.substitution
    }
}

/// Parse resolved tokens into a tree.
pub fn parse_tree(tokens: &[Token<'_>], substitution: Option<Substitution<'_>>) -> Node {
    Parser::new(tokens, substitution).parse()
}

/// Parse resolved tokens and render the result to HTML.
pub fn parse(tokens: &[Token<'_>], substitution: Option<Substitution<'_>>) -> String {
    parse_tree(tokens, substitution).render()
}
