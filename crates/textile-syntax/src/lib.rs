//! # textile-syntax
//!
//! Converts Textile-style markup into an HTML fragment.
//!
//! ## Architecture Overview
//!
//! The pipeline has four stages and never goes back to an earlier one:
//!
//! ```text
//! Source Text → Lexer → Tokens → Renest → Tokens → Parser → Node → HTML
//!               (Logos + regex)   (pairing)        (grammar)  (Display)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Longest match at every position against literal rules (Logos) and pattern
//! rules (URLs, authored blockquote tags). Unmatched characters coalesce into
//! words. Delimiters are stamped with what they can pair with.
//!
//! ### 2. Nesting resolution ([`renest`] module)
//!
//! The markup is not context-free: `*` is bold only if a partner follows
//! before the next paragraph break. This pass relabels matched pairs as
//! `Open(op)` / `Close(op)` and leaves everything else literal.
//!
//! ### 3. Parser ([`parser`] module)
//!
//! Fixed-precedence recursive descent (link, quote, image, terminal) over
//! the resolved tokens. It has no error path: anything it does not recognise
//! becomes literal text.
//!
//! ### 4. Rendering ([`ast`] module)
//!
//! A closed [`Node`] enum rendered through one `Display` impl, with one
//! escaping policy for all user text.
//!
//! ## Module Structure
//!
//! ```text
//! textile-syntax/
//! ├── lib.rs        # This file - public API and integration tests
//! ├── token.rs      # TokenKind, Op, Nesting and the nesting table
//! ├── lexer.rs      # Logos + regex tokenizer
//! ├── renest.rs     # Delimiter pairing
//! ├── ast.rs        # Node enum, escaping, HTML output
//! └── parser/
//!     ├── mod.rs    # Parser cursor, parse() / parse_tree()
//!     └── grammar/
//!         ├── mod.rs    # Root, link rule, operator interiors
//!         ├── inline.rs # Quotes, images, text, raw spans, inline operators
//!         └── block.rs  # Spoilers, pre, blockquotes
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use textile_syntax::render;
//!
//! assert_eq!(render("Hello, *world*!", None), "Hello, <b>world</b>!");
//! assert_eq!(render("plain & <text>", None), "plain &amp; &lt;text&gt;");
//! ```
//!
//! A substitution hook sees every escaped text run before it enters the tree:
//!
//! ```
//! use textile_syntax::render;
//!
//! let trademark = |s: &str| s.replace("TM", "&trade;");
//! assert_eq!(
//!     render("Acme TM *new*", Some(&trademark)),
//!     "Acme &trade; <b>new</b>"
//! );
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod renest;
pub mod token;

pub use ast::Node;
pub use parser::{Substitution, parse, parse_tree};
pub use token::{Op, Token, TokenKind};

/// Render Textile markup to an HTML fragment.
///
/// `substitution`, when given, is called once per escaped text run. A panic
/// raised by it propagates to the caller.
pub fn render(text: &str, substitution: Option<Substitution<'_>>) -> String {
    let tokens = renest::renest(lexer::lex(text));
    let html = parser::parse(&tokens, substitution);
    log::debug!(
        "rendered {} bytes of markup into {} bytes of html",
        text.len(),
        html.len()
    );
    html
}
