//! Token kinds, semantic operators and the static nesting table.
//!
//! Every token the lexer produces carries a [`TokenKind`] and the exact text
//! slice it consumed. Delimiter tokens additionally carry [`Nesting`]
//! metadata describing what they can pair with. The resolver in
//! [`crate::renest`] rewrites paired delimiters into [`TokenKind::Open`] and
//! [`TokenKind::Close`]; nothing else ever changes a token after lexing.

/// Semantic operator a paired delimiter stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `*bold*`
    Bold,
    /// `**strong**`
    Strong,
    /// `^superscript^`
    Superscript,
    /// `+insert+`
    Insert,
    /// `-delete-`
    Delete,
    /// `_emphasis_`
    Emphasis,
    /// `__italic__`
    Italic,
    /// `@code@`
    Code,
    /// `~subscript~`
    Subscript,
    /// `??cite??`
    Cite,
    /// `==raw==` and `[==raw==]`
    Raw,
    /// `[pre]...[/pre]`
    Pre,
    /// `[spoiler]...[/spoiler]`
    Spoiler,
    /// `[bq]...[/bq]`
    Blockquote,
    /// `[bq="author"]...[/bq]`
    AuthoredBlockquote,
}

impl Op {
    /// Operators a `[...]` bracket pair may wrap inside a word.
    pub fn is_inline(self) -> bool {
        !matches!(
            self,
            Op::Raw | Op::Pre | Op::Spoiler | Op::Blockquote | Op::AuthoredBlockquote
        )
    }

    /// The HTML element an [`Op`] renders to when wrapped by an operator node.
    ///
    /// Operators with a dedicated node (spoilers, blockquotes, raw spans) have
    /// no element of their own here and fall back to `span`.
    pub fn html_tag(self) -> &'static str {
        match self {
            Op::Bold => "b",
            Op::Strong => "strong",
            Op::Superscript => "sup",
            Op::Insert => "ins",
            Op::Delete => "del",
            Op::Emphasis => "em",
            Op::Italic => "i",
            Op::Code => "code",
            Op::Subscript => "sub",
            Op::Cite => "cite",
            Op::Pre => "pre",
            _ => "span",
        }
    }
}

/// All token kinds.
///
/// The first group is lexer output. `Open` and `Close` only ever appear after
/// nesting resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of characters matching no rule
    Word,
    /// A single space character, including the Unicode space separators
    Space,
    /// `\n`
    Newline,
    /// `\n\n`
    Paragraph,
    /// End of input, always the last token
    Eof,

    /// `*`
    Asterisk,
    /// `**`
    DoubleAsterisk,
    /// `^`
    Caret,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `_`
    Underscore,
    /// `__`
    DoubleUnderscore,
    /// `~`
    Tilde,
    /// `@`
    At,
    /// `??`
    DoubleQuestion,
    /// `==`
    DoubleEqual,

    /// `[spoiler]`
    SpoilerStart,
    /// `[/spoiler]`
    SpoilerEnd,
    /// `[pre]`
    PreStart,
    /// `[/pre]`
    PreEnd,
    /// `[bq]`
    BqStart,
    /// `[bq="author"]`
    BqAuthor,
    /// `[/bq]`
    BqEnd,
    /// `[==`
    RawStart,
    /// `==]`
    RawEnd,

    /// `!`
    Exclamation,
    /// `"`
    Quote,
    /// `:`
    Colon,
    /// `)`
    RParen,
    /// `[`, hugging a bracketed inline element
    LBracket,
    /// `]`
    RBracket,
    /// `http://...`, `https://...`, `//...`, `/...` or `#...`
    Url,

    /// Opening delimiter of a resolved pair
    Open(Op),
    /// Closing delimiter of a resolved pair
    Close(Op),
}

impl TokenKind {
    /// Whitespace-like kinds, used by the resolver to tell a nested opener
    /// from a closer.
    pub fn is_whitespace(self) -> bool {
        matches!(
            self,
            TokenKind::Space | TokenKind::Newline | TokenKind::Paragraph
        )
    }

    /// Kinds the parser folds into a single literal text run.
    pub fn is_plain(self) -> bool {
        self == TokenKind::Word || self.is_whitespace()
    }

    pub fn is_close(self) -> bool {
        matches!(self, TokenKind::Close(_))
    }
}

/// Pairing metadata stamped on delimiter tokens at lex time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nesting {
    /// Kind that must appear later to pair with this token
    pub closing: TokenKind,
    /// Operator the pair becomes once resolved
    pub op: Op,
    /// Kind that invalidates pairing if met before the closer
    pub boundary: Option<TokenKind>,
}

const fn inline(kind: TokenKind, op: Op) -> (TokenKind, Nesting) {
    (
        kind,
        Nesting {
            closing: kind,
            op,
            boundary: Some(TokenKind::Paragraph),
        },
    )
}

const fn block(kind: TokenKind, closing: TokenKind, op: Op) -> (TokenKind, Nesting) {
    (
        kind,
        Nesting {
            closing,
            op,
            boundary: None,
        },
    )
}

/// Opening kind → pairing metadata. Kinds not listed never pair.
pub static NESTING_TABLE: &[(TokenKind, Nesting)] = &[
    inline(TokenKind::Asterisk, Op::Bold),
    inline(TokenKind::DoubleAsterisk, Op::Strong),
    inline(TokenKind::Caret, Op::Superscript),
    inline(TokenKind::Plus, Op::Insert),
    inline(TokenKind::Minus, Op::Delete),
    inline(TokenKind::Underscore, Op::Emphasis),
    inline(TokenKind::DoubleUnderscore, Op::Italic),
    inline(TokenKind::Tilde, Op::Subscript),
    inline(TokenKind::At, Op::Code),
    inline(TokenKind::DoubleQuestion, Op::Cite),
    inline(TokenKind::DoubleEqual, Op::Raw),
    block(TokenKind::RawStart, TokenKind::RawEnd, Op::Raw),
    block(TokenKind::SpoilerStart, TokenKind::SpoilerEnd, Op::Spoiler),
    block(TokenKind::PreStart, TokenKind::PreEnd, Op::Pre),
    block(TokenKind::BqStart, TokenKind::BqEnd, Op::Blockquote),
    block(TokenKind::BqAuthor, TokenKind::BqEnd, Op::AuthoredBlockquote),
];

/// Look up the pairing metadata for a freshly lexed kind.
pub fn nesting_for(kind: TokenKind) -> Option<Nesting> {
    NESTING_TABLE
        .iter()
        .find(|(opener, _)| *opener == kind)
        .map(|(_, nesting)| *nesting)
}

/// A lexed token: its kind, the exact text consumed, and pairing metadata
/// when it is a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub nesting: Option<Nesting>,
}

impl<'a> Token<'a> {
    /// Create a token, stamping nesting metadata from [`NESTING_TABLE`].
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self {
            kind,
            text,
            nesting: nesting_for(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters_carry_nesting() {
        let token = Token::new(TokenKind::Asterisk, "*");
        assert_eq!(
            token.nesting,
            Some(Nesting {
                closing: TokenKind::Asterisk,
                op: Op::Bold,
                boundary: Some(TokenKind::Paragraph),
            })
        );
    }

    #[test]
    fn block_tags_have_no_boundary() {
        let nesting = nesting_for(TokenKind::SpoilerStart).unwrap();
        assert_eq!(nesting.closing, TokenKind::SpoilerEnd);
        assert_eq!(nesting.boundary, None);
    }

    #[test]
    fn both_blockquote_openers_close_on_bq_end() {
        assert_eq!(nesting_for(TokenKind::BqStart).unwrap().closing, TokenKind::BqEnd);
        assert_eq!(nesting_for(TokenKind::BqAuthor).unwrap().closing, TokenKind::BqEnd);
    }

    #[test]
    fn closers_and_plain_tokens_do_not_nest() {
        for kind in [
            TokenKind::Word,
            TokenKind::Space,
            TokenKind::BqEnd,
            TokenKind::RawEnd,
            TokenKind::Quote,
            TokenKind::Url,
            TokenKind::Eof,
        ] {
            assert!(nesting_for(kind).is_none(), "{kind:?} should not nest");
        }
    }

    #[test]
    fn html_tags() {
        assert_eq!(Op::Bold.html_tag(), "b");
        assert_eq!(Op::Code.html_tag(), "code");
        assert_eq!(Op::Pre.html_tag(), "pre");
        assert_eq!(Op::Spoiler.html_tag(), "span");
    }

    #[test]
    fn inline_ops() {
        assert!(Op::Bold.is_inline());
        assert!(Op::Cite.is_inline());
        assert!(!Op::Raw.is_inline());
        assert!(!Op::Spoiler.is_inline());
    }

    #[test]
    fn plain_kinds() {
        assert!(TokenKind::Word.is_plain());
        assert!(TokenKind::Paragraph.is_plain());
        assert!(!TokenKind::Asterisk.is_plain());
        assert!(!TokenKind::Url.is_plain());
    }
}
