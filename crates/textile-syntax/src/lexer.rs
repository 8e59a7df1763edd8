//! # Lexer - Tokenizing Textile Source
//!
//! This module provides the first stage of the pipeline: breaking source text
//! into [`Token`]s.
//!
//! ## Longest Match at Every Position
//!
//! At each input position the lexer asks two rule sets for a match:
//!
//! 1. **Literal rules**, compiled by [Logos] from fixed strings (`[spoiler]`,
//!    `**`, `\n\n`, ...) and the space class.
//! 2. **Pattern rules**, plain [`regex`] patterns anchored at the position
//!    (URLs and the authored blockquote tag).
//!
//! The longer candidate wins, literals winning ties. A position matching
//! neither joins the running word, so `Hello,` is one `Word` token rather
//! than seven.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token, which is what lets an
//! unpaired delimiter fall back to its exact source text:
//!
//! ```
//! use textile_syntax::lexer::lex;
//!
//! let input = "*half [bq]open";
//! let tokens = lex(input);
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! The stream always ends with exactly one [`TokenKind::Eof`] token whose text
//! is empty.

use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::{Token, TokenKind};

/// Literal-prefix rules.
///
/// Logos picks the longest literal at the start of the slice it is given, so
/// `**` beats `*` and `\n\n` beats `\n` without any ordering on our side.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    #[token("\n\n")]
    #[token("\r\n\r\n")]
    Paragraph,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex("[ \t\u{a0}\u{1680}\u{180e}\u{2000}-\u{200a}\u{202f}\u{205f}\u{3000}]")]
    Space,

    #[token("*")]
    Asterisk,
    #[token("**")]
    DoubleAsterisk,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("_")]
    Underscore,
    #[token("__")]
    DoubleUnderscore,
    #[token("~")]
    Tilde,
    #[token("@")]
    At,
    #[token("??")]
    DoubleQuestion,
    #[token("==")]
    DoubleEqual,

    #[token("!")]
    Exclamation,
    #[token("\"")]
    Quote,
    #[token(":")]
    Colon,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[token("[spoiler]")]
    SpoilerStart,
    #[token("[/spoiler]")]
    SpoilerEnd,
    #[token("[pre]")]
    PreStart,
    #[token("[/pre]")]
    PreEnd,
    #[token("[bq]")]
    BqStart,
    #[token("[/bq]")]
    BqEnd,
    #[token("[==")]
    RawStart,
    #[token("==]")]
    RawEnd,
}

impl Literal {
    fn to_token_kind(self) -> TokenKind {
        match self {
            Literal::Paragraph => TokenKind::Paragraph,
            Literal::Newline => TokenKind::Newline,
            Literal::Space => TokenKind::Space,
            Literal::Asterisk => TokenKind::Asterisk,
            Literal::DoubleAsterisk => TokenKind::DoubleAsterisk,
            Literal::Caret => TokenKind::Caret,
            Literal::Plus => TokenKind::Plus,
            Literal::Minus => TokenKind::Minus,
            Literal::Underscore => TokenKind::Underscore,
            Literal::DoubleUnderscore => TokenKind::DoubleUnderscore,
            Literal::Tilde => TokenKind::Tilde,
            Literal::At => TokenKind::At,
            Literal::DoubleQuestion => TokenKind::DoubleQuestion,
            Literal::DoubleEqual => TokenKind::DoubleEqual,
            Literal::Exclamation => TokenKind::Exclamation,
            Literal::Quote => TokenKind::Quote,
            Literal::Colon => TokenKind::Colon,
            Literal::RParen => TokenKind::RParen,
            Literal::LBracket => TokenKind::LBracket,
            Literal::RBracket => TokenKind::RBracket,
            Literal::SpoilerStart => TokenKind::SpoilerStart,
            Literal::SpoilerEnd => TokenKind::SpoilerEnd,
            Literal::PreStart => TokenKind::PreStart,
            Literal::PreEnd => TokenKind::PreEnd,
            Literal::BqStart => TokenKind::BqStart,
            Literal::BqEnd => TokenKind::BqEnd,
            Literal::RawStart => TokenKind::RawStart,
            Literal::RawEnd => TokenKind::RawEnd,
        }
    }
}

/// Characters a URL may never contain or end with, on top of its own
/// exclusions below.
const SPACE_CLASS: &str = r" \t\x{A0}\x{1680}\x{180E}\x{2000}-\x{200A}\x{202F}\x{205F}\x{3000}";

/// `prefix path last`: the path allows `%XX` escapes, the last character may
/// not be markup punctuation so that `*see /foo*` leaves the `*` alone.
/// Brackets never appear, so a URL stops before `[/bq]` or a closing `]`.
static URL: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r#"^(?:https?://|//|/|\#)(?:[^%{SPACE_CLASS}"!\n\r\[\]]|%[0-9a-fA-F]{{2}})+[^{SPACE_CLASS}`\~!@$\^\&"\n\r*_+\-=\[\]\\|;:,.'?\#)]"#
    );
    Regex::new(&pattern).unwrap()
});

static BQ_AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\[bq="[^"]*"\]"#).unwrap());

/// Pattern rules, tried after the literal table at each position.
static PATTERN_RULES: Lazy<[(TokenKind, &'static Regex); 2]> =
    Lazy::new(|| [(TokenKind::Url, &*URL), (TokenKind::BqAuthor, &*BQ_AUTHOR)]);

/// Longest rule matching at the start of `rest`, as `(kind, byte length)`.
fn longest_match(rest: &str) -> Option<(TokenKind, usize)> {
    let mut literal = Literal::lexer(rest);
    let literal = match literal.next() {
        Some(Ok(kind)) => Some((kind.to_token_kind(), literal.span().end)),
        _ => None,
    };

    let pattern = PATTERN_RULES
        .iter()
        .filter_map(|(kind, rx)| rx.find(rest).map(|m| (*kind, m.end())))
        .max_by_key(|(_, len)| *len);

    match (literal, pattern) {
        (Some(l), Some(p)) if p.1 > l.1 => Some(p),
        (Some(l), _) => Some(l),
        (None, p) => p,
    }
}

/// Lex the input into a sequence of tokens terminated by [`TokenKind::Eof`].
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut word_start = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        match longest_match(rest) {
            Some((kind, len)) => {
                if word_start < pos {
                    tokens.push(Token::new(TokenKind::Word, &input[word_start..pos]));
                }
                tokens.push(Token::new(kind, &rest[..len]));
                pos += len;
                word_start = pos;
            }
            None => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if word_start < pos {
        tokens.push(Token::new(TokenKind::Word, &input[word_start..pos]));
    }
    tokens.push(Token::new(TokenKind::Eof, &input[input.len()..]));

    log::trace!("lexed {} bytes into {} tokens", input.len(), tokens.len());
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        lex(input).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(kinds(""), vec![(TokenKind::Eof, "")]);
    }

    #[test]
    fn lex_plain_text_coalesces_into_one_word() {
        assert_eq!(
            kinds("Hello,"),
            vec![(TokenKind::Word, "Hello,"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn lex_bold() {
        assert_eq!(
            kinds("*bold* text"),
            vec![
                (TokenKind::Asterisk, "*"),
                (TokenKind::Word, "bold"),
                (TokenKind::Asterisk, "*"),
                (TokenKind::Space, " "),
                (TokenKind::Word, "text"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[rstest]
    #[case("**", TokenKind::DoubleAsterisk)]
    #[case("__", TokenKind::DoubleUnderscore)]
    #[case("??", TokenKind::DoubleQuestion)]
    #[case("==", TokenKind::DoubleEqual)]
    #[case("[==", TokenKind::RawStart)]
    #[case("==]", TokenKind::RawEnd)]
    #[case("\n\n", TokenKind::Paragraph)]
    #[case("\r\n\r\n", TokenKind::Paragraph)]
    #[case("\r\n", TokenKind::Newline)]
    #[case("[spoiler]", TokenKind::SpoilerStart)]
    #[case("[/spoiler]", TokenKind::SpoilerEnd)]
    #[case("[pre]", TokenKind::PreStart)]
    #[case("[/pre]", TokenKind::PreEnd)]
    #[case("[bq]", TokenKind::BqStart)]
    #[case("[/bq]", TokenKind::BqEnd)]
    #[case("[bq=\"Some One\"]", TokenKind::BqAuthor)]
    #[case("[bq=\"\"]", TokenKind::BqAuthor)]
    fn longest_literal_wins(#[case] input: &str, #[case] kind: TokenKind) {
        assert_eq!(kinds(input), vec![(kind, input), (TokenKind::Eof, "")]);
    }

    #[rstest]
    #[case("\u{a0}")]
    #[case("\u{1680}")]
    #[case("\u{2003}")]
    #[case("\u{202f}")]
    #[case("\u{205f}")]
    #[case("\u{3000}")]
    #[case("\t")]
    fn unicode_spaces_are_space_tokens(#[case] input: &str) {
        assert_eq!(kinds(input), vec![(TokenKind::Space, input), (TokenKind::Eof, "")]);
    }

    #[test]
    fn triple_asterisk_is_double_then_single() {
        assert_eq!(
            kinds("***"),
            vec![
                (TokenKind::DoubleAsterisk, "**"),
                (TokenKind::Asterisk, "*"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn lex_link() {
        assert_eq!(
            kinds("\"Link text\":http://example.com"),
            vec![
                (TokenKind::Quote, "\""),
                (TokenKind::Word, "Link"),
                (TokenKind::Space, " "),
                (TokenKind::Word, "text"),
                (TokenKind::Quote, "\""),
                (TokenKind::Colon, ":"),
                (TokenKind::Url, "http://example.com"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn url_stops_before_image_terminator() {
        assert_eq!(
            kinds("!http://example.com/img.png!"),
            vec![
                (TokenKind::Exclamation, "!"),
                (TokenKind::Url, "http://example.com/img.png"),
                (TokenKind::Exclamation, "!"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn url_never_ends_with_a_paren() {
        assert_eq!(
            kinds("!/img.png(A title)!"),
            vec![
                (TokenKind::Exclamation, "!"),
                (TokenKind::Url, "/img.png(A"),
                (TokenKind::Space, " "),
                (TokenKind::Word, "title"),
                (TokenKind::RParen, ")"),
                (TokenKind::Exclamation, "!"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn url_never_ends_with_markup_punctuation() {
        assert_eq!(
            kinds("*/foo/bar*"),
            vec![
                (TokenKind::Asterisk, "*"),
                (TokenKind::Url, "/foo/bar"),
                (TokenKind::Asterisk, "*"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn url_accepts_percent_escapes() {
        assert_eq!(
            kinds("https://x.org/a%20b"),
            vec![(TokenKind::Url, "https://x.org/a%20b"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn url_inside_a_word_starts_at_its_prefix() {
        assert_eq!(
            kinds("see:http://a.io"),
            vec![
                (TokenKind::Word, "see"),
                (TokenKind::Colon, ":"),
                (TokenKind::Url, "http://a.io"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn unterminated_block_tag_is_a_bracket_and_words() {
        assert_eq!(
            kinds("[bq=\"open"),
            vec![
                (TokenKind::LBracket, "["),
                (TokenKind::Word, "bq="),
                (TokenKind::Quote, "\""),
                (TokenKind::Word, "open"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[rstest]
    #[case("[spoiler]http://example.com/x[/spoiler]", "http://example.com/x", TokenKind::SpoilerEnd)]
    #[case("[bq]see /r/rust[/bq]", "/r/rust", TokenKind::BqEnd)]
    #[case("[pre]/usr/bin[/pre]", "/usr/bin", TokenKind::PreEnd)]
    #[case("[==#anchor==]", "#anchor", TokenKind::RawEnd)]
    #[case("[\"x\":http://a.com]", "http://a.com", TokenKind::RBracket)]
    fn url_stops_before_closing_tag(
        #[case] input: &str,
        #[case] url: &str,
        #[case] closer: TokenKind,
    ) {
        let tokens = lex(input);
        let found = tokens.iter().position(|t| t.kind == TokenKind::Url).unwrap();
        assert_eq!(tokens[found].text, url);
        assert_eq!(tokens[found + 1].kind, closer);
    }

    #[test]
    fn brackets_are_their_own_tokens() {
        assert_eq!(
            kinds("a[*b*]c"),
            vec![
                (TokenKind::Word, "a"),
                (TokenKind::LBracket, "["),
                (TokenKind::Asterisk, "*"),
                (TokenKind::Word, "b"),
                (TokenKind::Asterisk, "*"),
                (TokenKind::RBracket, "]"),
                (TokenKind::Word, "c"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn delimiters_are_stamped_with_nesting() {
        let tokens = lex("*a* [bq]");
        assert!(tokens[0].nesting.is_some());
        assert!(tokens[1].nesting.is_none());
        assert!(tokens[4].nesting.is_some());
    }

    #[test]
    fn all_bytes_preserved() {
        let input = "[bq=\"Ann\"]*Hi* \u{3000}there!/x.png(t)!\r\n\r\n[==raw==] ünïcødé";
        let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn exactly_one_eof_at_the_end() {
        let tokens = lex("a *b* c");
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }
}
