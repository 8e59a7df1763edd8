//! # AST and HTML Rendering
//!
//! The parser builds a strict tree of [`Node`]s rooted at a
//! [`Node::Sequence`]; every node owns its children. Rendering is a single
//! exhaustive match in the [`fmt::Display`] impl, so each variant has exactly
//! one serialization.
//!
//! ## Escaping
//!
//! [`escape`] is the only escaping policy: `&`, `<`, `>` become entities, a
//! newline becomes `<br/>` and a carriage return disappears. It is applied to
//! [`Node::Text`] and to link and image targets. [`Node::RawText`] is written
//! verbatim.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::Op;

/// Everything up to a final parenthesized group at the very end.
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^(]+)\(([^)]*)\)$").unwrap());

static BQ_AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\[bq="([^"]*)"\]"#).unwrap());

/// Escape user text for HTML output.
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text)
        .replace('\r', "")
        .replace('\n', "<br/>")
}

/// Split a `name(title)` target into its name and optional title.
///
/// ```
/// use textile_syntax::ast::extract_title;
///
/// assert_eq!(extract_title("/a.png(Alt)"), ("/a.png", Some("Alt")));
/// assert_eq!(extract_title("/a.png"), ("/a.png", None));
/// ```
pub fn extract_title(target: &str) -> (&str, Option<&str>) {
    match TITLE.captures(target) {
        Some(caps) => {
            let name = caps.get(1).map_or(target, |m| m.as_str());
            (name, caps.get(2).map(|m| m.as_str()))
        }
        None => (target, None),
    }
}

/// Recover the author from an authored blockquote tag like `[bq="Ann"]`.
///
/// Empty or missing authors yield `None`.
pub fn extract_author(open_tag: &str) -> Option<String> {
    BQ_AUTHOR
        .captures(open_tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|author| !author.is_empty())
        .map(escape)
}

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// User text, escaped on render
    Text(String),
    /// Text written as-is
    RawText(String),
    /// `<tag>child</tag>` for an inline or block operator
    Operator { op: Op, child: Box<Node> },
    /// `<span class="spoiler">`
    Spoiler(Box<Node>),
    /// `<blockquote>`, with an already escaped author as its title
    Blockquote {
        child: Box<Node>,
        author: Option<String>,
    },
    /// `<img>`; the target may end in `(title)`
    Image { target: String },
    /// A `"..."` span that becomes a link if `:url` follows
    Quote(Box<Node>),
    /// `<a href>`
    Link {
        target: String,
        child: Box<Node>,
        title: Option<String>,
    },
    /// Children rendered in order
    Sequence(Vec<Node>),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn operator(op: Op, child: Node) -> Self {
        Node::Operator {
            op,
            child: Box::new(child),
        }
    }

    /// Blockquote whose author comes from its opening tag.
    pub fn blockquote(child: Node, open_tag: &str) -> Self {
        Node::Blockquote {
            child: Box::new(child),
            author: extract_author(open_tag),
        }
    }

    /// Whether a following `:url` turns this node into a link.
    pub fn is_linkable(&self) -> bool {
        matches!(self, Node::Quote(_) | Node::Image { .. })
    }

    /// Whether `[` and `]` around this node are dropped as markup.
    pub fn is_bracketable(&self) -> bool {
        matches!(
            self,
            Node::Operator { .. } | Node::Link { .. } | Node::Image { .. }
        )
    }

    /// Fuse a quote or an image with the URL that follows it.
    ///
    /// A quote's rendered content becomes the link text, minus an optional
    /// trailing `(title)` which becomes the link title. An image is wrapped
    /// whole. Any other node is returned unchanged.
    pub fn into_link(self, target: &str) -> Node {
        match self {
            Node::Quote(child) => {
                let rendered = child.render();
                let (text, title) = extract_title(&rendered);
                Node::Link {
                    target: target.to_owned(),
                    child: Box::new(Node::RawText(text.to_owned())),
                    title: title.map(|t| t.replace('"', "&quot;")),
                }
            }
            image @ Node::Image { .. } => Node::Link {
                target: target.to_owned(),
                child: Box::new(image),
                title: None,
            },
            other => other,
        }
    }

    /// Serialize this node and its children to HTML.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => f.write_str(&escape(text)),
            Node::RawText(text) => f.write_str(text),
            Node::Operator { op, child } => {
                let tag = op.html_tag();
                write!(f, "<{tag}>{child}</{tag}>")
            }
            Node::Spoiler(child) => write!(f, r#"<span class="spoiler">{child}</span>"#),
            Node::Blockquote { child, author } => match author {
                Some(author) => write!(f, r#"<blockquote title="{author}">{child}</blockquote>"#),
                None => write!(f, "<blockquote>{child}</blockquote>"),
            },
            Node::Image { target } => {
                let (src, title) = extract_title(target);
                write!(f, r#"<img src="{}""#, escape(src))?;
                if let Some(title) = title {
                    write!(f, r#" title="{}""#, escape(title))?;
                }
                f.write_str("/>")
            }
            Node::Quote(child) => write!(f, "\"{child}\""),
            Node::Link {
                target,
                child,
                title,
            } => {
                write!(f, r#"<a href="{}""#, escape(target))?;
                if let Some(title) = title {
                    write!(f, r#" title="{title}""#)?;
                }
                write!(f, ">{child}</a>")
            }
            Node::Sequence(children) => children.iter().try_for_each(|c| write!(f, "{c}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("a & b", "a &amp; b")]
    #[case("<b>", "&lt;b&gt;")]
    #[case("one\ntwo", "one<br/>two")]
    #[case("one\r\ntwo", "one<br/>two")]
    #[case("\"quoted\"", "\"quoted\"")]
    fn escaping(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn escaping_is_applied_once() {
        assert_eq!(escape("&amp;"), "&amp;amp;");
        assert_eq!(Node::text("&").render(), "&amp;");
    }

    #[rstest]
    #[case("/a.png(Alt)", "/a.png", Some("Alt"))]
    #[case("/a.png()", "/a.png", Some(""))]
    #[case("/a.png", "/a.png", None)]
    #[case("(only)", "(only)", None)]
    #[case("a(b)c", "a(b)c", None)]
    #[case("text(one)(two)", "text(one)(two)", None)]
    fn title_extraction(
        #[case] input: &str,
        #[case] name: &str,
        #[case] title: Option<&str>,
    ) {
        assert_eq!(extract_title(input), (name, title));
    }

    #[rstest]
    #[case("[bq=\"Ann\"]", Some("Ann"))]
    #[case("[bq=\"A & B\"]", Some("A &amp; B"))]
    #[case("[bq=\"\"]", None)]
    #[case("[bq]", None)]
    fn author_extraction(#[case] tag: &str, #[case] author: Option<&str>) {
        assert_eq!(extract_author(tag).as_deref(), author);
    }

    #[test]
    fn render_operator() {
        let node = Node::operator(Op::Superscript, Node::text("2"));
        assert_snapshot!(node.render(), @"<sup>2</sup>");
    }

    #[test]
    fn render_unknown_operator_as_span() {
        let node = Node::operator(Op::Spoiler, Node::text("x"));
        assert_snapshot!(node.render(), @"<span>x</span>");
    }

    #[test]
    fn render_spoiler() {
        let node = Node::Spoiler(Box::new(Node::text("boo")));
        assert_snapshot!(node.render(), @r#"<span class="spoiler">boo</span>"#);
    }

    #[test]
    fn render_blockquote_with_and_without_author() {
        let authored = Node::blockquote(Node::text("hi"), "[bq=\"Ann\"]");
        assert_snapshot!(authored.render(), @r#"<blockquote title="Ann">hi</blockquote>"#);

        let anonymous = Node::blockquote(Node::text("hi"), "[bq=\"\"]");
        assert_snapshot!(anonymous.render(), @"<blockquote>hi</blockquote>");
    }

    #[test]
    fn render_image_with_title() {
        let node = Node::Image {
            target: "/a.png(Alt text)".into(),
        };
        assert_snapshot!(node.render(), @r#"<img src="/a.png" title="Alt text"/>"#);
    }

    #[test]
    fn image_target_is_escaped() {
        let node = Node::Image {
            target: "/a?x=1&y=2".into(),
        };
        assert_snapshot!(node.render(), @r#"<img src="/a?x=1&amp;y=2"/>"#);
    }

    #[test]
    fn quote_renders_with_its_quotes() {
        let node = Node::Quote(Box::new(Node::text("hi")));
        assert_snapshot!(node.render(), @r#""hi""#);
    }

    #[test]
    fn quote_into_link_splits_title() {
        let quote = Node::Quote(Box::new(Node::Sequence(vec![
            Node::operator(Op::Bold, Node::text("Home")),
            Node::text("(Start page)"),
        ])));
        let link = quote.into_link("/");
        assert_snapshot!(link.render(), @r#"<a href="/" title="Start page"><b>Home</b></a>"#);
    }

    #[test]
    fn image_into_link_wraps_image() {
        let image = Node::Image {
            target: "/a.png".into(),
        };
        let link = image.into_link("/b");
        assert_snapshot!(link.render(), @r#"<a href="/b"><img src="/a.png"/></a>"#);
    }

    #[test]
    fn plain_text_is_not_linkable() {
        let text = Node::text("x");
        assert!(!text.is_linkable());
        assert_eq!(text.clone().into_link("/y"), text);
    }

    #[test]
    fn sequence_concatenates_in_order() {
        let node = Node::Sequence(vec![
            Node::text("a < "),
            Node::RawText("<hr/>".into()),
            Node::text(" b"),
        ]);
        assert_eq!(node.render(), "a &lt; <hr/> b");
    }
}
