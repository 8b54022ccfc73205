//! Parsed markup nodes consumed by the fragment extractors.
//!
//! The core never parses HTML itself: it works on [`MarkupNode`]s, which
//! carry a tag name, attributes, text content and the node's original
//! markup. [`parse`] builds them from a string with the `tl` parser.

mod parse;

pub use parse::parse;

use regex::Regex;
use std::sync::OnceLock;

/// One `link`/`style`/`script` node of a markup block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    markup: String,
}

impl MarkupNode {
    /// Create a node; its markup is rendered from tag, attributes and text.
    pub fn new(tag: &str, attrs: &[(&str, &str)], text: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let attrs: Vec<_> = attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), (*v).to_owned()))
            .collect();
        let markup = render(&tag, &attrs, text);
        Self {
            tag,
            attrs,
            text: text.to_owned(),
            markup,
        }
    }

    /// Create a node that keeps its exact source markup.
    pub fn with_markup(
        tag: &str,
        attrs: Vec<(String, String)>,
        text: String,
        markup: String,
    ) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            text,
            markup,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by (case-insensitive) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Original markup of the node.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Markup for re-emission; non-xhtml output drops the self-closing slash.
    pub fn markup_for(&self, xhtml: bool) -> String {
        if xhtml {
            return self.markup.clone();
        }
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\s?/>").unwrap());
        re.replace_all(&self.markup, ">").into_owned()
    }

    /// Point the node at a different file name.
    ///
    /// Replaces `from` with `to` in attribute values and in the markup.
    pub fn retarget(&self, from: &str, to: &str) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.replace(from, to)))
                .collect(),
            text: self.text.clone(),
            markup: self.markup.replace(from, to),
        }
    }
}

/// Render a node back to markup. `link` is void; the rest get a closing tag.
fn render(tag: &str, attrs: &[(String, String)], text: &str) -> String {
    let mut out = format!("<{tag}");
    for (k, v) in attrs {
        out.push_str(&format!(" {k}=\"{v}\""));
    }
    if tag == "link" {
        out.push_str(" />");
    } else {
        out.push_str(&format!(">{text}</{tag}>"));
    }
    out
}
