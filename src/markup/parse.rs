//! `tl`-backed adapter from a markup string to [`MarkupNode`]s.
//!
//! `style` and `script` bodies are raw text: they end at the first
//! case-insensitive `</style` or `</script`, whatever `<` they contain.
//! They are cut out before `tl` sees the block and spliced back per node.

use super::MarkupNode;
use crate::error::{CompressError, Result};

/// Tags the extractors care about.
const ASSET_TAGS: &[&str] = &["link", "style", "script"];

/// Elements whose contents run verbatim up to their closing tag.
const RAW_TEXT_TAGS: &[&str] = &["style", "script"];

/// Body and closing tag of one raw text element, in document order.
#[derive(Debug, PartialEq, Eq)]
struct RawText<'a> {
    body: &'a str,
    close: &'a str,
}

/// Parse a markup block into its `link`, `style` and `script` nodes,
/// in document order.
///
/// Contents of `style` and `script` are not searched for nested tags.
pub fn parse(html: &str) -> Result<Vec<MarkupNode>> {
    let (masked, bodies) = mask_raw_text(html);
    let dom = tl::parse(&masked, tl::ParserOptions::default())
        .map_err(|e| CompressError::Markup(format!("{e:?}")))?;

    let parser = dom.parser();
    let mut bodies = bodies.into_iter();
    let mut nodes = Vec::new();
    for handle in dom.children() {
        collect(*handle, parser, &mut bodies, &mut nodes);
    }
    Ok(nodes)
}

fn collect(
    handle: tl::NodeHandle,
    parser: &tl::Parser,
    bodies: &mut std::vec::IntoIter<RawText<'_>>,
    out: &mut Vec<MarkupNode>,
) {
    let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
        return;
    };

    let name = tag.name().as_utf8_str().to_ascii_lowercase();
    if ASSET_TAGS.contains(&name.as_str()) {
        out.push(convert(&name, tag, bodies));
        if name != "link" {
            return;
        }
    }

    for child in tag.children().top().iter() {
        collect(*child, parser, bodies, out);
    }
}

fn convert(
    name: &str,
    tag: &tl::HTMLTag,
    bodies: &mut std::vec::IntoIter<RawText<'_>>,
) -> MarkupNode {
    let attrs = tag
        .attributes()
        .iter()
        .map(|(key, value)| {
            let key: &str = key.as_ref();
            (key.to_owned(), value.map(|v| v.to_string()).unwrap_or_default())
        })
        .collect();

    let raw = tag.raw().as_utf8_str();
    let (markup, text) = if name == "link" {
        (open_tag(&raw).to_owned(), String::new())
    } else if let Some(RawText { body, close }) = bodies.next() {
        (format!("{}{body}{close}", open_tag(&raw)), body.to_owned())
    } else {
        (raw.to_string(), inner_text(&raw).to_owned())
    };

    MarkupNode::with_markup(name, attrs, text, markup)
}

/// Copy of `html` with every `style` and `script` body removed, plus the
/// removed bodies. Comments are skipped.
fn mask_raw_text(html: &str) -> (String, Vec<RawText<'_>>) {
    let lower = html.to_ascii_lowercase();
    let mut masked = String::with_capacity(html.len());
    let mut bodies = Vec::new();
    let mut cursor = 0;
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        if lower[start..].starts_with("<!--") {
            pos = lower[start + 4..]
                .find("-->")
                .map_or(html.len(), |end| start + 4 + end + 3);
            continue;
        }

        let name_start = start + 1;
        let name_len = lower[name_start..]
            .bytes()
            .take_while(u8::is_ascii_alphanumeric)
            .count();
        if name_len == 0 {
            pos = name_start;
            continue;
        }
        let name = &lower[name_start..name_start + name_len];
        let Some(open_end) = tag_end(html, name_start + name_len) else {
            break;
        };
        pos = open_end;
        if !RAW_TEXT_TAGS.contains(&name) {
            continue;
        }
        if html[..open_end].ends_with("/>") {
            bodies.push(RawText { body: "", close: "" });
            continue;
        }

        let closing = format!("</{name}");
        let body_end = lower[open_end..]
            .find(&closing)
            .map_or(html.len(), |i| open_end + i);
        let close_end = html[body_end..]
            .find('>')
            .map_or(html.len(), |i| body_end + i + 1);

        masked.push_str(&html[cursor..open_end]);
        masked.push_str(&html[body_end..close_end]);
        bodies.push(RawText {
            body: &html[open_end..body_end],
            close: &html[body_end..close_end],
        });
        cursor = close_end;
        pos = close_end;
    }

    masked.push_str(&html[cursor..]);
    (masked, bodies)
}

/// Index just past the `>` closing the tag whose name ends at `from`.
/// Quoted attribute values may contain `>`.
fn tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, b) in html.bytes().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// The opening tag of `raw`, up to and including its closing `>`.
fn open_tag(raw: &str) -> &str {
    tag_end(raw, 0).map_or(raw, |end| &raw[..end])
}

/// Text between the opening tag and the last closing tag.
fn inner_text(raw: &str) -> &str {
    let Some(start) = tag_end(raw, 0) else {
        return "";
    };
    let end = raw.rfind("</").filter(|&end| end >= start).unwrap_or(raw.len());
    &raw[start..end]
}
