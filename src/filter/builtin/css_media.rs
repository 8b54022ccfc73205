//! Carry a `<link media="...">` / `<style media="...">` into the output.

use crate::filter::{Filter, HunkContext};

/// Wraps a hunk in `@media` when its node restricts the media type.
pub struct CssMedia;

impl Filter for CssMedia {
    fn input(&self, content: &str, ctx: &HunkContext) -> anyhow::Result<Option<String>> {
        let media = ctx.node.attr("media").unwrap_or_default().trim();
        if media.is_empty() || media.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        Ok(Some(format!("@media {media} {{\n{content}\n}}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::AssetKind;
    use crate::markup::MarkupNode;

    fn run(media: Option<&str>) -> Option<String> {
        let node = match media {
            Some(m) => MarkupNode::new("style", &[("media", m)], ""),
            None => MarkupNode::new("style", &[], ""),
        };
        let ctx = HunkContext {
            kind: AssetKind::Css,
            path: None,
            node: &node,
        };
        CssMedia.input("p{color:red}", &ctx).unwrap()
    }

    #[test]
    fn test_wraps_restricted_media() {
        assert_eq!(
            run(Some("print")).unwrap(),
            "@media print {\np{color:red}\n}"
        );
    }

    #[test]
    fn test_all_and_missing_pass_through() {
        assert_eq!(run(None), None);
        assert_eq!(run(Some("all")), None);
        assert_eq!(run(Some("  ")), None);
    }
}
