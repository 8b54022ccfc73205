//! Rewrite relative `url(...)` references to absolute media URLs.
//!
//! A stylesheet at `media/css/site.css` referencing `url(../img/a.png)`
//! becomes `url(/media/img/a.png)` once it is concatenated into an output
//! file living elsewhere.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::filter::{Filter, HunkContext};
use crate::fragment::{AssetKind, PathMapper};

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]*))\s*\)"#).expect("valid regex")
});

pub struct CssAbsolute {
    mapper: PathMapper,
}

impl CssAbsolute {
    pub fn new(mapper: PathMapper) -> Self {
        Self { mapper }
    }

    fn rewrite(&self, content: &str, file: &Path) -> String {
        let Some(dir) = file.parent() else {
            return content.to_owned();
        };

        URL_RE
            .replace_all(content, |caps: &Captures| {
                let (quote, url) = match (caps.get(1), caps.get(2), caps.get(3)) {
                    (Some(m), _, _) => ("\"", m.as_str()),
                    (_, Some(m), _) => ("'", m.as_str()),
                    (_, _, Some(m)) => ("", m.as_str()),
                    _ => return caps[0].to_owned(),
                };
                match self.absolute(url, dir) {
                    Some(abs) => format!("url({quote}{abs}{quote})"),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned()
    }

    /// Absolute URL for `url` relative to `dir`, or `None` to leave it alone.
    fn absolute(&self, url: &str, dir: &Path) -> Option<String> {
        if !is_relative_url(url) {
            return None;
        }
        let split = url.find(['?', '#']).unwrap_or(url.len());
        let (path, suffix) = url.split_at(split);
        let target = normalize(&dir.join(path));
        let abs = self.mapper.url_for(&target)?;
        Some(format!("{abs}{suffix}"))
    }
}

impl Filter for CssAbsolute {
    fn input(&self, content: &str, ctx: &HunkContext) -> anyhow::Result<Option<String>> {
        // Inline hunks have no location to be relative to.
        match (ctx.kind, ctx.path) {
            (AssetKind::Css, Some(file)) => Ok(Some(self.rewrite(content, file))),
            _ => Ok(None),
        }
    }
}

fn is_relative_url(url: &str) -> bool {
    !(url.is_empty()
        || url.starts_with('/')
        || url.starts_with('#')
        || url.starts_with("data:")
        || url.contains("://"))
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupNode;

    fn filter() -> CssAbsolute {
        CssAbsolute::new(PathMapper::new("/media/", "/srv/media"))
    }

    fn run(content: &str, path: Option<&Path>) -> Option<String> {
        let node = MarkupNode::new("link", &[("rel", "stylesheet")], "");
        let ctx = HunkContext {
            kind: AssetKind::Css,
            path,
            node: &node,
        };
        filter().input(content, &ctx).unwrap()
    }

    #[test]
    fn test_rewrites_relative_urls() {
        let file = Path::new("/srv/media/css/site.css");
        let out = run(
            "a{background:url(../img/a.png)} b{background:url('b.png?v=1')} c{src:url(\"./f/c.woff#x\")}",
            Some(file),
        )
        .unwrap();
        assert_eq!(
            out,
            "a{background:url(/media/img/a.png)} b{background:url('/media/css/b.png?v=1')} c{src:url(\"/media/css/f/c.woff#x\")}"
        );
    }

    #[test]
    fn test_leaves_absolute_urls() {
        let file = Path::new("/srv/media/css/site.css");
        let css = "a{background:url(/img/a.png)} b{background:url(http://cdn.example.com/b.png)} \
                   c{background:url(data:image/png;base64,AAAA)} d{filter:url(#blur)}";
        assert_eq!(run(css, Some(file)).unwrap(), css);
    }

    #[test]
    fn test_inline_hunk_untouched() {
        assert_eq!(run("a{background:url(x.png)}", None), None);
    }

    #[test]
    fn test_outside_media_root_untouched() {
        let file = Path::new("/srv/media/site.css");
        let css = "a{background:url(../../etc/x.png)}";
        assert_eq!(run(css, Some(file)).unwrap(), css);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
    }
}
