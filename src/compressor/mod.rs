//! Render session: one markup block in, one output file and its reference out.
//!
//! # Module Structure
//!
//! ```text
//! compressor/
//! ├── env.rs        # Environment (config + collaborators)
//! ├── template.rs   # reference markup templates
//! └── mod.rs        # Compressor (this file)
//! ```
//!
//! # Pipeline
//!
//! ```text
//! nodes ─► fragments ─► hunks (input filters) ─► combined (output filters)
//!                                                   │
//!                       <media_root>/<output_dir>/<css|js>/<hash>.<ext> ◄─┘
//! ```
//!
//! `fragments`, `hunks` and `combined` are computed once per session.

mod env;
pub mod template;

pub use env::Environment;

use std::cell::OnceCell;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::error::{CompressError, Result};
use crate::filter::{FilterChain, HunkContext};
use crate::fragment::{self, AssetKind, ExtractContext, Fragment};
use crate::freshness::{self, get_mtime};
use crate::log;
use crate::markup::{self, MarkupNode};

/// Cache key namespace.
const CACHE_KEY_PREFIX: &str = "compressor.";

/// Reject explicit output names that would leave the output directory.
pub fn check_output_name(name: &str) -> Result<()> {
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(CompressError::TagSyntax(format!(
            "output name `{name}` must be a plain file name"
        )));
    }
    Ok(())
}

/// One compression of one markup block.
pub struct Compressor<'env> {
    env: &'env Environment,
    kind: AssetKind,
    content: String,
    nodes: Vec<MarkupNode>,
    xhtml: bool,
    output_name: Option<String>,
    filters: FilterChain,

    fragments: OnceCell<Vec<Fragment>>,
    hunks: OnceCell<Vec<String>>,
    combined: OnceCell<String>,
}

impl<'env> Compressor<'env> {
    /// Parse `content` and prepare a session for `kind`.
    pub fn new(env: &'env Environment, kind: AssetKind, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        let nodes = markup::parse(&content)?;
        Self::build(env, kind, content, nodes)
    }

    /// Session over already-parsed nodes; the raw content is their markup.
    pub fn from_nodes(env: &'env Environment, kind: AssetKind, nodes: Vec<MarkupNode>) -> Result<Self> {
        let content = nodes
            .iter()
            .map(MarkupNode::markup)
            .collect::<Vec<_>>()
            .join("\n");
        Self::build(env, kind, content, nodes)
    }

    fn build(
        env: &'env Environment,
        kind: AssetKind,
        content: String,
        nodes: Vec<MarkupNode>,
    ) -> Result<Self> {
        let configured = match kind {
            AssetKind::Css => &env.config.css_filters,
            AssetKind::Js => &env.config.js_filters,
        };
        let filters = env.filters.chain(kind, configured)?;

        Ok(Self {
            env,
            kind,
            content,
            nodes,
            xhtml: false,
            output_name: None,
            filters,
            fragments: OnceCell::new(),
            hunks: OnceCell::new(),
            combined: OnceCell::new(),
        })
    }

    /// Emit xhtml-style self-closing references.
    pub fn xhtml(mut self, xhtml: bool) -> Self {
        self.xhtml = xhtml;
        self
    }

    /// Use `name` instead of the content hash for the output file.
    pub fn output_name(mut self, name: Option<String>) -> Self {
        self.output_name = name.filter(|n| !n.is_empty());
        self
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    // ========================================================================
    // memoized stages
    // ========================================================================

    /// Fragments in document order. Extraction (and any compilation) runs once.
    pub fn fragments(&self) -> Result<&[Fragment]> {
        if let Some(fragments) = self.fragments.get() {
            return Ok(fragments);
        }
        let ctx = ExtractContext {
            mapper: &self.env.mapper,
            compilers: &self.env.compilers,
            strict: self.env.config.debug,
        };
        let fragments = fragment::extract(&self.nodes, self.kind, &ctx)?;
        Ok(self.fragments.get_or_init(|| fragments))
    }

    /// Per-fragment text after the input phase.
    pub fn hunks(&self) -> Result<&[String]> {
        if let Some(hunks) = self.hunks.get() {
            return Ok(hunks);
        }
        let hunks = self
            .fragments()?
            .iter()
            .map(|fragment| {
                let text = fragment.read()?;
                let ctx = HunkContext {
                    kind: self.kind,
                    path: fragment.path(),
                    node: &fragment.node,
                };
                self.filters.apply_input(&text, &ctx)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.hunks.get_or_init(|| hunks))
    }

    /// Hunks joined by newlines, after the output phase.
    pub fn combined(&self) -> Result<&str> {
        if let Some(combined) = self.combined.get() {
            return Ok(combined);
        }
        let joined = self.hunks()?.join("\n");
        let combined = self.filters.apply_output(&joined)?;
        Ok(self.combined.get_or_init(|| combined))
    }

    // ========================================================================
    // fingerprints
    // ========================================================================

    /// Modification times of every fragment file, in fragment order.
    pub fn mtimes(&self) -> Result<Vec<SystemTime>> {
        Ok(self
            .fragments()?
            .iter()
            .filter_map(Fragment::path)
            .filter_map(get_mtime)
            .collect())
    }

    /// Lookup cache key: `compressor.<kind>.<digest>`.
    ///
    /// The digest covers the raw content, the render options (xhtml flag
    /// and explicit output name) and the file mtimes.
    pub fn cache_key(&self) -> Result<String> {
        let seed = format!(
            "{}\0{}\0{}",
            self.content,
            self.xhtml,
            self.output_name.as_deref().unwrap_or_default()
        );
        let hash = freshness::hash_with_mtimes(seed.as_bytes(), self.mtimes()?);
        Ok(format!("{CACHE_KEY_PREFIX}{}.{}", self.kind, hash.short()))
    }

    /// Short digest of the combined output.
    pub fn hash(&self) -> Result<String> {
        Ok(freshness::hash_bytes(self.combined()?).short())
    }

    // ========================================================================
    // output
    // ========================================================================

    /// Output file name: explicit name or content hash, plus extension.
    pub fn filename(&self) -> Result<String> {
        let stem = match &self.output_name {
            Some(name) => {
                check_output_name(name)?;
                name.clone()
            }
            None => self.hash()?,
        };
        Ok(format!("{stem}{}", self.kind.extension()))
    }

    /// Path of the output file below the media root, `/`-separated.
    pub fn relative_path(&self) -> Result<String> {
        Ok(format!(
            "{}/{}/{}",
            self.env.config.output_dir.trim_matches('/'),
            self.kind.prefix(),
            self.filename()?
        ))
    }

    /// Public URL of the output file.
    pub fn url(&self) -> Result<String> {
        Ok(format!(
            "{}/{}",
            self.env.config.media_url.trim_end_matches('/'),
            self.relative_path()?
        ))
    }

    /// Write the combined output below the media root, replacing any
    /// existing file.
    pub fn save_file(&self) -> Result<PathBuf> {
        let path = self.env.config.media_root.join(self.relative_path()?);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| CompressError::io(dir, e))?;
        }
        fs::write(&path, self.combined()?).map_err(|e| CompressError::io(&path, e))?;
        log!("write"; "{}", path.display());
        Ok(path)
    }

    /// Original nodes of this kind, one per line.
    ///
    /// Extracted nodes are emitted as extraction left them (a compiled
    /// reference points at its native sibling). References outside the
    /// media url are emitted unchanged rather than dropped.
    pub fn passthrough(&self) -> Result<String> {
        let mut extracted = self.fragments()?.iter();
        let mut lines = Vec::new();
        for node in self
            .nodes
            .iter()
            .filter(|node| fragment::is_candidate(node, self.kind))
        {
            let external = fragment::reference(node)
                .is_some_and(|url| self.env.mapper.resolve(url).is_err());
            let node = if external {
                node
            } else {
                extracted.next().map_or(node, |fragment| &fragment.node)
            };
            lines.push(node.markup_for(self.xhtml));
        }
        Ok(lines.join("\n"))
    }

    /// Reference markup for the output file, writing the file first.
    ///
    /// With compression disabled the fragment nodes are re-emitted instead.
    pub fn output(&self) -> Result<String> {
        if !self.env.config.enabled {
            return self.passthrough();
        }
        self.save_file()?;
        let url = self.url()?;
        let template = match self.kind {
            AssetKind::Css => &self.env.config.templates.css,
            AssetKind::Js => &self.env.config.templates.js,
        };
        Ok(template::render(template, &url, self.xhtml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressConfig;
    use std::path::Path;
    use tempfile::TempDir;

    fn env(root: &Path) -> Environment {
        let mut config = CompressConfig::default();
        config.finalize(root);
        Environment::from_config(config).unwrap()
    }

    #[test]
    fn test_inline_only_output() {
        let dir = TempDir::new().unwrap();
        let env = env(dir.path());
        let c = Compressor::new(&env, AssetKind::Js, "<script>var a = 1;</script>").unwrap();

        assert_eq!(c.combined().unwrap(), "var a = 1;");
        let hash = freshness::hash_bytes("var a = 1;").short();
        assert_eq!(c.filename().unwrap(), format!("{hash}.js"));
        assert_eq!(c.url().unwrap(), format!("/media/CACHE/js/{hash}.js"));

        let out = c.output().unwrap();
        assert_eq!(
            out,
            format!(r#"<script type="text/javascript" src="/media/CACHE/js/{hash}.js"></script>"#)
        );
        let written = dir.path().join(format!("media/CACHE/js/{hash}.js"));
        assert_eq!(fs::read_to_string(written).unwrap(), "var a = 1;");
    }

    #[test]
    fn test_from_prebuilt_nodes() {
        let dir = TempDir::new().unwrap();
        let env = env(dir.path());
        let nodes = vec![
            MarkupNode::new("script", &[], "var a;"),
            MarkupNode::new("script", &[("type", "text/javascript")], "var b;"),
        ];
        let c = Compressor::from_nodes(&env, AssetKind::Js, nodes).unwrap();
        assert_eq!(
            c.content(),
            "<script>var a;</script>\n<script type=\"text/javascript\">var b;</script>"
        );
        assert_eq!(c.combined().unwrap(), "var a;\nvar b;");
    }

    #[test]
    fn test_explicit_output_name() {
        let dir = TempDir::new().unwrap();
        let env = env(dir.path());
        let c = Compressor::new(&env, AssetKind::Css, "<style>p{}</style>")
            .unwrap()
            .output_name(Some("site".into()));
        assert_eq!(c.relative_path().unwrap(), "CACHE/css/site.css");
    }

    #[test]
    fn test_cache_key_shape() {
        let dir = TempDir::new().unwrap();
        let env = env(dir.path());
        let c = Compressor::new(&env, AssetKind::Css, "<style>p{}</style>").unwrap();
        let key = c.cache_key().unwrap();
        assert!(key.starts_with("compressor.css."));
        assert_eq!(key.len(), "compressor.css.".len() + freshness::SHORT_LEN);
    }

    #[test]
    fn test_cache_key_covers_kind_and_options() {
        let dir = TempDir::new().unwrap();
        let env = env(dir.path());
        let block = "<style>p{}</style><script>go()</script>";
        let key = |kind, xhtml, name: Option<&str>| {
            Compressor::new(&env, kind, block)
                .unwrap()
                .xhtml(xhtml)
                .output_name(name.map(Into::into))
                .cache_key()
                .unwrap()
        };

        let css = key(AssetKind::Css, false, None);
        assert_eq!(css, key(AssetKind::Css, false, None));
        assert_ne!(css, key(AssetKind::Js, false, None));
        assert_ne!(css, key(AssetKind::Css, true, None));
        assert_ne!(css, key(AssetKind::Css, false, Some("site")));
        assert_ne!(
            key(AssetKind::Css, false, Some("site")),
            key(AssetKind::Css, false, Some("main"))
        );
    }

    #[test]
    fn test_output_name_must_stay_in_output_dir() {
        assert!(check_output_name("site").is_ok());
        assert!(check_output_name("site.v2").is_ok());
        for name in ["../../x", "a/b", "a\\b", ".."] {
            assert!(
                matches!(check_output_name(name), Err(CompressError::TagSyntax(_))),
                "{name}"
            );
        }

        let dir = TempDir::new().unwrap();
        let env = env(dir.path());
        let c = Compressor::new(&env, AssetKind::Css, "<style>p{}</style>")
            .unwrap()
            .output_name(Some("../../x".into()));
        assert!(matches!(c.output(), Err(CompressError::TagSyntax(_))));
        assert!(!dir.path().join("x.css").exists());
    }

    #[test]
    fn test_unknown_filter_fails_construction() {
        let dir = TempDir::new().unwrap();
        let mut config = CompressConfig {
            js_filters: vec!["jsmin".into()],
            ..CompressConfig::default()
        };
        config.finalize(dir.path());
        let env = Environment::from_config(config).unwrap();
        let result = Compressor::new(&env, AssetKind::Js, "<script></script>");
        assert!(matches!(result, Err(CompressError::Configuration(_))));
    }
}
