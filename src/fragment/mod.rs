//! Fragment extraction: turn markup nodes into compressible units.
//!
//! # Module Structure
//!
//! ```text
//! fragment/
//! ├── css.rs       # link[rel=stylesheet] + style, with compilation
//! ├── js.rs        # script[src] + inline script
//! ├── resolve.rs   # PathMapper (media_url ↔ media_root)
//! └── mod.rs       # Fragment, AssetKind, extract() (this file)
//! ```

mod css;
mod js;
mod resolve;

pub use resolve::PathMapper;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::compiler::Compilers;
use crate::debug;
use crate::error::{CompressError, Result};
use crate::markup::MarkupNode;

// ============================================================================
// AssetKind
// ============================================================================

/// Asset kind handled by a compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Css,
    Js,
}

impl AssetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    /// Native extension, with the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Css => ".css",
            Self::Js => ".js",
        }
    }

    /// Output subdirectory below the output dir.
    pub const fn prefix(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "css" => Ok(Self::Css),
            "js" => Ok(Self::Js),
            other => Err(CompressError::TagSyntax(format!(
                "kind must be 'js' or 'css', got '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Fragment
// ============================================================================

/// Where a fragment's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentSource {
    /// Read from this file when the hunk is built.
    File(PathBuf),
    /// Literal (or already compiled) text.
    Inline(String),
}

/// One compressible unit of style or script content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: AssetKind,
    pub source: FragmentSource,
    /// File an inline fragment was compiled from in-process.
    pub origin_file: Option<PathBuf>,
    /// Node this fragment was extracted from.
    pub node: MarkupNode,
}

impl Fragment {
    pub fn file(kind: AssetKind, path: PathBuf, node: MarkupNode) -> Self {
        Self {
            kind,
            source: FragmentSource::File(path),
            origin_file: None,
            node,
        }
    }

    pub fn inline(kind: AssetKind, text: String, node: MarkupNode) -> Self {
        Self {
            kind,
            source: FragmentSource::Inline(text),
            origin_file: None,
            node,
        }
    }

    /// Inline fragment holding text compiled from `origin`.
    pub fn compiled(kind: AssetKind, text: String, origin: PathBuf, node: MarkupNode) -> Self {
        Self {
            kind,
            source: FragmentSource::Inline(text),
            origin_file: Some(origin),
            node,
        }
    }

    /// File backing this fragment, if any.
    ///
    /// This is the file whose mtime feeds the cache key.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FragmentSource::File(path) => Some(path),
            FragmentSource::Inline(_) => self.origin_file.as_deref(),
        }
    }

    /// Fragment text: file contents, or the inline text.
    pub fn read(&self) -> Result<String> {
        match &self.source {
            FragmentSource::File(path) => {
                let bytes = fs::read(path).map_err(|e| CompressError::io(path, e))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            FragmentSource::Inline(text) => Ok(text.clone()),
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Collaborators the extractors need.
pub struct ExtractContext<'a> {
    pub mapper: &'a PathMapper,
    pub compilers: &'a Compilers,
    /// Strict mode: unresolvable assets abort instead of being dropped.
    pub strict: bool,
}

/// Extract fragments of `kind` from `nodes`, in document order.
pub fn extract(nodes: &[MarkupNode], kind: AssetKind, ctx: &ExtractContext) -> Result<Vec<Fragment>> {
    match kind {
        AssetKind::Css => css::extract(nodes, ctx),
        AssetKind::Js => js::extract(nodes, ctx),
    }
}

/// Whether `node` is extracted by the `kind` extractor.
pub fn is_candidate(node: &MarkupNode, kind: AssetKind) -> bool {
    match (kind, node.tag()) {
        (AssetKind::Css, "link") => css::is_stylesheet(node),
        (AssetKind::Css, "style") | (AssetKind::Js, "script") => true,
        _ => false,
    }
}

/// URL a linking node points at: `href` of a link (empty when missing),
/// `src` of a script. `None` for inline nodes.
pub fn reference(node: &MarkupNode) -> Option<&str> {
    match node.tag() {
        "link" => Some(node.attr("href").unwrap_or_default()),
        "script" => node.attr("src"),
        _ => None,
    }
}

/// Drop unresolvable fragments unless strict.
fn lenient(ctx: &ExtractContext, result: Result<Fragment>) -> Result<Option<Fragment>> {
    match result {
        Ok(fragment) => Ok(Some(fragment)),
        Err(err) if err.is_unresolvable() && !ctx.strict => {
            debug!("extract"; "skipping: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
