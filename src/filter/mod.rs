//! Filter chains applied to hunks and to the combined output.
//!
//! # Module Structure
//!
//! ```text
//! filter/
//! ├── builtin/     # css_absolute, css_media, css_min, js_min
//! ├── chain.rs     # FilterChain (ordered input/output phases)
//! ├── registry.rs  # FilterRegistry (name → filter)
//! └── mod.rs       # Filter trait, HunkContext (this file)
//! ```
//!
//! A filter may implement either phase. The trait defaults return
//! `Ok(None)`, which the chain treats as "phase not implemented" and
//! passes the text through unchanged.

mod builtin;
mod chain;
mod registry;

pub use builtin::{CssAbsolute, CssMedia, CssMin, JsMin};
pub use chain::FilterChain;
pub use registry::{BUILTIN_FILTERS, FilterRegistry};

use std::path::Path;

use crate::fragment::AssetKind;
use crate::markup::MarkupNode;

/// Per-fragment context handed to the input phase.
#[derive(Debug, Clone, Copy)]
pub struct HunkContext<'a> {
    pub kind: AssetKind,
    /// File the hunk was read or compiled from.
    pub path: Option<&'a Path>,
    /// Node the hunk was extracted from.
    pub node: &'a MarkupNode,
}

/// A named content transformation.
pub trait Filter: Send + Sync {
    /// Transform one fragment's text.
    fn input(&self, _content: &str, _ctx: &HunkContext) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    /// Transform the joined output.
    fn output(&self, _content: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}
