//! compressor - combine linked and inline CSS/JS into one cached file.
//!
//! A block of `<link>`, `<style>` and `<script>` markup is split into
//! fragments, compiled where needed, filtered, concatenated and written to
//! a content-addressed file below the media root. The block is replaced by
//! a single reference to that file.
//!
//! ```text
//! markup ─► fragment ─► compiler ─► filter ─► compressor ─► cache
//! ```
//!
//! # Example
//!
//! ```no_run
//! use compressor::{CompressNode, Environment, config::CompressConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = CompressConfig::load("compress.toml".as_ref())?;
//! let env = Environment::from_config(config)?;
//! let node = CompressNode::parse("compress css")?;
//! let html = node.render(
//!     r#"<link rel="stylesheet" href="/media/css/one.css" type="text/css">"#,
//!     &env,
//! )?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```

pub mod logger;

pub mod cache;
pub mod compiler;
pub mod compressor;
pub mod config;
pub mod error;
pub mod filter;
pub mod fragment;
pub mod freshness;
pub mod markup;
pub mod node;

pub use compressor::{Compressor, Environment};
pub use error::{CompressError, Result};
pub use fragment::{AssetKind, Fragment, FragmentSource, PathMapper};
pub use markup::MarkupNode;
pub use node::CompressNode;
