//! Freshness detection: blake3 fingerprints for cache keys and output names,
//! mtime comparison for compiled siblings.

mod hash;
pub mod mtime;

pub use hash::{ContentHash, SHORT_LEN, format_mtime, hash_bytes, hash_with_mtimes};
pub use mtime::{get_mtime, is_newer_than, needs_recompile};
