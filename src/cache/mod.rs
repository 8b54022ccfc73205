//! Lookup cache for rendered reference markup.
//!
//! # Module Structure
//!
//! ```text
//! cache/
//! ├── file.rs     # FileCache (one JSON entry per key on disk)
//! ├── memory.rs   # MemoryCache (in-process, dashmap)
//! └── mod.rs      # LookupCache trait, NullCache (this file)
//! ```
//!
//! Keys are the cache keys computed by the compressor; values are the
//! rendered output bytes. Every `set` carries a time-to-live.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use std::time::Duration;

/// Key/value store consulted before rendering.
pub trait LookupCache: Send + Sync {
    /// Stored value, unless missing or expired.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: &[u8], ttl: Duration);
}

/// Never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl LookupCache for NullCache {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) {}
}
