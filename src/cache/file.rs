//! On-disk lookup cache shared between CLI runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::LookupCache;
use crate::debug;

/// One cached value.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Expiry (Unix timestamp in seconds)
    expires_at: u64,
    /// Hex-encoded value
    value: String,
}

/// Stores each key as `<dir>/<key>.json`.
///
/// Unreadable, corrupt or expired entries are misses. Write failures are
/// logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_filename(key)))
    }

    fn write(&self, path: &Path, entry: &CacheEntry) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(path, serde_json::to_vec(entry)?)?;
        Ok(())
    }
}

impl LookupCache for FileCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key);
        let content = fs::read(&path).ok()?;
        let entry: CacheEntry = serde_json::from_slice(&content).ok()?;

        if now() >= entry.expires_at {
            let _ = fs::remove_file(&path);
            return None;
        }
        hex::decode(entry.value).ok()
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) {
        let path = self.entry_path(key);
        let entry = CacheEntry {
            expires_at: now().saturating_add(ttl.as_secs()),
            value: hex::encode(value),
        };
        if let Err(e) = self.write(&path, &entry) {
            debug!("cache"; "failed to write {}: {}", path.display(), e);
        }
    }
}

/// Unix timestamp in seconds
fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`.
fn safe_filename(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache");

        FileCache::new(&cache_dir).set("compressor.0123abcd4567", b"<script>", Duration::from_secs(60));
        assert!(cache_dir.join("compressor.0123abcd4567.json").exists());

        let value = FileCache::new(&cache_dir).get("compressor.0123abcd4567");
        assert_eq!(value.as_deref(), Some(&b"<script>"[..]));
    }

    #[test]
    fn test_expired_and_corrupt_are_misses() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());

        cache.set("expired", b"x", Duration::ZERO);
        assert!(cache.get("expired").is_none());
        assert!(!dir.path().join("expired.json").exists());

        fs::write(dir.path().join("corrupt.json"), "not json").unwrap();
        assert!(cache.get("corrupt").is_none());
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("compressor.abc"), "compressor.abc");
        assert_eq!(safe_filename("a/b:c"), "a_b_c");
    }
}
