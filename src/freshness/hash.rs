//! Content fingerprints using blake3.
//!
//! Two fingerprints are derived here:
//! the cache key hashes the raw markup plus file mtimes, the output name
//! hashes the final filtered bytes.

use std::time::{SystemTime, UNIX_EPOCH};

/// Number of hex chars kept for cache keys and output names.
pub const SHORT_LEN: usize = 12;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Truncated hex digest used in file names and cache keys.
    pub fn short(self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_LEN);
        hex
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Hash a byte slice.
pub fn hash_bytes<T: AsRef<[u8]> + ?Sized>(data: &T) -> ContentHash {
    ContentHash::new(*blake3::hash(data.as_ref()).as_bytes())
}

/// Hash `seed` followed by the textual form of each mtime, in order.
///
/// Equivalent to hashing the concatenation `seed ++ mtime_1 ++ mtime_2 ...`.
pub fn hash_with_mtimes<I>(seed: &[u8], mtimes: I) -> ContentHash
where
    I: IntoIterator<Item = SystemTime>,
{
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed);
    for mtime in mtimes {
        hasher.update(format_mtime(mtime).as_bytes());
    }
    ContentHash::new(*hasher.finalize().as_bytes())
}

/// Seconds since the epoch with nanosecond fraction, e.g. `1700000000.000000123`.
pub fn format_mtime(mtime: SystemTime) -> String {
    match mtime.duration_since(UNIX_EPOCH) {
        Ok(d) => format!("{}.{:09}", d.as_secs(), d.subsec_nanos()),
        Err(e) => {
            let d = e.duration();
            format!("-{}.{:09}", d.as_secs(), d.subsec_nanos())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_short_digest() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(hash.short(), "abababababab");
        assert_eq!(format!("{hash}"), "abababababab");
    }

    #[test]
    fn test_hash_bytes_is_deterministic() {
        assert_eq!(hash_bytes("body{}"), hash_bytes(b"body{}"));
        assert_ne!(hash_bytes("body{}"), hash_bytes("body{ }"));
    }

    #[test]
    fn test_mtimes_change_hash() {
        let t1 = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let t2 = t1 + Duration::from_nanos(1);

        let a = hash_with_mtimes(b"block", [t1]);
        assert_eq!(a, hash_with_mtimes(b"block", [t1]));
        assert_ne!(a, hash_with_mtimes(b"block", [t2]));
        assert_ne!(a, hash_with_mtimes(b"block", []));
        assert_ne!(a, hash_with_mtimes(b"other", [t1]));
    }

    #[test]
    fn test_mtimes_hash_equals_concatenation() {
        let t = UNIX_EPOCH + Duration::from_millis(1500);
        let concat = format!("seed{}", format_mtime(t));
        assert_eq!(hash_with_mtimes(b"seed", [t]), hash_bytes(&concat));
    }

    #[test]
    fn test_format_mtime() {
        let t = UNIX_EPOCH + Duration::from_millis(1500);
        assert_eq!(format_mtime(t), "1.500000000");
    }
}
