//! In-process lookup cache.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::LookupCache;

/// Entries expire lazily, on the first read past their deadline.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, (Instant, Vec<u8>)>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LookupCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.entries.get(key)?;
        let (deadline, value) = entry.value();
        if Instant::now() < *deadline {
            return Some(value.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) {
        let deadline = Instant::now() + ttl;
        self.entries.insert(key.to_owned(), (deadline, value.to_vec()));
    }
}
