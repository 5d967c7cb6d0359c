//! Persistencia del caché de ofertas.
//!
//! The cache is a pure optimization: an unreadable or unwritable backing
//! document must never abort a caller. Read degrades to "absent", write
//! degrades to a logged no-op.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::OfferingCache;

pub const DEFAULT_CACHE_PATH: &str = "data/offering_cache.json";

/// Narrow storage interface so the resolver can run against an in-memory
/// store in tests. `read` returns `None` for a missing, unparseable or
/// wrong-shape document; `write` reports success but never errors out of
/// the caller.
pub trait OfferingStore {
    fn read(&self) -> Option<OfferingCache>;
    fn write(&self, cache: &OfferingCache) -> bool;
}

/// JSON document on disk at a fixed relative path.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> FileStore {
        FileStore { path: path.as_ref().to_path_buf() }
    }

    /// Honors OFFERING_CACHE_PATH, defaulting to `data/offering_cache.json`.
    pub fn from_env() -> FileStore {
        let _ = dotenv::dotenv();
        let path = std::env::var("OFFERING_CACHE_PATH")
            .unwrap_or_else(|_| DEFAULT_CACHE_PATH.to_string());
        FileStore::new(path)
    }
}

impl OfferingStore for FileStore {
    fn read(&self) -> Option<OfferingCache> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<OfferingCache>(&contents) {
            Ok(cache) => Some(cache),
            Err(e) => {
                log::warn!(
                    "offering cache at {} not parseable ({}); treating as absent",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn write(&self, cache: &OfferingCache) -> bool {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                if let Err(e) = fs::create_dir_all(dir) {
                    log::warn!("could not create cache dir {}: {}", dir.display(), e);
                    return false;
                }
            }
        }

        let text = match serde_json::to_string_pretty(cache) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("could not serialize offering cache: {}", e);
                return false;
            }
        };

        match fs::write(&self.path, text) {
            Ok(()) => true,
            Err(e) => {
                // Read-only filesystem lands here; execution continues.
                log::warn!("could not persist offering cache to {}: {}", self.path.display(), e);
                false
            }
        }
    }
}

/// In-memory store for tests and embedded use.
pub struct MemoryStore {
    inner: Mutex<Option<OfferingCache>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore { inner: Mutex::new(None) }
    }

    pub fn with_cache(cache: OfferingCache) -> MemoryStore {
        MemoryStore { inner: Mutex::new(Some(cache)) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl OfferingStore for MemoryStore {
    fn read(&self) -> Option<OfferingCache> {
        self.inner.lock().expect("memory store mutex poisoned").clone()
    }

    fn write(&self, cache: &OfferingCache) -> bool {
        *self.inner.lock().expect("memory store mutex poisoned") = Some(cache.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_file_is_absent() {
        let store = FileStore::new("data/definitely_not_here_12345.json");
        assert!(store.read().is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.read().is_none());

        let mut cache = OfferingCache::empty();
        cache.semesters.insert("2024-fall".to_string(), vec!["CMPT 120".to_string()]);
        assert!(store.write(&cache));

        let back = store.read().expect("cache must be present after write");
        assert_eq!(back.semesters["2024-fall"], vec!["CMPT 120"]);
    }
}
