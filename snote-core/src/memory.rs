/// In-memory key-value store for tests and throwaway sessions
///
/// All data is lost when the last clone of the MemoryStore is dropped.

use crate::{kv::{self, KvStore}, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

struct MemoryInner {
    entries: BTreeMap<String, String>,
    used_bytes: usize,
    max_bytes: Option<usize>,
}

/// In-memory store; clones share the same entries
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemoryStore {
    /// Create an empty store with no quota
    pub fn new() -> Self {
        Self::with_quota(None)
    }

    /// Create an empty store limited to `max_bytes` of keys and values
    pub fn with_quota(max_bytes: Option<usize>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryInner {
                entries: BTreeMap::new(),
                used_bytes: 0,
                max_bytes,
            })),
        }
    }

    /// Bytes currently charged against the quota
    pub fn used_bytes(&self) -> usize {
        self.inner.read().used_bytes
    }

    /// Remove every entry
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.used_bytes = 0;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut inner = self.inner.write();
        let next = kv::check_quota(&inner.entries, inner.used_bytes, inner.max_bytes, key, &value)?;

        debug!("memory store set {} ({} bytes)", key, value.len());
        inner.entries.insert(key.to_string(), value);
        inner.used_bytes = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.entries.remove(key) {
            Some(old) => {
                inner.used_bytes -= kv::entry_size(key, &old);
                debug!("memory store removed {}", key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.inner.read().entries.keys().cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.inner.read().entries.len())
    }
}
