/// File-backed key-value store
///
/// The whole store is one JSON object (`{"key": "value", ...}`) on disk,
/// loaded when opened and rewritten on every mutation. Writes go to a
/// temporary file in the same directory which is then renamed over the
/// old one, so a crash leaves either the old or the new contents.

use crate::{kv::{self, KvStore}, Error, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

struct FileInner {
    entries: BTreeMap<String, String>,
    used_bytes: usize,
    max_bytes: Option<usize>,
}

/// Store persisted to a single JSON file; clones share the same state
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
    inner: Arc<RwLock<FileInner>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_quota(path, None)
    }

    /// Open the store at `path` with a byte quota on keys and values
    pub fn open_with_quota(path: impl AsRef<Path>, max_bytes: Option<usize>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = Self::read_entries(&path)?;
        let used_bytes = kv::usage(&entries);

        info!("Opened store {:?} ({} entries, {} bytes)", path, entries.len(), used_bytes);

        Ok(Self {
            path,
            inner: Arc::new(RwLock::new(FileInner {
                entries,
                used_bytes,
                max_bytes,
            })),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes currently charged against the quota
    pub fn used_bytes(&self) -> usize {
        self.inner.read().used_bytes
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Corruption(format!("{}: {}", path.display(), e)))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer(&mut tmp, entries)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut inner = self.inner.write();
        let next = kv::check_quota(&inner.entries, inner.used_bytes, inner.max_bytes, key, &value)?;

        // Persist first so a failed write leaves memory and disk in agreement
        let mut updated = inner.entries.clone();
        updated.insert(key.to_string(), value);
        self.write_entries(&updated)?;

        debug!("file store set {} ({} bytes used)", key, next);
        inner.entries = updated;
        inner.used_bytes = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        let Some(old) = inner.entries.get(key) else {
            return Ok(false);
        };
        let freed = kv::entry_size(key, old);

        let mut updated = inner.entries.clone();
        updated.remove(key);
        self.write_entries(&updated)?;

        debug!("file store removed {}", key);
        inner.entries = updated;
        inner.used_bytes -= freed;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.inner.read().entries.keys().cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.inner.read().entries.len())
    }
}
