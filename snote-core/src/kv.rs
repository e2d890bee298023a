/// String key-value storage
///
/// Records are stored as JSON text under string keys, the same contract a
/// browser's local storage offers. Backends: [`crate::memory::MemoryStore`]
/// and [`crate::file::FileStore`].

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; returns whether it was present
    fn remove(&self, key: &str) -> Result<bool>;

    /// All keys, in ascending order
    fn keys(&self) -> Result<Vec<String>>;

    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// Bytes charged against a quota for one entry
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Bytes used by every entry in `entries`
pub(crate) fn usage(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| entry_size(k, v)).sum()
}

/// Check that replacing `key` with `value` keeps `entries` within `limit`
pub(crate) fn check_quota(
    entries: &BTreeMap<String, String>,
    used: usize,
    limit: Option<usize>,
    key: &str,
    value: &str,
) -> Result<usize> {
    let previous = entries.get(key).map(|v| entry_size(key, v)).unwrap_or(0);
    let next = used - previous + entry_size(key, value);

    match limit {
        Some(max) if next > max => Err(Error::QuotaExceeded(format!(
            "writing {} would use {} of {} bytes",
            key, next, max
        ))),
        _ => Ok(next),
    }
}
