use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

/// Identifier of a shared document, as it appears in the URL fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        DocId(s)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        DocId(s.to_string())
    }
}

impl AsRef<str> for DocId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A shared document
///
/// Written once when shared; afterwards only `views` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    /// HTML body, stored verbatim
    pub content: String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub views: u64,
}

impl DocumentRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp,
            views: 0,
        }
    }

    /// Count one view
    pub fn record_view(&mut self) {
        self.views = self.views.saturating_add(1);
    }
}

/// The autosaved working copy (one per store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub title: String,
    pub content: String,
    pub timestamp: Timestamp,
}

impl DraftRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}
