use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser local storage quota most engines enforce per origin
pub const DEFAULT_MAX_TOTAL_BYTES: usize = 5 * 1024 * 1024;

/// How identifiers for shared documents are minted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdScheme {
    /// Random lowercase alphanumeric id, optionally followed by the
    /// creation time in base 36
    Random { length: usize, timestamp_suffix: bool },
    /// Trailing characters of the base64 encoding of the whole payload
    Encoded { length: usize },
}

impl Default for IdScheme {
    fn default() -> Self {
        IdScheme::Random {
            length: 12,
            timestamp_suffix: false,
        }
    }
}

/// Store configuration: key layout, identifier scheme and autosave timing
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Prefix prepended to a document id to form its storage key
    pub document_prefix: String,

    /// Storage key of the single draft slot
    pub draft_key: String,

    /// Identifier scheme for newly shared documents
    pub id_scheme: IdScheme,

    /// Quiet period after the last edit before the draft is written
    pub draft_debounce: Duration,

    /// Maximum bytes of keys and values (None = unlimited)
    pub max_total_bytes: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document_prefix: "doc#".to_string(),
            draft_key: "draft#current".to_string(),
            id_scheme: IdScheme::default(),
            draft_debounce: Duration::from_millis(1000),
            max_total_bytes: Some(DEFAULT_MAX_TOTAL_BYTES),
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document key prefix
    pub fn with_document_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.document_prefix = prefix.into();
        self
    }

    /// Set the draft slot key
    pub fn with_draft_key(mut self, key: impl Into<String>) -> Self {
        self.draft_key = key.into();
        self
    }

    /// Set the identifier scheme
    pub fn with_id_scheme(mut self, scheme: IdScheme) -> Self {
        self.id_scheme = scheme;
        self
    }

    /// Set the autosave quiet period
    pub fn with_draft_debounce(mut self, delay: Duration) -> Self {
        self.draft_debounce = delay;
        self
    }

    /// Set the byte quota
    pub fn with_max_total_bytes(mut self, bytes: usize) -> Self {
        self.max_total_bytes = Some(bytes);
        self
    }

    /// Remove the byte quota
    pub fn unlimited(mut self) -> Self {
        self.max_total_bytes = None;
        self
    }

    /// Storage key for a document id
    pub fn document_key(&self, id: &str) -> String {
        format!("{}{}", self.document_prefix, id)
    }

    /// Document id for a storage key, if the key belongs to a document
    pub fn document_id<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.document_prefix.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.document_prefix.is_empty() {
            return Err("document_prefix must not be empty".to_string());
        }

        if self.draft_key.is_empty() {
            return Err("draft_key must not be empty".to_string());
        }

        if self.draft_key.starts_with(&self.document_prefix) {
            return Err("draft_key must not start with document_prefix".to_string());
        }

        match self.id_scheme {
            IdScheme::Random { length, .. } if !(4..=64).contains(&length) => {
                return Err("random id length must be between 4 and 64".to_string());
            }
            IdScheme::Encoded { length } if !(8..=128).contains(&length) => {
                return Err("encoded id length must be between 8 and 128".to_string());
            }
            _ => {}
        }

        if let Some(bytes) = self.max_total_bytes {
            if bytes == 0 {
                return Err("max_total_bytes must be greater than 0 when set".to_string());
            }
        }

        Ok(())
    }
}
