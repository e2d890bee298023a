/// Test utilities and helpers for sharenote testing
///
/// This module provides common test utilities to simplify writing tests.

use snote_api::{DocId, DocumentRecord, DocumentStore, FileStore, MemoryStore, StoreConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// File-backed test store that manages its temporary directory
pub struct TestStore {
    pub docs: DocumentStore<FileStore>,
    pub path: PathBuf,
    config: StoreConfig,
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Create a new store file inside a fresh temporary directory
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a new store with a custom configuration
    pub fn with_config(config: StoreConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        let docs = DocumentStore::open_file(&path, config.clone()).expect("Failed to open store");

        Self {
            docs,
            path,
            config,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Open a store at a specific path (the directory is not cleaned up)
    pub fn open(path: PathBuf) -> Self {
        let config = StoreConfig::default();
        let docs = DocumentStore::open_file(&path, config.clone()).expect("Failed to open store");

        Self {
            docs,
            path,
            config,
            _temp_dir: None,
        }
    }

    /// Get the store file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Drop the handle and open the same file again (for testing persistence)
    pub fn reopen(self) -> Self {
        let Self { docs, path, config, _temp_dir } = self;
        drop(docs);
        let docs = DocumentStore::open_file(&path, config.clone()).expect("Failed to reopen store");

        Self {
            docs,
            path,
            config,
            _temp_dir,
        }
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory store with default configuration and no quota
pub fn memory_store() -> DocumentStore<MemoryStore> {
    DocumentStore::new(MemoryStore::new(), StoreConfig::default().unlimited())
        .expect("Failed to create store")
}

/// Mock note generator for testing
pub struct MockNoteGenerator {
    counter: u64,
}

impl MockNoteGenerator {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Next (title, content) pair
    pub fn next_note(&mut self) -> (String, String) {
        let idx = self.counter;
        self.counter += 1;
        (
            format!("Note {}", idx),
            format!("<h1>Note {}</h1><p>body of note {}</p>", idx, idx),
        )
    }

    /// Note whose content is roughly `bytes` long
    pub fn sized_note(&mut self, bytes: usize) -> (String, String) {
        let idx = self.counter;
        self.counter += 1;
        (format!("Sized {}", idx), format!("<p>{}</p>", "x".repeat(bytes)))
    }
}

impl Default for MockNoteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Share `count` generated notes, returning their ids in creation order
pub fn share_batch<S: snote_core::KvStore>(docs: &DocumentStore<S>, count: usize) -> Vec<DocId> {
    let mut gen = MockNoteGenerator::new();
    (0..count)
        .map(|i| {
            let (title, content) = gen.next_note();
            docs.create_at(&title, &content, 1_600_000_000_000 + i as i64)
                .expect("Failed to share")
        })
        .collect()
}

/// Assert a record's title, content and view count
pub fn assert_record(record: &DocumentRecord, title: &str, content: &str, views: u64) {
    assert_eq!(record.title, title, "title mismatch");
    assert_eq!(record.content, content, "content mismatch");
    assert_eq!(record.views, views, "views mismatch");
}
