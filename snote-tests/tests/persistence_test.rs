/// Persistence of the file-backed store across restarts

use snote_api::{DocumentStore, FileStore, StoreConfig};
use snote_core::KvStore;
use snote_test_utils::{share_batch, TestStore};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_documents_survive_reopen() {
    let store = TestStore::new();
    let ids = share_batch(&store.docs, 10);
    store.docs.load(&ids[3]).unwrap();

    let store = store.reopen();
    assert_eq!(store.docs.list().unwrap().len(), 10);
    assert_eq!(store.docs.peek(&ids[3]).unwrap().unwrap().views, 1);
    assert_eq!(store.docs.load(&ids[3]).unwrap().unwrap().views, 2);
}

#[test]
fn test_file_layout_is_plain_json() {
    let store = TestStore::new();
    let id = store.docs.create_at("Title", "<p>x</p>", 1_700_000_000_000).unwrap();
    store.docs.save_draft_at("D", "<p>d</p>", 5).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    let entries: BTreeMap<String, String> = serde_json::from_str(&text).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&entries[&format!("doc#{}", id)]).unwrap();
    assert_eq!(doc["title"], "Title");
    assert_eq!(doc["content"], "<p>x</p>");
    assert_eq!(doc["timestamp"], 1_700_000_000_000i64);
    assert_eq!(doc["views"], 0);

    let draft: serde_json::Value = serde_json::from_str(&entries["draft#current"]).unwrap();
    assert_eq!(draft["title"], "D");
    assert!(draft.get("views").is_none());
}

#[test]
fn test_records_without_views_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    let record = serde_json::json!({
        "title": "Old",
        "content": "<p>legacy</p>",
        "timestamp": 1
    });
    let mut entries = BTreeMap::new();
    entries.insert("doc#legacy1".to_string(), record.to_string());
    fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

    let docs = DocumentStore::open_file(&path, StoreConfig::default()).unwrap();
    let record = docs.load(&"legacy1".into()).unwrap().unwrap();
    assert_eq!(record.title, "Old");
    assert_eq!(record.views, 1);
}

#[test]
fn test_missing_directories_are_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("store.json");

    let docs = DocumentStore::open_file(&path, StoreConfig::default()).unwrap();
    docs.create("t", "c").unwrap();
    assert!(path.exists());
}

#[test]
fn test_empty_file_opens_as_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, "   \n").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_failed_write_leaves_file_untouched() {
    let config = StoreConfig::new().with_max_total_bytes(2048);
    let store = TestStore::with_config(config);
    let id = store.docs.create("small", "<p>fits</p>").unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    assert!(store.docs.create("big", &"x".repeat(4096)).is_err());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);

    let store = store.reopen();
    assert_eq!(store.docs.list().unwrap().len(), 1);
    assert!(store.docs.exists(&id).unwrap());
}

#[test]
fn test_no_temporary_files_left_behind() {
    let store = TestStore::new();
    share_batch(&store.docs, 20);

    let dir = store.path().parent().unwrap();
    let files: Vec<_> = fs::read_dir(dir).unwrap().collect();
    assert_eq!(files.len(), 1);
}
