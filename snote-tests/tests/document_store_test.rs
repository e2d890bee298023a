/// Shared-document behaviour: creation, view counting, lookup by link

use snote_api::{parse_target, share_url, DocId, IdScheme, StoreConfig};
use snote_test_utils::{assert_record, memory_store, share_batch, TestStore};

#[test]
fn test_round_trip_counts_one_view() {
    let store = TestStore::new();
    let id = store.docs.create("Weekend", "<p>hike <b>Sunday</b></p>").unwrap();

    let record = store.docs.load(&id).unwrap().unwrap();
    assert_record(&record, "Weekend", "<p>hike <b>Sunday</b></p>", 1);
}

#[test]
fn test_second_load_counts_again() {
    let store = TestStore::new();
    let id = store.docs.create("t", "c").unwrap();

    assert_eq!(store.docs.load(&id).unwrap().unwrap().views, 1);
    assert_eq!(store.docs.load(&id).unwrap().unwrap().views, 2);
}

#[test]
fn test_unknown_identifier_is_not_found() {
    let store = TestStore::new();
    share_batch(&store.docs, 3);

    let result = store.docs.load(&DocId::from("zzzzzzzzzzzz"));
    assert!(matches!(result, Ok(None)));
}

#[test]
fn test_share_link_resolves_to_document() {
    let docs = memory_store();
    let id = docs.create("Link", "<p>body</p>").unwrap();
    let url = share_url("https://notes.example/index.html", &id);

    let target = parse_target(&url).unwrap().unwrap();
    assert_eq!(target, id);
    assert_eq!(docs.load(&target).unwrap().unwrap().title, "Link");
}

#[test]
fn test_views_are_per_document() {
    let docs = memory_store();
    let ids = share_batch(&docs, 3);

    docs.load(&ids[0]).unwrap();
    docs.load(&ids[0]).unwrap();
    docs.load(&ids[2]).unwrap();

    assert_eq!(docs.peek(&ids[0]).unwrap().unwrap().views, 2);
    assert_eq!(docs.peek(&ids[1]).unwrap().unwrap().views, 0);
    assert_eq!(docs.peek(&ids[2]).unwrap().unwrap().views, 1);
}

#[test]
fn test_list_orders_newest_first() {
    let docs = memory_store();
    let ids = share_batch(&docs, 5);

    let listed: Vec<DocId> = docs.list().unwrap().into_iter().map(|(id, _)| id).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);
}

#[test]
fn test_timestamp_suffix_ids() {
    let config = StoreConfig::new().with_id_scheme(IdScheme::Random {
        length: 12,
        timestamp_suffix: true,
    });
    let store = TestStore::with_config(config);

    let id = store.docs.create_at("t", "c", 1609459200000).unwrap();
    assert!(id.as_str().ends_with("kjdigao0"));
    assert_eq!(store.docs.load(&id).unwrap().unwrap().views, 1);
}

#[test]
fn test_encoded_ids_round_trip() {
    let config = StoreConfig::new().with_id_scheme(IdScheme::Encoded { length: 16 });
    let store = TestStore::with_config(config);

    let id = store.docs.create_at("Encoded", "<p>payload</p>", 1).unwrap();
    assert_eq!(id.as_str().len(), 16);

    let record = store.docs.load(&id).unwrap().unwrap();
    assert_record(&record, "Encoded", "<p>payload</p>", 1);
}

#[test]
fn test_custom_prefix_layout() {
    let config = StoreConfig::new()
        .with_document_prefix("shared_doc_")
        .with_draft_key("editor_draft");
    let store = TestStore::with_config(config);

    let id = store.docs.create("t", "c").unwrap();
    store.docs.save_draft("d", "x").unwrap();

    let mut keys = snote_core::KvStore::keys(store.docs.backend()).unwrap();
    keys.sort();
    assert_eq!(keys, vec!["editor_draft".to_string(), format!("shared_doc_{}", id)]);
}

#[test]
fn test_encoded_ids_never_replace_other_notes() {
    let config = StoreConfig::new().with_id_scheme(IdScheme::Encoded { length: 16 });
    let store = TestStore::with_config(config);
    let ts = 1_700_000_000_000;

    let first = store.docs.create_at("Groceries", "<p>eggs</p>", ts).unwrap();
    let second = store.docs.create_at("Secrets!!", "<p>pass</p>", ts).unwrap();
    assert_ne!(first, second);

    let store = store.reopen();
    assert_record(&store.docs.load(&first).unwrap().unwrap(), "Groceries", "<p>eggs</p>", 1);
    assert_record(&store.docs.load(&second).unwrap().unwrap(), "Secrets!!", "<p>pass</p>", 1);
}
