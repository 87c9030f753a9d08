//! Store contract tests
//!
//! The same assertions run against both backends so the engine can treat
//! them interchangeably.

use pht_common::store::{MemoryStore, SqliteStore};
use pht_common::{Document, Store};
use serde_json::json;
use tempfile::TempDir;

fn doc(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("test document must be a JSON object, got {}", other),
    }
}

async fn sqlite_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().expect("Should create temp dir");
    let store = SqliteStore::open(&dir.path().join("store.db"))
        .await
        .expect("Should open sqlite store");
    (store, dir)
}

// ============================================================================
// Contract assertions, shared by both backends
// ============================================================================

async fn check_set_get_roundtrip(store: &dyn Store) {
    let written = doc(json!({"name": "alice", "marks": 7}));
    store
        .set("roundtrip", "alice", written.clone())
        .await
        .expect("Should set");

    let read = store
        .get("roundtrip", "alice")
        .await
        .expect("Should get")
        .expect("Document should exist");
    assert_eq!(read, written);

    assert!(store
        .get("roundtrip", "nobody")
        .await
        .expect("Should get")
        .is_none());
    assert!(store
        .get("empty_collection", "alice")
        .await
        .expect("Should get")
        .is_none());
}

async fn check_set_replaces_whole_document(store: &dyn Store) {
    store
        .set("replace", "k", doc(json!({"a": 1, "b": 2})))
        .await
        .expect("Should set");
    store
        .set("replace", "k", doc(json!({"c": 3})))
        .await
        .expect("Should set");

    let read = store
        .get("replace", "k")
        .await
        .expect("Should get")
        .expect("Document should exist");
    assert_eq!(read, doc(json!({"c": 3})));
}

async fn check_merge_preserves_unrelated_fields(store: &dyn Store) {
    store
        .set(
            "merge",
            "k",
            doc(json!({"votedFor": "bob", "immune": false, "marks": 9})),
        )
        .await
        .expect("Should set");

    let merged = store
        .merge("merge", "k", doc(json!({"immune": true})))
        .await
        .expect("Should merge");

    assert_eq!(
        merged,
        doc(json!({"votedFor": "bob", "immune": true, "marks": 9}))
    );
    // and the stored document matches what merge returned
    let read = store
        .get("merge", "k")
        .await
        .expect("Should get")
        .expect("Document should exist");
    assert_eq!(read, merged);
}

async fn check_merge_creates_missing_document(store: &dyn Store) {
    let merged = store
        .merge("merge_create", "fresh", doc(json!({"x": 1})))
        .await
        .expect("Should merge");
    assert_eq!(merged, doc(json!({"x": 1})));

    let read = store
        .get("merge_create", "fresh")
        .await
        .expect("Should get")
        .expect("Document should exist");
    assert_eq!(read, merged);
}

async fn check_delete(store: &dyn Store) {
    store
        .set("del", "k", doc(json!({"x": 1})))
        .await
        .expect("Should set");

    assert!(store.delete("del", "k").await.expect("Should delete"));
    assert!(store
        .get("del", "k")
        .await
        .expect("Should get")
        .is_none());
    // second delete reports absence
    assert!(!store.delete("del", "k").await.expect("Should delete"));
}

async fn check_list_is_key_ordered(store: &dyn Store) {
    for key in ["mango", "apple", "cherry"] {
        store
            .set("ordered", key, doc(json!({"k": key})))
            .await
            .expect("Should set");
    }

    let listed = store.list("ordered").await.expect("Should list");
    let keys: Vec<&str> = listed.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["apple", "cherry", "mango"]);

    assert!(store
        .list("no_such_collection")
        .await
        .expect("Should list")
        .is_empty());
}

async fn check_prefix_query(store: &dyn Store) {
    for key in ["s1/alice", "s1/bob", "s10/carol", "s2/dan"] {
        store
            .set("votes", key, doc(json!({"k": key})))
            .await
            .expect("Should set");
    }

    // "s1/" must not pick up "s10/..."
    let hits = store
        .query_prefix("votes", "s1/")
        .await
        .expect("Should query");
    let keys: Vec<&str> = hits.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["s1/alice", "s1/bob"]);

    let none = store
        .query_prefix("votes", "s9/")
        .await
        .expect("Should query");
    assert!(none.is_empty());
}

async fn check_prefix_query_treats_metacharacters_literally(store: &dyn Store) {
    for key in ["a%b", "a%c", "axb", "a_d", "aed"] {
        store
            .set("meta", key, doc(json!({"k": key})))
            .await
            .expect("Should set");
    }

    let hits = store
        .query_prefix("meta", "a%")
        .await
        .expect("Should query");
    let keys: Vec<&str> = hits.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["a%b", "a%c"]);

    let hits = store
        .query_prefix("meta", "a_")
        .await
        .expect("Should query");
    let keys: Vec<&str> = hits.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["a_d"]);
}

async fn run_contract(store: &dyn Store) {
    check_set_get_roundtrip(store).await;
    check_set_replaces_whole_document(store).await;
    check_merge_preserves_unrelated_fields(store).await;
    check_merge_creates_missing_document(store).await;
    check_delete(store).await;
    check_list_is_key_ordered(store).await;
    check_prefix_query(store).await;
    check_prefix_query_treats_metacharacters_literally(store).await;
}

// ============================================================================
// Backend entry points
// ============================================================================

#[tokio::test]
async fn memory_store_contract() {
    let store = MemoryStore::new();
    run_contract(&store).await;
}

#[tokio::test]
async fn sqlite_store_contract() {
    let (store, _dir) = sqlite_store().await;
    run_contract(&store).await;
}

#[tokio::test]
async fn sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().expect("Should create temp dir");
    let path = dir.path().join("store.db");

    {
        let store = SqliteStore::open(&path).await.expect("Should open");
        store
            .set("players", "alice", doc(json!({"preferredName": "alice"})))
            .await
            .expect("Should set");
    }

    let store = SqliteStore::open(&path).await.expect("Should reopen");
    let read = store
        .get("players", "alice")
        .await
        .expect("Should get")
        .expect("Document should survive reopen");
    assert_eq!(read, doc(json!({"preferredName": "alice"})));
}

async fn check_concurrent_merges_lose_no_fields(store: std::sync::Arc<dyn Store>) {
    store
        .set("state", "p", doc(json!({})))
        .await
        .expect("Should set");

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut patch = Document::new();
            patch.insert(format!("f{}", i), json!(i));
            store
                .merge("state", "p", patch)
                .await
                .expect("Should merge");
        }));
    }
    for handle in handles {
        handle.await.expect("Task should finish");
    }

    let read = store
        .get("state", "p")
        .await
        .expect("Should get")
        .expect("Document should exist");
    assert_eq!(
        read.len(),
        10,
        "every merged field should survive: {:?}",
        read
    );
}

#[tokio::test]
async fn memory_concurrent_merges_lose_no_fields() {
    check_concurrent_merges_lose_no_fields(std::sync::Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn sqlite_concurrent_merges_lose_no_fields() {
    let (store, _dir) = sqlite_store().await;
    check_concurrent_merges_lose_no_fields(std::sync::Arc::new(store)).await;
}
