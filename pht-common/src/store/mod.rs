//! Document store abstraction
//!
//! The engine persists all authoritative state as JSON documents in named
//! collections and recomputes every decision from fresh reads. This module
//! defines the capability the engine is written against plus the serde
//! bridge helpers; `sqlite` and `memory` provide the two backends.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A stored document: one JSON object
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Document store capability
///
/// Contract:
/// - `merge` is atomic per document and creates the document if absent;
///   patch fields replace matching top-level fields, all other fields are
///   preserved.
/// - `list` and `query_prefix` return entries in ascending key order.
/// - Writes are last-writer-wins per document; there are no cross-document
///   transactions.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a document by collection and key
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>>;

    /// Create or replace a document
    async fn set(&self, collection: &str, key: &str, doc: Document) -> Result<()>;

    /// Merge fields into a document, creating it if absent. Returns the
    /// merged document.
    async fn merge(&self, collection: &str, key: &str, patch: Document) -> Result<Document>;

    /// Delete a document, reporting whether it existed
    async fn delete(&self, collection: &str, key: &str) -> Result<bool>;

    /// All documents in a collection, key-ordered
    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>>;

    /// Documents whose key starts with `prefix`, key-ordered
    async fn query_prefix(&self, collection: &str, prefix: &str)
        -> Result<Vec<(String, Document)>>;
}

/// Serialize a value into a stored document
///
/// The value must serialize to a JSON object; anything else is a programming
/// error surfaced as `Error::Internal`.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::Internal(format!(
            "document must be a JSON object, got: {}",
            other
        ))),
        Err(e) => Err(Error::Internal(format!(
            "failed to serialize document: {}",
            e
        ))),
    }
}

/// Deserialize a stored document into a typed value
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|e| Error::Internal(format!("failed to deserialize document: {}", e)))
}

/// Shallow merge: top-level fields of `patch` replace those of `base`
pub(crate) fn merge_fields(base: &mut Document, patch: Document) {
    for (field, value) in patch {
        base.insert(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Demo {
        name: String,
        count: u32,
    }

    #[test]
    fn test_document_roundtrip() {
        let demo = Demo {
            name: "spook".to_string(),
            count: 3,
        };
        let doc = to_document(&demo).unwrap();
        let back: Demo = from_document(doc).unwrap();
        assert_eq!(back, demo);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(to_document(&42u32).is_err());
        assert!(to_document(&"bare string").is_err());
    }

    #[test]
    fn test_merge_fields_is_shallow() {
        let mut base = to_document(&json!({
            "a": 1,
            "nested": {"x": 1, "y": 2},
        }))
        .unwrap();
        let patch = to_document(&json!({
            "nested": {"x": 9},
            "b": 2,
        }))
        .unwrap();
        merge_fields(&mut base, patch);

        assert_eq!(base.get("a"), Some(&json!(1)));
        assert_eq!(base.get("b"), Some(&json!(2)));
        // whole nested object replaced, not deep-merged
        assert_eq!(base.get("nested"), Some(&json!({"x": 9})));
    }
}
