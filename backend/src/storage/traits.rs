//! # Storage Traits
//!
//! This module defines the record store abstraction that every other layer
//! consumes. A store holds four independent collections, each mapping an
//! opaque string identifier to a flat JSON document.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// A flat record as stored: a JSON object carrying a string `"id"` field
pub type Document = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// The four record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Children,
    Gifts,
    Reindeers,
    Letters,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Children,
        Collection::Gifts,
        Collection::Reindeers,
        Collection::Letters,
    ];

    /// Stable name, also used as the on-disk directory name
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Children => "children",
            Collection::Gifts => "gifts",
            Collection::Reindeers => "reindeers",
            Collection::Letters => "letters",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode or decode record: {0}")]
    Serialization(String),
    #[error("Invalid record key: {0:?}")]
    InvalidKey(String),
    #[error("Corrupt record in {collection}: {reason}")]
    Corrupt {
        collection: Collection,
        reason: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(e: serde_yaml::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Trait defining the record store contract
///
/// No transactions, no optimistic concurrency, no pagination: last writer
/// wins and every filter happens in the caller after a full scan.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Retrieve a record by ID
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Insert or fully replace a record, keyed by its `"id"` field
    async fn put(&self, collection: Collection, document: Document) -> StoreResult<()>;

    /// Return every record in the collection, in no particular order
    async fn scan(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Overwrite only the named fields of an existing record.
    /// Returns the updated record, or `None` if the ID is absent.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> StoreResult<Option<Document>>;
}

/// Extract the `"id"` field of a document
pub fn document_id(collection: Collection, document: &Document) -> StoreResult<String> {
    match document.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(StoreError::Corrupt {
            collection,
            reason: "record has no string id".to_string(),
        }),
    }
}

/// Shallow-merge `fields` into `document`; the `"id"` field is never replaced
pub fn merge_fields(document: &mut Document, fields: Document) {
    for (key, value) in fields {
        if key == "id" {
            continue;
        }
        document.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_id() {
        let d = doc(json!({"id": "r1", "name": "Dasher"}));
        assert_eq!(document_id(Collection::Reindeers, &d).unwrap(), "r1");

        let missing = doc(json!({"name": "Dasher"}));
        assert!(document_id(Collection::Reindeers, &missing).is_err());

        let numeric = doc(json!({"id": 7}));
        assert!(document_id(Collection::Reindeers, &numeric).is_err());
    }

    #[test]
    fn test_merge_fields_keeps_id() {
        let mut d = doc(json!({"id": "r1", "status": "resting", "energyLevel": 50}));
        merge_fields(
            &mut d,
            doc(json!({"id": "hijack", "status": "flying", "location": "Test Route Alpha"})),
        );

        assert_eq!(d["id"], "r1");
        assert_eq!(d["status"], "flying");
        assert_eq!(d["location"], "Test Route Alpha");
        assert_eq!(d["energyLevel"], 50);
    }

    #[test]
    fn test_collection_names() {
        let names: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["children", "gifts", "reindeers", "letters"]);
    }
}
