use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{Child, Gift, Letter, Reindeer};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

use super::traits::{Collection, Document, RecordStore, StoreError, StoreResult};

/// A record type that lives in one collection of the record store
pub trait StoredRecord: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

impl StoredRecord for Child {
    const COLLECTION: Collection = Collection::Children;

    fn id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for Gift {
    const COLLECTION: Collection = Collection::Gifts;

    fn id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for Reindeer {
    const COLLECTION: Collection = Collection::Reindeers;

    fn id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for Letter {
    const COLLECTION: Collection = Collection::Letters;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Typed view over one collection of a [`RecordStore`]
pub struct Repository<T> {
    store: Arc<dyn RecordStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: StoredRecord> Repository<T> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    pub async fn put(&self, record: &T) -> StoreResult<()> {
        self.store.put(T::COLLECTION, encode(record)?).await
    }

    /// All records of the collection. Documents that no longer decode as
    /// `T` are logged and left out rather than failing the whole scan.
    pub async fn scan(&self) -> StoreResult<Vec<T>> {
        let documents = self.store.scan(T::COLLECTION).await?;
        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            match decode::<T>(document) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping record in {}: {}", T::COLLECTION, e),
            }
        }
        Ok(records)
    }

    /// Partial update of the named fields; `None` if the record is absent
    pub async fn update(&self, id: &str, fields: Document) -> StoreResult<Option<T>> {
        self.store
            .update(T::COLLECTION, id, fields)
            .await?
            .map(decode::<T>)
            .transpose()
    }
}

fn encode<T: StoredRecord>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::Serialization(format!(
            "{} record {} did not serialize to an object",
            T::COLLECTION,
            record.id()
        ))),
    }
}

fn decode<T: StoredRecord>(document: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(document)).map_err(|e| StoreError::Corrupt {
        collection: T::COLLECTION,
        reason: e.to_string(),
    })
}
