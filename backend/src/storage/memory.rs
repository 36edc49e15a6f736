use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::{
    document_id, merge_fields, Collection, Document, RecordStore, StoreResult,
};

/// Process-local record store, used when no data directory is configured
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<Collection, BTreeMap<String, Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn put(&self, collection: Collection, document: Document) -> StoreResult<()> {
        let id = document_id(collection, &document)?;
        debug!("put {}/{}", collection, id);

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().insert(id, document);
        Ok(())
    }

    async fn scan(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> StoreResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(&collection)
            .and_then(|records| records.get_mut(id))
        else {
            return Ok(None);
        };

        merge_fields(document, fields);
        debug!("update {}/{}", collection, id);
        Ok(Some(document.clone()))
    }
}
