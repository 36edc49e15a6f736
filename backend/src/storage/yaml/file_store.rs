use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::connection::YamlConnection;
use crate::storage::traits::{
    document_id, merge_fields, Collection, Document, RecordStore, StoreError, StoreResult,
};

/// Record store persisting each record as a YAML file.
///
/// Writes to a collection are serialised through a per-collection lock, so
/// a partial update never loses fields written by a concurrent update.
#[derive(Clone)]
pub struct FileStore {
    connection: YamlConnection,
    write_locks: Arc<[Mutex<()>; 4]>,
}

impl FileStore {
    pub fn new(connection: YamlConnection) -> Self {
        Self {
            connection,
            write_locks: Arc::new(Collection::ALL.map(|_| Mutex::new(()))),
        }
    }

    async fn lock_collection(&self, collection: Collection) -> MutexGuard<'_, ()> {
        let slot = match collection {
            Collection::Children => 0,
            Collection::Gifts => 1,
            Collection::Reindeers => 2,
            Collection::Letters => 3,
        };
        self.write_locks[slot].lock().await
    }

    pub fn connection(&self) -> &YamlConnection {
        &self.connection
    }

    async fn read_document(&self, collection: Collection, path: &Path) -> StoreResult<Option<Document>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_yaml::from_str::<Value>(&content)? {
            Value::Object(document) => Ok(Some(document)),
            _ => Err(StoreError::Corrupt {
                collection,
                reason: format!("{} is not a mapping", path.display()),
            }),
        }
    }

    async fn write_document(&self, collection: Collection, id: &str, document: &Document) -> StoreResult<()> {
        let path = self.connection.record_path(collection, id)?;
        let content = serde_yaml::to_string(document)?;
        self.connection.write_atomic(&path, content).await
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let path = match self.connection.record_path(collection, id) {
            Ok(path) => path,
            // No record can ever be stored under an unsafe key
            Err(StoreError::InvalidKey(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        self.read_document(collection, &path).await
    }

    async fn put(&self, collection: Collection, document: Document) -> StoreResult<()> {
        let id = document_id(collection, &document)?;
        let _guard = self.lock_collection(collection).await;
        self.write_document(collection, &id, &document).await?;
        debug!("Saved {}/{}", collection, id);
        Ok(())
    }

    async fn scan(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let dir = self.connection.collection_directory(collection);
        let mut entries = fs::read_dir(&dir).await?;
        let mut documents = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }

            match self.read_document(collection, &path).await {
                Ok(Some(document)) => documents.push(document),
                // Removed between listing and reading
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }

        debug!("Scanned {} records from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> StoreResult<Option<Document>> {
        // Held across read, merge and write
        let _guard = self.lock_collection(collection).await;
        let Some(mut document) = self.get(collection, id).await? else {
            return Ok(None);
        };

        merge_fields(&mut document, fields);
        self.write_document(collection, id, &document).await?;
        debug!("Updated {}/{}", collection, id);
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn setup_test() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = YamlConnection::new(temp_dir.path())
            .await
            .expect("Failed to create connection");
        (temp_dir, FileStore::new(connection))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (_dir, store) = setup_test().await;

        store
            .put(
                Collection::Children,
                doc(json!({"id": "c1", "name": "Emma", "wishlist": ["Bike", "Kite"], "niceScore": 91})),
            )
            .await
            .unwrap();

        let found = store.get(Collection::Children, "c1").await.unwrap().unwrap();
        assert_eq!(found["name"], "Emma");
        assert_eq!(found["wishlist"], json!(["Bike", "Kite"]));
        assert_eq!(found["niceScore"], 91);
    }

    #[tokio::test]
    async fn test_get_missing_and_unsafe_ids() {
        let (_dir, store) = setup_test().await;
        assert!(store.get(Collection::Children, "nobody").await.unwrap().is_none());
        assert!(store.get(Collection::Children, "../etc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_unsafe_id_fails() {
        let (_dir, store) = setup_test().await;
        let result = store
            .put(Collection::Letters, doc(json!({"id": "../../oops"})))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_scan_skips_corrupt_and_foreign_files() {
        let (_dir, store) = setup_test().await;
        store
            .put(Collection::Gifts, doc(json!({"id": "g1", "status": "ready"})))
            .await
            .unwrap();
        store
            .put(Collection::Gifts, doc(json!({"id": "g2", "status": "wrapping"})))
            .await
            .unwrap();

        let dir = store.connection().collection_directory(Collection::Gifts);
        std::fs::write(dir.join("broken.yaml"), "- just\n- a list\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignore me").unwrap();

        let mut ids: Vec<String> = store
            .scan(Collection::Gifts)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["g1", "g2"]);
    }

    #[tokio::test]
    async fn test_update_persists_merged_fields() {
        let (dir, store) = setup_test().await;
        store
            .put(
                Collection::Reindeers,
                doc(json!({"id": "r1", "name": "Vixen", "status": "resting", "location": "Cozy Barn", "energyLevel": 80})),
            )
            .await
            .unwrap();

        let updated = store
            .update(
                Collection::Reindeers,
                "r1",
                doc(json!({"status": "training", "location": "Agility Field", "energyLevel": 77})),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["name"], "Vixen");
        assert_eq!(updated["location"], "Agility Field");

        // A second store over the same directory sees the change
        let reopened = FileStore::new(YamlConnection::new(dir.path()).await.unwrap());
        let found = reopened.get(Collection::Reindeers, "r1").await.unwrap().unwrap();
        assert_eq!(found["status"], "training");
        assert_eq!(found["energyLevel"], 77);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_keep_disjoint_fields() {
        let (_dir, store) = setup_test().await;
        store
            .put(Collection::Reindeers, doc(json!({"id": "r1", "name": "Dancer"})))
            .await
            .unwrap();

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut fields = Document::new();
                    fields.insert(format!("f{}", i), json!(i));
                    store.update(Collection::Reindeers, "r1", fields).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let found = store.get(Collection::Reindeers, "r1").await.unwrap().unwrap();
        let present = (0..40).filter(|i| found.get(&format!("f{}", i)).is_some()).count();
        assert_eq!(present, 40);
        assert_eq!(found["name"], "Dancer");
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let (_dir, store) = setup_test().await;
        let result = store
            .update(Collection::Gifts, "ghost", doc(json!({"status": "ready"})))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(store.scan(Collection::Gifts).await.unwrap().is_empty());
    }
}
