use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

use crate::storage::traits::{Collection, StoreError, StoreResult};

/// YamlConnection manages the data directory layout: one directory per
/// collection, one `<id>.yaml` file per record
#[derive(Clone)]
pub struct YamlConnection {
    base_directory: PathBuf,
    temp_counter: Arc<AtomicU64>,
}

impl YamlConnection {
    /// Create a connection rooted at `base_directory`, creating the
    /// collection directories if they do not exist yet
    pub async fn new<P: AsRef<Path>>(base_directory: P) -> StoreResult<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();

        for collection in Collection::ALL {
            let dir = base_directory.join(collection.name());
            if !fs::try_exists(&dir).await? {
                fs::create_dir_all(&dir).await?;
                info!("Created collection directory: {}", dir.display());
            }
        }

        Ok(Self {
            base_directory,
            temp_counter: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn collection_directory(&self, collection: Collection) -> PathBuf {
        self.base_directory.join(collection.name())
    }

    /// Path of the file holding record `id`.
    ///
    /// IDs become file names, so only ASCII alphanumerics, `-`, `_` and `.`
    /// are accepted, and an ID may not start with `.`.
    pub fn record_path(&self, collection: Collection, id: &str) -> StoreResult<PathBuf> {
        if !is_safe_key(id) {
            return Err(StoreError::InvalidKey(id.to_string()));
        }
        Ok(self
            .collection_directory(collection)
            .join(format!("{}.yaml", id)))
    }

    /// Write `content` to `path` through a uniquely named temp file and a rename
    pub async fn write_atomic(&self, path: &Path, content: String) -> StoreResult<()> {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_extension(format!("{}.{}.tmp", std::process::id(), n));
        fs::write(&temp_path, content).await?;
        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

fn is_safe_key(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
