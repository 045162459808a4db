//! Local filesystem storage backend.
//!
//! Writes objects under the configured assets root and returns locators of
//! the form `http://localhost:{port}/assets/{key}`, served by the API's
//! `/assets` route. Uses the same key generation rules as the S3 backend.

use crate::keys;
use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    port: u16,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at `root`, creating it if absent.
    pub async fn new(root: impl Into<PathBuf>, port: u16) -> StorageResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(LocalStorage { root, port })
    }

    /// Reject keys that would escape the assets root.
    fn validate_key(key: &str) -> StorageResult<()> {
        if key.is_empty() || key.starts_with('/') || key.contains("..") {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    fn disk_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, _content_type: &str, data: Vec<u8>) -> StorageResult<String> {
        Self::validate_key(key)?;

        let path = self.disk_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let size = data.len() as u64;
        tokio::fs::write(&path, data).await?;

        tracing::info!(
            root = %self.root.display(),
            key = %key,
            size_bytes = size,
            "Local storage write successful"
        );

        Ok(keys::asset_url(self.port, key))
    }
}

impl LocalStorage {
    /// Directory that the API's `/assets` route should serve.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
