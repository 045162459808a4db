use crate::{LocalStorage, ObjectStorage, S3Storage, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::{Config, StorageBackend};

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint.clone();

            let storage = S3Storage::new(bucket, region, endpoint)?;
            Ok(Arc::new(storage))
        }
        StorageBackend::Local => {
            let storage =
                LocalStorage::new(config.assets_root.clone(), config.server_port).await?;
            Ok(Arc::new(storage))
        }
    }
}
