//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must
//! implement. The contract is deliberately narrow: the upload pipeline only
//! ever performs a single blocking put of a full byte buffer.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage abstraction
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// This allows the upload pipeline to work with any backend without coupling
/// to implementation details, and to be substituted with a fake in tests.
///
/// **Key format:** `{aspect}/{token}{ext}`. See the crate root documentation.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write the full byte buffer under `key` with the declared content type
    /// attached as object metadata. Returns the public locator URL.
    ///
    /// The write is atomic from the caller's perspective: on success the
    /// object is durably present; on error nothing is referenced.
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String>;
}
