//! Tubely Storage Library
//!
//! This crate provides the object storage abstraction and implementations for
//! Tubely, plus storage key generation.
//!
//! # Storage key format
//!
//! Keys are geometry-prefixed: `{aspect}/{token}{ext}`, where `aspect` is one
//! of `landscape`/`portrait`/`other`, `token` is 32 random bytes encoded
//! base64 URL-safe without padding, and `ext` is derived from the declared
//! media type. Key generation is centralized in the `keys` module so all
//! backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
