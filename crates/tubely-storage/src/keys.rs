//! Storage key generation.
//!
//! Key format: `{aspect}/{token}{ext}`. Tokens carry 256 bits of entropy, so
//! uniqueness is probabilistic but collisions are negligible; keys are never
//! reused or recycled.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;
use tubely_core::Aspect;

use crate::traits::{StorageError, StorageResult};

const TOKEN_BYTES: usize = 32;

/// Generate a collision-resistant storage token: 32 bytes from the OS CSPRNG,
/// base64 URL-safe without padding. Fails only if the entropy source is
/// unavailable.
pub fn generate_token() -> StorageResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StorageError::EntropyUnavailable(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Derive a file extension from a declared media type.
///
/// `type/subtype` yields `.subtype`; anything that does not split into exactly
/// two parts degrades to `.bin` rather than failing the upload.
pub fn extension_for_media_type(media_type: &str) -> String {
    let parts: Vec<&str> = media_type.split('/').collect();
    if parts.len() != 2 {
        return ".bin".to_string();
    }
    format!(".{}", parts[1])
}

/// Build a storage key from its parts: `{aspect}/{token}{ext}`.
pub fn build_key(aspect: Aspect, token: &str, extension: &str) -> String {
    format!("{}/{}{}", aspect, token, extension)
}

/// Public URL for an object stored in AWS S3.
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

/// Locator for an asset served by this server from local storage.
pub fn asset_url(port: u16, path: &str) -> String {
    format!("http://localhost:{}/assets/{}", port, path)
}
