//! Shared key generation for storage backends.
//!
//! Key format: videos are `{orientation}/{id}.mp4` (or `{id}.mp4` when stored
//! as-is), thumbnails are `{id}.{extension}`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::Rng;
use tubely_core::models::Orientation;

use crate::traits::{StorageError, StorageResult};

/// 128 random bits as unpadded URL-safe base64 (always 22 characters).
pub fn random_object_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a fresh key for a processed video.
///
/// With an orientation this produces `{orientation}/{id}.mp4`; without one
/// (videos stored unprocessed) just `{id}.mp4`.
pub fn video_key(orientation: Option<Orientation>) -> String {
    match orientation {
        Some(orientation) => format!("{}/{}.mp4", orientation, random_object_id()),
        None => format!("{}.mp4", random_object_id()),
    }
}

/// Generate a fresh key for a thumbnail with the given file extension.
pub fn thumbnail_key(extension: &str) -> String {
    format!("{}.{}", random_object_id(), extension)
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
