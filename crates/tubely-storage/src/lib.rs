//! Tubely Storage Library
//!
//! Blob storage for uploaded videos and thumbnails. The [`Storage`] trait is
//! implemented for S3 (through `object_store`) and for the local filesystem.
//!
//! # Storage key format
//!
//! - **Videos**: `{orientation}/{id}.mp4`, or `{id}.mp4` when videos are stored as-is
//! - **Thumbnails**: `{id}.{extension}`
//!
//! `id` is 128 random bits encoded as unpadded URL-safe base64, so keys are never
//! reused. Keys must not contain `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use factory::create_assets_storage;
pub use keys::{random_object_id, thumbnail_key, video_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
