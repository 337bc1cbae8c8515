//! Blob store trait for file payload storage.
//!
//! Dropgate treats payload storage as an opaque byte sink/source keyed by
//! file id. The [`BlobStore`] trait is defined here in `dropgate-core` and
//! implemented in `dropgate-storage`.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::result::AppResult;

/// Trait for file payload storage backends.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write the payload for the given file id, replacing any existing one.
    async fn put(&self, file_id: Uuid, data: Bytes) -> AppResult<()>;

    /// Read the payload for the given file id into memory.
    async fn get(&self, file_id: Uuid) -> AppResult<Bytes>;

    /// Delete the payload for the given file id, if present.
    async fn delete(&self, file_id: Uuid) -> AppResult<()>;

    /// Check whether a payload exists for the given file id.
    async fn exists(&self, file_id: Uuid) -> AppResult<bool>;
}
