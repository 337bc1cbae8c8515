//! In-memory blob store for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;
use uuid::Uuid;

use dropgate_core::error::AppError;
use dropgate_core::result::AppResult;
use dropgate_core::traits::storage::BlobStore;

/// Blob store keeping payloads in a mutex-protected map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<Uuid, Bytes>>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, file_id: Uuid, data: Bytes) -> AppResult<()> {
        self.blobs.lock().await.insert(file_id, data);
        Ok(())
    }

    async fn get(&self, file_id: Uuid) -> AppResult<Bytes> {
        self.blobs
            .lock()
            .await
            .get(&file_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Blob {file_id} not found")))
    }

    async fn delete(&self, file_id: Uuid) -> AppResult<()> {
        self.blobs.lock().await.remove(&file_id);
        Ok(())
    }

    async fn exists(&self, file_id: Uuid) -> AppResult<bool> {
        Ok(self.blobs.lock().await.contains_key(&file_id))
    }
}
