//! Local filesystem blob store.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use dropgate_core::error::{AppError, ErrorKind};
use dropgate_core::result::AppResult;
use dropgate_core::traits::storage::BlobStore;

/// Blob store keeping one file per payload under a root directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored payloads.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve the on-disk path for a file id.
    fn path_for(&self, file_id: Uuid) -> PathBuf {
        self.root.join(file_id.to_string())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, file_id: Uuid, data: Bytes) -> AppResult<()> {
        let path = self.path_for(file_id);
        let mut file = fs::File::create(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob {file_id}"),
                e,
            )
        })?;
        file.write_all(&data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob {file_id}"),
                e,
            )
        })?;
        file.flush().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to flush blob {file_id}"),
                e,
            )
        })?;

        debug!(file_id = %file_id, bytes = data.len(), "Blob written");
        Ok(())
    }

    async fn get(&self, file_id: Uuid) -> AppResult<Bytes> {
        let path = self.path_for(file_id);
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob {file_id} not found"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob {file_id}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, file_id: Uuid) -> AppResult<()> {
        let path = self.path_for(file_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob {file_id}"),
                e,
            )),
        }
    }

    async fn exists(&self, file_id: Uuid) -> AppResult<bool> {
        Ok(self.path_for(file_id).exists())
    }
}
