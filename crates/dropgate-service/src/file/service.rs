//! File listing, summary, deletion, and download history.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use dropgate_core::error::AppError;
use dropgate_core::traits::clock::Clock;
use dropgate_core::types::pagination::PageResponse;
use dropgate_entity::download::FileDownloadHistory;
use dropgate_entity::file::{File, FileListQuery, FileSummary};
use dropgate_entity::store::FileStore;

use crate::context::RequestContext;

/// Owner-facing file operations.
#[derive(Clone)]
pub struct FileService {
    /// File persistence.
    files: Arc<dyn FileStore>,
    /// Time source for the availability partition.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService").finish()
    }
}

impl FileService {
    /// Creates a new file service.
    pub fn new(files: Arc<dyn FileStore>, clock: Arc<dyn Clock>) -> Self {
        Self { files, clock }
    }

    /// Lists the caller's files, filtered by availability state and
    /// paginated.
    pub async fn list_owned(
        &self,
        ctx: &RequestContext,
        query: &FileListQuery,
    ) -> Result<PageResponse<File>, AppError> {
        self.files
            .list_owned(ctx.user_id, query, self.clock.now())
            .await
    }

    /// Counts the caller's files in each availability state.
    pub async fn summary(&self, ctx: &RequestContext) -> Result<FileSummary, AppError> {
        self.files.summary(ctx.user_id, self.clock.now()).await
    }

    /// Soft-deletes one of the caller's files.
    ///
    /// A file the caller does not own reads as absent.
    pub async fn delete(&self, ctx: &RequestContext, file_id: Uuid) -> Result<(), AppError> {
        let deleted = self.files.soft_delete(file_id, ctx.user_id).await?;
        if !deleted {
            return Err(AppError::not_found("File not found"));
        }

        info!(user_id = %ctx.user_id, file_id = %file_id, "File deleted");
        Ok(())
    }

    /// Returns the download history of one of the caller's files.
    pub async fn download_history(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<FileDownloadHistory, AppError> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if !file.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden(
                "Only the file owner may view its download history",
            ));
        }

        let downloads = self.files.downloads_for_file(file.id).await?;
        Ok(FileDownloadHistory {
            file_id: file.id,
            file_name: file.name,
            downloads,
        })
    }
}
