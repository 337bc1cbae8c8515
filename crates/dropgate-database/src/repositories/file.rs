//! File and download ledger store over PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use dropgate_core::error::{AppError, ErrorKind};
use dropgate_core::result::AppResult;
use dropgate_core::types::pagination::PageResponse;
use dropgate_entity::download::DownloadRecord;
use dropgate_entity::file::{CreateFile, File, FileListQuery, FileStatus, FileSummary};
use dropgate_entity::store::FileStore;

/// PostgreSQL-backed [`FileStore`].
#[derive(Debug, Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    /// Create a new file store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQL fragment selecting one availability state, with `$2` bound to the
/// evaluation instant. Empty for an unfiltered listing.
fn status_predicate(status: Option<FileStatus>) -> &'static str {
    match status {
        Some(FileStatus::Active) => " AND available_from <= $2 AND available_to > $2",
        Some(FileStatus::Pending) => " AND available_from > $2",
        Some(FileStatus::Expired) => " AND available_to <= $2",
        None => "",
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (owner_id, name, content_type, size_bytes, password_hash, \
                                available_from, available_to, require_totp, share_token, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .bind(&data.password_hash)
        .bind(data.available_from)
        .bind(data.available_to)
        .bind(data.require_totp)
        .bind(&data.share_token)
        .bind(data.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 AND removed = FALSE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file by id", e))
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE share_token = $1 AND removed = FALSE")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by share token", e)
            })
    }

    async fn list_owned(
        &self,
        owner_id: Uuid,
        query: &FileListQuery,
        now: DateTime<Utc>,
    ) -> AppResult<PageResponse<File>> {
        let status = query.status.status();
        let predicate = status_predicate(status);

        let count_sql =
            format!("SELECT COUNT(*) FROM files WHERE owner_id = $1 AND removed = FALSE{predicate}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner_id);
        if status.is_some() {
            count_query = count_query.bind(now);
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count files", e)
        })?;

        // Sort column and direction come from closed enums, never from
        // caller-controlled strings.
        let limit_param = if status.is_some() { 3 } else { 2 };
        let list_sql = format!(
            "SELECT * FROM files WHERE owner_id = $1 AND removed = FALSE{predicate} \
             ORDER BY {} {} LIMIT ${} OFFSET ${}",
            query.sort_by.as_sql(),
            query.order.as_sql(),
            limit_param,
            limit_param + 1,
        );
        let mut list_query = sqlx::query_as::<_, File>(&list_sql).bind(owner_id);
        if status.is_some() {
            list_query = list_query.bind(now);
        }
        let files = list_query
            .bind(query.page.limit as i64)
            .bind(query.page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))?;

        Ok(PageResponse::new(files, &query.page, total as u64))
    }

    async fn summary(&self, owner_id: Uuid, now: DateTime<Utc>) -> AppResult<FileSummary> {
        let mut summary = FileSummary::default();

        for status in [FileStatus::Active, FileStatus::Pending, FileStatus::Expired] {
            let sql = format!(
                "SELECT COUNT(*) FROM files WHERE owner_id = $1 AND removed = FALSE{}",
                status_predicate(Some(status))
            );
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(owner_id)
                .bind(now)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        format!("Failed to count {status} files"),
                        e,
                    )
                })?;

            match status {
                FileStatus::Active => summary.active = count,
                FileStatus::Pending => summary.pending = count,
                FileStatus::Expired => summary.expired = count,
            }
        }

        Ok(summary)
    }

    async fn soft_delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE files SET removed = TRUE WHERE id = $1 AND owner_id = $2 AND removed = FALSE",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_download(
        &self,
        file_id: Uuid,
        downloader_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO downloads (file_id, downloader_id, downloaded_at) VALUES ($1, $2, $3)",
        )
        .bind(file_id)
        .bind(downloader_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record download", e))?;
        Ok(())
    }

    async fn downloads_for_file(&self, file_id: Uuid) -> AppResult<Vec<DownloadRecord>> {
        sqlx::query_as::<_, DownloadRecord>(
            "SELECT * FROM downloads WHERE file_id = $1 ORDER BY downloaded_at ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load download history", e)
        })
    }
}
