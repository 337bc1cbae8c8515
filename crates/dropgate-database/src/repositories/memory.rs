//! In-memory store implementations.
//!
//! Functionally equivalent to the PostgreSQL stores, used by unit and
//! integration tests so the services can be exercised without a database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use dropgate_core::error::AppError;
use dropgate_core::result::AppResult;
use dropgate_core::types::pagination::PageResponse;
use dropgate_core::types::sorting::{FileSortField, SortDirection};
use dropgate_entity::download::DownloadRecord;
use dropgate_entity::file::{CreateFile, File, FileListQuery, FileStatus, FileSummary};
use dropgate_entity::session::{LoginChallenge, RevokedToken};
use dropgate_entity::store::{AuthStore, FileStore, UserStore};
use dropgate_entity::user::{CreateUser, User};

/// In-memory [`UserStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().await;

        if users.values().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        if users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email already in use"));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            totp_enabled: false,
            totp_secret: None,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save_totp_secret(&self, user_id: Uuid, secret: &str) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        user.totp_secret = Some(secret.to_string());
        Ok(())
    }

    async fn enable_totp(&self, user_id: Uuid) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        user.totp_enabled = true;
        Ok(())
    }
}

/// In-memory [`AuthStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthStore {
    /// Pending challenges keyed by user id (one per user).
    challenges: Arc<Mutex<HashMap<Uuid, Uuid>>>,
    /// Revoked tokens keyed by their literal value.
    revoked: Arc<Mutex<HashMap<String, RevokedToken>>>,
}

impl MemoryAuthStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn put_challenge(&self, user_id: Uuid, correlation_id: Uuid) -> AppResult<()> {
        self.challenges
            .lock()
            .await
            .insert(user_id, correlation_id);
        Ok(())
    }

    async fn take_challenge(&self, correlation_id: Uuid) -> AppResult<Option<LoginChallenge>> {
        let mut challenges = self.challenges.lock().await;
        let user_id = challenges
            .iter()
            .find(|(_, cid)| **cid == correlation_id)
            .map(|(uid, _)| *uid);

        // Removal under the same lock mirrors the database's atomic
        // delete-and-return.
        Ok(user_id.map(|uid| {
            challenges.remove(&uid);
            LoginChallenge {
                correlation_id,
                user_id: uid,
            }
        }))
    }

    async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        self.revoked
            .lock()
            .await
            .entry(token.to_string())
            .or_insert(RevokedToken {
                token: token.to_string(),
                expires_at,
            });
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> AppResult<bool> {
        Ok(self.revoked.lock().await.contains_key(token))
    }
}

/// In-memory [`FileStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    files: Arc<Mutex<HashMap<Uuid, File>>>,
    downloads: Arc<Mutex<Vec<DownloadRecord>>>,
}

impl MemoryFileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let file = File {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            name: data.name.clone(),
            content_type: data.content_type.clone(),
            size_bytes: data.size_bytes,
            password_hash: data.password_hash.clone(),
            available_from: data.available_from,
            available_to: data.available_to,
            require_totp: data.require_totp,
            share_token: data.share_token.clone(),
            is_public: data.is_public,
            removed: false,
            created_at: Utc::now(),
        };
        self.files.lock().await.insert(file.id, file.clone());
        Ok(file)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self
            .files
            .lock()
            .await
            .get(&id)
            .filter(|f| !f.removed)
            .cloned())
    }

    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        Ok(self
            .files
            .lock()
            .await
            .values()
            .find(|f| f.share_token == token && !f.removed)
            .cloned())
    }

    async fn list_owned(
        &self,
        owner_id: Uuid,
        query: &FileListQuery,
        now: DateTime<Utc>,
    ) -> AppResult<PageResponse<File>> {
        let files = self.files.lock().await;
        let mut matching: Vec<File> = files
            .values()
            .filter(|f| f.owner_id == Some(owner_id) && !f.removed)
            .filter(|f| match query.status.status() {
                Some(status) => f.status_at(now) == status,
                None => true,
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                FileSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                FileSortField::FileName => a.name.cmp(&b.name),
            };
            match query.order {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let items: Vec<File> = matching
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .collect();

        Ok(PageResponse::new(items, &query.page, total))
    }

    async fn summary(&self, owner_id: Uuid, now: DateTime<Utc>) -> AppResult<FileSummary> {
        let files = self.files.lock().await;
        let mut summary = FileSummary::default();

        for file in files
            .values()
            .filter(|f| f.owner_id == Some(owner_id) && !f.removed)
        {
            match file.status_at(now) {
                FileStatus::Active => summary.active += 1,
                FileStatus::Pending => summary.pending += 1,
                FileStatus::Expired => summary.expired += 1,
            }
        }

        Ok(summary)
    }

    async fn soft_delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let mut files = self.files.lock().await;
        match files.get_mut(&id) {
            Some(file) if file.owner_id == Some(owner_id) && !file.removed => {
                file.removed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_download(
        &self,
        file_id: Uuid,
        downloader_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.downloads.lock().await.push(DownloadRecord {
            id: Uuid::new_v4(),
            file_id,
            downloader_id,
            downloaded_at: at,
        });
        Ok(())
    }

    async fn downloads_for_file(&self, file_id: Uuid) -> AppResult<Vec<DownloadRecord>> {
        let mut records: Vec<DownloadRecord> = self
            .downloads
            .lock()
            .await
            .iter()
            .filter(|d| d.file_id == file_id)
            .cloned()
            .collect();
        records.sort_by_key(|d| d.downloaded_at);
        Ok(records)
    }
}
