//! Store capability traits.
//!
//! Services depend on these traits rather than on concrete repositories,
//! so the core logic runs unchanged against PostgreSQL in production and
//! against in-memory stores in tests. `dropgate-database` provides both.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use dropgate_core::result::AppResult;
use dropgate_core::types::pagination::PageResponse;

use crate::download::DownloadRecord;
use crate::file::{CreateFile, File, FileListQuery, FileSummary};
use crate::session::LoginChallenge;
use crate::user::{CreateUser, User};

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Create a new user. Fails with `Conflict` on duplicate username/email.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Store a freshly generated TOTP secret without enabling two-factor.
    async fn save_totp_secret(&self, user_id: Uuid, secret: &str) -> AppResult<()>;

    /// Permanently flip the two-factor enabled flag.
    async fn enable_totp(&self, user_id: Uuid) -> AppResult<()>;
}

/// Persistence for login challenges and the token blacklist.
#[async_trait]
pub trait AuthStore: Send + Sync + 'static {
    /// Record a pending challenge for the user, replacing any existing one.
    async fn put_challenge(&self, user_id: Uuid, correlation_id: Uuid) -> AppResult<()>;

    /// Atomically remove and return the challenge with the given
    /// correlation id. At most one concurrent caller observes the record.
    async fn take_challenge(&self, correlation_id: Uuid) -> AppResult<Option<LoginChallenge>>;

    /// Blacklist a token until its original expiry. Idempotent.
    async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()>;

    /// Check whether a token has been blacklisted.
    async fn is_token_revoked(&self, token: &str) -> AppResult<bool>;
}

/// Persistence for file records and the download ledger.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Create a new file record.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Find a non-removed file by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Find a non-removed file by its share token.
    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>>;

    /// List an owner's non-removed files, filtered by the availability
    /// partition evaluated at `now`, sorted and paginated.
    async fn list_owned(
        &self,
        owner_id: Uuid,
        query: &FileListQuery,
        now: DateTime<Utc>,
    ) -> AppResult<PageResponse<File>>;

    /// Count the owner's files in each availability state at `now`.
    async fn summary(&self, owner_id: Uuid, now: DateTime<Utc>) -> AppResult<FileSummary>;

    /// Soft-delete a file. Returns `false` when no row matched the
    /// (file, owner) pair.
    async fn soft_delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool>;

    /// Append a row to the download ledger.
    async fn record_download(
        &self,
        file_id: Uuid,
        downloader_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Return a file's download records, oldest first.
    async fn downloads_for_file(&self, file_id: Uuid) -> AppResult<Vec<DownloadRecord>>;
}
