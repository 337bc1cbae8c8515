//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use dropgate_core::types::pagination::PageRequest;
use dropgate_core::types::sorting::{FileSortField, SortDirection};

use super::status::{FileStatus, StatusFilter};

/// A shared file record.
///
/// Everything except the `removed` flag is immutable after creation; the
/// payload itself lives in the blob store keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The owning user. `None` for anonymous uploads.
    pub owner_id: Option<Uuid>,
    /// Display name (including extension).
    pub name: String,
    /// MIME type of the payload.
    pub content_type: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// Argon2id hash of the download password, if the file is protected.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Start of the availability window.
    pub available_from: DateTime<Utc>,
    /// End of the availability window.
    pub available_to: DateTime<Utc>,
    /// Whether downloads require a one-time code from the caller.
    pub require_totp: bool,
    /// Unguessable token embedded in the public share URL.
    pub share_token: String,
    /// Whether the file is listed publicly.
    pub is_public: bool,
    /// Soft-delete flag.
    pub removed: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl File {
    /// Whether a download password is set.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Whether the given user owns this file. Anonymous uploads have no owner.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == Some(user_id)
    }

    /// The availability state of this file at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> FileStatus {
        FileStatus::at(self.available_from, self.available_to, now)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The owning user, if any.
    pub owner_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// Pre-hashed download password, if any.
    pub password_hash: Option<String>,
    /// Start of the availability window.
    pub available_from: DateTime<Utc>,
    /// End of the availability window.
    pub available_to: DateTime<Utc>,
    /// Whether downloads require a one-time code.
    pub require_totp: bool,
    /// Generated share token.
    pub share_token: String,
    /// Whether the file is listed publicly.
    pub is_public: bool,
}

/// Query parameters for the owner file listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct FileListQuery {
    /// Availability-state filter.
    pub status: StatusFilter,
    /// Sort column.
    pub sort_by: FileSortField,
    /// Sort direction.
    pub order: SortDirection,
    /// Page selection.
    pub page: PageRequest,
}

/// Per-owner counts over the availability partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct FileSummary {
    /// Files currently inside their window.
    pub active: i64,
    /// Files whose window has not opened.
    pub pending: i64,
    /// Files whose window has closed.
    pub expired: i64,
}
