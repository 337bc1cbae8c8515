//! Download ledger entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One admitted download. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DownloadRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The downloaded file.
    pub file_id: Uuid,
    /// The downloading user. `None` for anonymous downloads.
    pub downloader_id: Option<Uuid>,
    /// When the download was admitted.
    pub downloaded_at: DateTime<Utc>,
}

/// The ordered download history of a single file, as returned to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDownloadHistory {
    /// The file the history belongs to.
    pub file_id: Uuid,
    /// The file's display name.
    pub file_name: String,
    /// Download records, oldest first.
    pub downloads: Vec<DownloadRecord>,
}
