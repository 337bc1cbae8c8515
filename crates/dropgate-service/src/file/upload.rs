//! File upload service — policy enforcement, share token minting, and
//! payload persistence.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use dropgate_auth::password::PasswordHasher;
use dropgate_core::config::policy::SharePolicy;
use dropgate_core::error::AppError;
use dropgate_core::traits::clock::Clock;
use dropgate_core::traits::storage::BlobStore;
use dropgate_entity::file::{CreateFile, File};
use dropgate_entity::store::FileStore;

use crate::share::link::generate_share_token;

/// Metadata accompanying an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Display name.
    pub name: String,
    /// MIME type of the payload.
    pub content_type: String,
    /// Optional download password.
    pub password: Option<String>,
    /// Start of the availability window. Defaults to now.
    pub available_from: Option<DateTime<Utc>>,
    /// End of the availability window. Defaults per policy.
    pub available_to: Option<DateTime<Utc>>,
    /// Whether downloads require a one-time code.
    #[serde(default)]
    pub require_totp: bool,
    /// Whether the file is listed publicly.
    #[serde(default)]
    pub is_public: bool,
}

/// Handles new uploads, anonymous or authenticated.
#[derive(Clone)]
pub struct UploadService {
    /// File persistence.
    files: Arc<dyn FileStore>,
    /// Payload storage.
    blobs: Arc<dyn BlobStore>,
    /// Password hasher for file passwords.
    hasher: Arc<PasswordHasher>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Upload and window policy.
    policy: SharePolicy,
    /// Maximum payload size in bytes.
    max_upload_size_bytes: u64,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("policy", &self.policy)
            .finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        hasher: Arc<PasswordHasher>,
        clock: Arc<dyn Clock>,
        policy: SharePolicy,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            files,
            blobs,
            hasher,
            clock,
            policy,
            max_upload_size_bytes,
        }
    }

    /// Validates the upload against policy, persists the record and the
    /// payload, and returns the new file with its share token.
    pub async fn upload(
        &self,
        req: &UploadRequest,
        data: Bytes,
        owner_id: Option<Uuid>,
    ) -> Result<File, AppError> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }
        if data.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }

        let now = self.clock.now();
        let (available_from, available_to) = self.resolve_window(req, now)?;
        let password_hash = self.hash_file_password(req.password.as_deref())?;

        let file = self
            .files
            .create(&CreateFile {
                owner_id,
                name: req.name.clone(),
                content_type: req.content_type.clone(),
                size_bytes: data.len() as i64,
                password_hash,
                available_from,
                available_to,
                require_totp: req.require_totp,
                share_token: generate_share_token(),
                is_public: req.is_public,
            })
            .await?;

        self.blobs.put(file.id, data).await?;

        info!(
            file_id = %file.id,
            owner = ?owner_id,
            name = %file.name,
            "File uploaded"
        );
        Ok(file)
    }

    /// Applies window defaults and policy bounds.
    fn resolve_window(
        &self,
        req: &UploadRequest,
        now: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        let from = req.available_from.unwrap_or(now);
        let to = req
            .available_to
            .unwrap_or(from + Duration::days(self.policy.default_validity_days as i64));

        if to <= from {
            return Err(AppError::validation(
                "Availability window must end after it starts",
            ));
        }

        let window = to - from;
        if window < Duration::hours(self.policy.min_validity_hours as i64) {
            return Err(AppError::validation(format!(
                "Availability window must be at least {} hour(s)",
                self.policy.min_validity_hours
            )));
        }
        if window > Duration::days(self.policy.max_validity_days as i64) {
            return Err(AppError::validation(format!(
                "Availability window must be at most {} day(s)",
                self.policy.max_validity_days
            )));
        }

        Ok((from, to))
    }

    /// Validates and hashes the optional file password.
    fn hash_file_password(&self, password: Option<&str>) -> Result<Option<String>, AppError> {
        let Some(password) = password else {
            return Ok(None);
        };

        if password.len() < self.policy.file_password_min_length {
            return Err(AppError::validation(format!(
                "File password must be at least {} characters long",
                self.policy.file_password_min_length
            )));
        }

        Ok(Some(self.hasher.hash_password(password)?))
    }
}
