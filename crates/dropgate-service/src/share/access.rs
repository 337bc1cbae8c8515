//! Share access control — resolves share tokens and decides admission.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dropgate_auth::password::PasswordHasher;
use dropgate_auth::totp::TotpEngine;
use dropgate_core::error::AppError;
use dropgate_core::traits::clock::Clock;
use dropgate_core::traits::storage::BlobStore;
use dropgate_entity::file::{File, FileStatus};
use dropgate_entity::store::{FileStore, UserStore};

use crate::context::RequestContext;

/// Why a share request was refused.
///
/// Each reason carries a stable machine-readable code so clients can react
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// The availability window has not opened.
    NotAvailableYet,
    /// The availability window has closed.
    Expired,
    /// The file is password-protected and no password was supplied.
    PasswordRequired,
    /// The supplied password did not match.
    PasswordIncorrect,
    /// The file requires a one-time code the caller did not validly present.
    TwoFactorRequired,
}

impl DenyReason {
    /// The stable machine-readable code for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAvailableYet => "NOT_AVAILABLE_YET",
            Self::Expired => "EXPIRED",
            Self::PasswordRequired => "PASSWORD_REQUIRED",
            Self::PasswordIncorrect => "PASSWORD_INCORRECT",
            Self::TwoFactorRequired => "TWO_FACTOR_REQUIRED",
        }
    }
}

/// Outcome of the admission decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// All checks passed; the download may proceed.
    Admit,
    /// At least one check failed.
    Deny(DenyReason),
}

/// File metadata and payload for an admitted download.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// File metadata.
    pub file: File,
    /// Payload bytes.
    pub data: Bytes,
}

/// Decides, per request, whether a share-link download may proceed.
///
/// The decision depends only on the file record, the caller, and the
/// current instant; nothing is cached between requests and expiry is
/// evaluated lazily at read time.
#[derive(Clone)]
pub struct ShareAccessService {
    /// File persistence.
    files: Arc<dyn FileStore>,
    /// User persistence, for the caller's TOTP secret.
    users: Arc<dyn UserStore>,
    /// Payload storage.
    blobs: Arc<dyn BlobStore>,
    /// Password hasher for file passwords.
    hasher: Arc<PasswordHasher>,
    /// One-time code engine.
    totp: Arc<TotpEngine>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ShareAccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareAccessService").finish()
    }
}

impl ShareAccessService {
    /// Creates a new share access service.
    pub fn new(
        files: Arc<dyn FileStore>,
        users: Arc<dyn UserStore>,
        blobs: Arc<dyn BlobStore>,
        hasher: Arc<PasswordHasher>,
        totp: Arc<TotpEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            files,
            users,
            blobs,
            hasher,
            totp,
            clock,
        }
    }

    /// Resolves a share token to its file record.
    ///
    /// Soft-deleted files and unknown tokens are indistinguishable.
    pub async fn resolve(&self, share_token: &str) -> Result<File, AppError> {
        self.files
            .find_by_share_token(share_token)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))
    }

    /// Decides whether this caller may download the file right now.
    ///
    /// Checks run in a fixed order and all must pass:
    /// availability window (owners are exempt), password, one-time code.
    pub async fn authorize(
        &self,
        file: &File,
        caller: Option<&RequestContext>,
        password: Option<&str>,
        otp_code: Option<&str>,
    ) -> Result<AccessDecision, AppError> {
        let is_owner = caller.is_some_and(|ctx| file.is_owned_by(ctx.user_id));

        if !is_owner {
            match file.status_at(self.clock.now()) {
                FileStatus::Pending => {
                    return Ok(AccessDecision::Deny(DenyReason::NotAvailableYet));
                }
                FileStatus::Expired => {
                    return Ok(AccessDecision::Deny(DenyReason::Expired));
                }
                FileStatus::Active => {}
            }
        }

        if let Some(hash) = file.password_hash.as_deref() {
            let Some(password) = password else {
                return Ok(AccessDecision::Deny(DenyReason::PasswordRequired));
            };
            if !self.hasher.verify_password(password, hash)? {
                return Ok(AccessDecision::Deny(DenyReason::PasswordIncorrect));
            }
        }

        if file.require_totp && !self.verify_caller_code(caller, otp_code).await? {
            return Ok(AccessDecision::Deny(DenyReason::TwoFactorRequired));
        }

        Ok(AccessDecision::Admit)
    }

    /// Retrieves the payload for an admitted download and records it in
    /// the ledger.
    ///
    /// A ledger write failure is logged and does not fail the download:
    /// the audit trail is best-effort, the authorization above is not.
    pub async fn download(
        &self,
        file: &File,
        caller: Option<&RequestContext>,
    ) -> Result<DownloadResult, AppError> {
        let data = self.blobs.get(file.id).await?;

        let downloader_id = caller.map(|ctx| ctx.user_id);
        if let Err(e) = self
            .files
            .record_download(file.id, downloader_id, self.clock.now())
            .await
        {
            warn!(file_id = %file.id, error = %e, "Failed to record download");
        }

        info!(file_id = %file.id, downloader = ?downloader_id, "Download admitted");
        Ok(DownloadResult {
            file: file.clone(),
            data,
        })
    }

    /// Resolves a share token for metadata display.
    ///
    /// Applies the availability gate (owners exempt) but not the password
    /// or two-factor checks, and touches neither payload nor ledger.
    pub async fn file_info(
        &self,
        share_token: &str,
        caller: Option<&RequestContext>,
    ) -> Result<Result<File, DenyReason>, AppError> {
        let file = self.resolve(share_token).await?;

        let is_owner = caller.is_some_and(|ctx| file.is_owned_by(ctx.user_id));
        if !is_owner {
            match file.status_at(self.clock.now()) {
                FileStatus::Pending => return Ok(Err(DenyReason::NotAvailableYet)),
                FileStatus::Expired => return Ok(Err(DenyReason::Expired)),
                FileStatus::Active => {}
            }
        }

        Ok(Ok(file))
    }

    /// Checks the caller's one-time code against their own enabled secret.
    ///
    /// Anonymous callers, callers without two-factor, and absent or wrong
    /// codes all fail the same way.
    async fn verify_caller_code(
        &self,
        caller: Option<&RequestContext>,
        otp_code: Option<&str>,
    ) -> Result<bool, AppError> {
        let (Some(ctx), Some(code)) = (caller, otp_code) else {
            return Ok(false);
        };

        let Some(user) = self.users.find_by_id(ctx.user_id).await? else {
            return Ok(false);
        };

        let Some(secret) = user.totp_secret.as_deref().filter(|_| user.totp_enabled) else {
            return Ok(false);
        };

        self.totp.check(
            secret,
            &user.username,
            code,
            self.clock.now().timestamp() as u64,
        )
    }
}
