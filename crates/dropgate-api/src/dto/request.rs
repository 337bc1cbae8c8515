//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Plaintext password (policy enforced downstream).
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Password login payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Two-factor confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TotpLoginRequest {
    /// Correlation id returned by the password step.
    pub correlation_id: Uuid,
    /// Current one-time code.
    #[validate(length(min = 6, max = 8))]
    pub code: String,
}

/// Two-factor enrollment confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TotpVerifyRequest {
    /// Code from the freshly enrolled authenticator.
    #[validate(length(min = 6, max = 8))]
    pub code: String,
}

/// Credentials accompanying a share download.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareDownloadRequest {
    /// File password, if the file is protected.
    pub password: Option<String>,
    /// One-time code, if the file requires one.
    pub otp_code: Option<String>,
}

/// Query parameters for the owner file listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilesParams {
    /// Availability-state filter (`active`/`pending`/`expired`/`all`).
    pub status: Option<String>,
    /// Sort column (`createdAt` or `fileName`).
    pub sort_by: Option<String>,
    /// Sort direction (`asc` or `desc`).
    pub order: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub limit: Option<u64>,
}
