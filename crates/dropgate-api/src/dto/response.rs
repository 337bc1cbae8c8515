//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dropgate_entity::file::File;
use dropgate_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: String,
    /// Whether two-factor login is enabled.
    pub totp_enabled: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.to_string(),
            totp_enabled: user.totp_enabled,
            created_at: user.created_at,
        }
    }
}

/// Login response: either a completed login or a pending two-factor
/// challenge.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LoginResponse {
    /// Two-factor is off; the token is ready.
    Authenticated {
        /// Signed access token.
        access_token: String,
        /// Token expiry.
        expires_at: DateTime<Utc>,
        /// The authenticated user.
        user: UserResponse,
    },
    /// Two-factor is on; confirm a one-time code against this id.
    TwoFactorPending {
        /// Correlation id for the pending challenge.
        correlation_id: Uuid,
    },
}

/// Completed two-factor login response.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: UserResponse,
}

/// Two-factor enrollment confirmation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotpVerifyResponse {
    /// Whether the code matched and two-factor is now enabled.
    pub verified: bool,
}

/// Owner-facing file representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    /// File ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// Share token for the public URL.
    pub share_token: String,
    /// Whether a download password is set.
    pub has_password: bool,
    /// Whether downloads require a one-time code.
    pub require_totp: bool,
    /// Whether the file is listed publicly.
    pub is_public: bool,
    /// Start of the availability window.
    pub available_from: DateTime<Utc>,
    /// End of the availability window.
    pub available_to: DateTime<Utc>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<File> for FileResponse {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            has_password: file.has_password(),
            name: file.name,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            share_token: file.share_token,
            require_totp: file.require_totp,
            is_public: file.is_public,
            available_from: file.available_from,
            available_to: file.available_to,
            created_at: file.created_at,
        }
    }
}

/// Public share-link metadata, as shown to a downloader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareFileResponse {
    /// Display name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// Whether a download password is required.
    pub has_password: bool,
    /// Whether a one-time code is required.
    pub require_totp: bool,
    /// Start of the availability window.
    pub available_from: DateTime<Utc>,
    /// End of the availability window.
    pub available_to: DateTime<Utc>,
}

impl From<File> for ShareFileResponse {
    fn from(file: File) -> Self {
        Self {
            has_password: file.has_password(),
            name: file.name,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            require_totp: file.require_totp,
            available_from: file.available_from,
            available_to: file.available_to,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}
