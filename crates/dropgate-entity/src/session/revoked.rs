//! Revoked access token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An access token that was explicitly revoked by logout.
///
/// Keyed by the literal token string. Rows past `expires_at` can no longer
/// authorize anything anyway and are kept only until storage hygiene
/// removes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevokedToken {
    /// The literal access token string.
    pub token: String,
    /// The token's original expiry.
    pub expires_at: DateTime<Utc>,
}
