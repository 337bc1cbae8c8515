//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_ttl_minutes: u64,
    /// How long a pending login challenge stays valid, in seconds.
    #[serde(default = "default_challenge_ttl")]
    pub challenge_ttl_seconds: u64,
    /// Issuer label embedded in TOTP provisioning URIs.
    #[serde(default = "default_totp_issuer")]
    pub totp_issuer: String,
    /// Minimum password length for new accounts.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_challenge_ttl() -> u64 {
    300
}

fn default_totp_issuer() -> String {
    "Dropgate".to_string()
}

fn default_password_min() -> usize {
    8
}
