//! RFC 6238 one-time code generation and validation.

use totp_rs::{Algorithm, Secret, TOTP};

use dropgate_core::config::auth::AuthConfig;
use dropgate_core::error::AppError;

/// Number of digits in a one-time code.
const DIGITS: usize = 6;
/// Time step in seconds.
const STEP_SECONDS: u64 = 30;
/// Accepted skew in steps on either side of the current one.
const SKEW_STEPS: u8 = 1;

/// Generates per-user secrets and validates one-time codes against them.
#[derive(Debug, Clone)]
pub struct TotpEngine {
    /// Issuer label embedded in provisioning URIs.
    issuer: String,
}

impl TotpEngine {
    /// Creates a new engine from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            issuer: config.totp_issuer.clone(),
        }
    }

    /// Generates a fresh random secret, base32-encoded.
    pub fn generate_secret(&self) -> String {
        match Secret::generate_secret().to_encoded() {
            Secret::Encoded(s) => s,
            Secret::Raw(bytes) => Secret::Raw(bytes).to_string(),
        }
    }

    /// Builds the otpauth:// provisioning URI for a secret bound to the
    /// given account name under the configured issuer.
    pub fn provisioning_url(&self, secret: &str, account: &str) -> Result<String, AppError> {
        Ok(self.totp(secret, account)?.get_url())
    }

    /// Validates a one-time code at the given unix timestamp, tolerating
    /// one step of skew on either side.
    pub fn check(
        &self,
        secret: &str,
        account: &str,
        code: &str,
        unix_time: u64,
    ) -> Result<bool, AppError> {
        Ok(self.totp(secret, account)?.check(code, unix_time))
    }

    /// Generates the code for the step containing the given unix timestamp.
    ///
    /// Used by tests and enrollment round-trip checks.
    pub fn generate(&self, secret: &str, account: &str, unix_time: u64) -> Result<String, AppError> {
        Ok(self.totp(secret, account)?.generate(unix_time))
    }

    fn totp(&self, secret: &str, account: &str) -> Result<TOTP, AppError> {
        let secret_bytes = Secret::Encoded(secret.to_string())
            .to_bytes()
            .map_err(|e| AppError::internal(format!("Invalid TOTP secret: {e:?}")))?;

        TOTP::new(
            Algorithm::SHA1,
            DIGITS,
            SKEW_STEPS,
            STEP_SECONDS,
            secret_bytes,
            Some(self.issuer.clone()),
            account.to_string(),
        )
        .map_err(|e| AppError::internal(format!("Failed to build TOTP instance: {e}")))
    }
}
