//! JWT token validation and blacklist checking.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use dropgate_core::config::auth::AuthConfig;
use dropgate_core::error::AppError;
use dropgate_entity::store::AuthStore;

use super::claims::Claims;

/// Validates access tokens and checks revocation status.
///
/// Revocation is keyed by the literal token string, so a revoked token
/// stays dead even though its signature and expiry remain structurally
/// valid.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Blacklist persistence.
    auth_store: Arc<dyn AuthStore>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, auth_store: Arc<dyn AuthStore>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            auth_store,
        }
    }

    /// Decodes and fully validates an access token string.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Expiration
    /// 3. Token not in the revocation blacklist
    ///
    /// The blacklist is consulted before any claim inside the token is
    /// handed to a caller.
    pub async fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_unchecked(token)?;

        if self.auth_store.is_token_revoked(token).await? {
            return Err(AppError::unauthorized("Token has been revoked"));
        }

        Ok(claims)
    }

    /// Decodes a token, verifying signature and expiry only.
    ///
    /// Used by logout, which needs the original expiry of a token it is
    /// about to revoke.
    pub fn decode_unchecked(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}
