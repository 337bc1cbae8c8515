//! Account lifecycle manager — registration, two-step login, logout, and
//! two-factor enrollment.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use dropgate_core::config::auth::AuthConfig;
use dropgate_core::error::AppError;
use dropgate_core::traits::clock::Clock;
use dropgate_entity::store::{AuthStore, UserStore};
use dropgate_entity::user::{CreateUser, User, UserRole};

use crate::correlation;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::totp::qr::qr_png_data_uri;
use crate::totp::TotpEngine;

/// A freshly issued access token together with the authenticated user.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IssuedToken {
    /// Signed access token.
    pub token: String,
    /// Token expiry.
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// The authenticated user.
    pub user: User,
}

/// Result of a successful password check.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Two-factor is off; the login is complete.
    Authenticated(IssuedToken),
    /// Two-factor is on; the client must confirm a one-time code against
    /// this correlation id before any token is issued.
    ChallengeIssued {
        /// Correlation id binding the pending challenge to this attempt.
        correlation_id: Uuid,
    },
}

/// Identity extracted from a valid, unrevoked access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    /// The token subject.
    pub user_id: Uuid,
    /// Role at issuance time.
    pub role: UserRole,
}

/// Result of starting two-factor enrollment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TotpSetup {
    /// Base32 secret for manual entry.
    pub secret: String,
    /// otpauth:// provisioning URI.
    pub otpauth_url: String,
    /// The same URI rendered as a base64 PNG data URI.
    pub qr_code: String,
}

/// Orchestrates the credential and session lifecycle.
///
/// Login is a state machine: a password check either completes
/// (token issued) or pauses on a pending challenge that must be confirmed
/// with a one-time code inside the challenge window. Any failure on any
/// edge drops back to the unauthenticated state; a consumed challenge is
/// gone regardless of outcome.
#[derive(Clone)]
pub struct AccountManager {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Challenge and blacklist persistence.
    auth_store: Arc<dyn AuthStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    password_policy: PasswordValidator,
    /// Access token encoder.
    jwt_encoder: Arc<JwtEncoder>,
    /// Access token decoder and blacklist gate.
    jwt_decoder: Arc<JwtDecoder>,
    /// One-time code engine.
    totp: Arc<TotpEngine>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// How long a pending challenge stays valid.
    challenge_ttl: Duration,
}

impl std::fmt::Debug for AccountManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountManager")
            .field("challenge_ttl", &self.challenge_ttl)
            .finish()
    }
}

impl AccountManager {
    /// Creates a new account manager with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        auth_store: Arc<dyn AuthStore>,
        hasher: Arc<PasswordHasher>,
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        totp: Arc<TotpEngine>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            auth_store,
            hasher,
            password_policy: PasswordValidator::new(config),
            jwt_encoder,
            jwt_decoder,
            totp,
            clock,
            challenge_ttl: Duration::seconds(config.challenge_ttl_seconds as i64),
        }
    }

    /// Registers a new account.
    ///
    /// The password goes through the configured policy and is stored as an
    /// Argon2id hash. Uniqueness violations surface as `Conflict` from the
    /// store.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, AppError> {
        self.password_policy.validate(password)?;

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: normalize_email(email),
                password_hash,
                role: UserRole::User,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Performs the password step of the login flow.
    ///
    /// A missing account and a wrong password produce the same error, so
    /// the endpoint cannot be used to enumerate accounts. With two-factor
    /// off a token is issued immediately; with it on, a pending challenge
    /// replaces any earlier one for the same user and no token exists yet.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        let password_valid = self
            .hasher
            .verify_password(password, &user.password_hash)?;
        if !password_valid {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }

        if user.totp_enabled {
            let correlation_id = correlation::new_correlation_id(self.clock.now());
            self.auth_store
                .put_challenge(user.id, correlation_id)
                .await?;

            info!(user_id = %user.id, "Login pending two-factor confirmation");
            return Ok(LoginOutcome::ChallengeIssued { correlation_id });
        }

        let issued = self.issue_token(user)?;
        info!(user_id = %issued.user.id, "Login successful");
        Ok(LoginOutcome::Authenticated(issued))
    }

    /// Confirms a pending two-factor challenge and completes the login.
    ///
    /// The challenge is consumed atomically up front, so no correlation id
    /// can ever be honored twice and a failed attempt burns it. Staleness
    /// is judged from the instant embedded in the correlation id, after
    /// the code itself has been checked: a valid code does not resurrect
    /// an expired challenge.
    pub async fn confirm_totp(
        &self,
        correlation_id: Uuid,
        code: &str,
    ) -> Result<IssuedToken, AppError> {
        let challenge = self
            .auth_store
            .take_challenge(correlation_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid login challenge"))?;

        let user = self
            .users
            .find_by_id(challenge.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid login challenge"))?;

        let secret = user
            .totp_secret
            .as_deref()
            .ok_or_else(|| AppError::unauthorized("Invalid login challenge"))?;

        let now = self.clock.now();
        let code_valid = self
            .totp
            .check(secret, &user.username, code, now.timestamp() as u64)?;
        if !code_valid {
            warn!(user_id = %user.id, "Two-factor confirmation failed: wrong code");
            return Err(AppError::unauthorized("Invalid one-time code"));
        }

        let issued_at = correlation::issued_at(&correlation_id)
            .ok_or_else(|| AppError::unauthorized("Invalid login challenge"))?;
        if now - issued_at > self.challenge_ttl {
            warn!(user_id = %user.id, "Two-factor confirmation failed: challenge expired");
            return Err(AppError::unauthorized("Login challenge has expired"));
        }

        let issued = self.issue_token(user)?;
        info!(user_id = %issued.user.id, "Two-factor login successful");
        Ok(issued)
    }

    /// Revokes an access token.
    ///
    /// The token must still parse and verify; it is then blacklisted under
    /// its literal value until its original expiry. Re-revoking is a no-op.
    pub async fn logout(&self, raw_token: &str) -> Result<(), AppError> {
        let claims = self.jwt_decoder.decode_unchecked(raw_token)?;

        self.auth_store
            .revoke_token(raw_token, claims.expires_at())
            .await?;

        info!(user_id = %claims.user_id(), "Token revoked on logout");
        Ok(())
    }

    /// Validates a bearer token and returns the identity it carries.
    ///
    /// The blacklist is consulted before any claim is trusted.
    pub async fn authenticate(&self, raw_token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.jwt_decoder.decode_access_token(raw_token).await?;
        Ok(AuthenticatedUser {
            user_id: claims.user_id(),
            role: claims.role,
        })
    }

    /// Starts two-factor enrollment for a user.
    ///
    /// A fresh secret is stored immediately, but two-factor stays disabled
    /// until [`Self::verify_totp_setup`] confirms the authenticator is set
    /// up correctly.
    pub async fn setup_totp(&self, user_id: Uuid) -> Result<TotpSetup, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let secret = self.totp.generate_secret();
        self.users.save_totp_secret(user.id, &secret).await?;

        let otpauth_url = self.totp.provisioning_url(&secret, &user.username)?;
        let qr_code = qr_png_data_uri(&otpauth_url)?;

        info!(user_id = %user.id, "Two-factor enrollment started");
        Ok(TotpSetup {
            secret,
            otpauth_url,
            qr_code,
        })
    }

    /// Confirms two-factor enrollment with a code from the authenticator.
    ///
    /// On success the enabled flag flips permanently and every subsequent
    /// login requires a one-time code. A wrong code returns `false` and
    /// leaves the stored secret in place for another attempt.
    pub async fn verify_totp_setup(&self, user_id: Uuid, code: &str) -> Result<bool, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let secret = user
            .totp_secret
            .as_deref()
            .ok_or_else(|| AppError::unauthorized("Two-factor setup has not been started"))?;

        let valid = self.totp.check(
            secret,
            &user.username,
            code,
            self.clock.now().timestamp() as u64,
        )?;

        if valid {
            self.users.enable_totp(user.id).await?;
            info!(user_id = %user.id, "Two-factor enabled");
        }

        Ok(valid)
    }

    /// Looks up a user's profile.
    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn issue_token(&self, user: User) -> Result<IssuedToken, AppError> {
        let (token, expires_at) =
            self.jwt_encoder
                .generate_access_token(user.id, user.role, self.clock.now())?;
        Ok(IssuedToken {
            token,
            expires_at,
            user,
        })
    }
}

/// The shared error for a failed password check.
///
/// Identical for unknown accounts and wrong passwords.
fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid email or password")
}

/// Lowercase and trim an email for lookups and storage.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
