//! Login challenge and token blacklist store over PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use dropgate_core::error::{AppError, ErrorKind};
use dropgate_core::result::AppResult;
use dropgate_entity::session::{LoginChallenge, RevokedToken};
use dropgate_entity::store::AuthStore;

/// PostgreSQL-backed [`AuthStore`].
#[derive(Debug, Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    /// Create a new auth store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn put_challenge(&self, user_id: Uuid, correlation_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO login_challenges (user_id, correlation_id) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET correlation_id = EXCLUDED.correlation_id",
        )
        .bind(user_id)
        .bind(correlation_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store login challenge", e)
        })?;
        Ok(())
    }

    async fn take_challenge(&self, correlation_id: Uuid) -> AppResult<Option<LoginChallenge>> {
        // Single-statement delete-and-return: at most one concurrent
        // caller observes the row.
        sqlx::query_as::<_, LoginChallenge>(
            "DELETE FROM login_challenges WHERE correlation_id = $1 \
             RETURNING correlation_id, user_id",
        )
        .bind(correlation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume login challenge", e)
        })
    }

    async fn revoke_token(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO revoked_tokens (token, expires_at) VALUES ($1, $2) \
             ON CONFLICT (token) DO NOTHING",
        )
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> AppResult<bool> {
        let row = sqlx::query_as::<_, RevokedToken>(
            "SELECT * FROM revoked_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check token revocation", e)
        })?;

        Ok(row.is_some())
    }
}
