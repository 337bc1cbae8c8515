//! Pending two-factor login challenge.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A login that has passed the password check and is waiting for a
/// one-time code.
///
/// The correlation id is a UUID v7, so its creation instant is embedded in
/// the identifier itself; no side-channel timestamp column is needed for
/// the staleness check. At most one challenge exists per user: issuing a
/// new one replaces any pending one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginChallenge {
    /// Time-ordered correlation identifier handed to the client.
    pub correlation_id: Uuid,
    /// The user the challenge belongs to.
    pub user_id: Uuid,
}
