//! Request context carrying the authenticated caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dropgate_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted from the bearer token and passed into service methods so
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
