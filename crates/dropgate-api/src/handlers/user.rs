//! User self-service handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.account_manager.get_user(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}
