//! Bearer token extractors — pull the JWT from the Authorization header,
//! validate it (including the revocation blacklist), and inject the caller
//! context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use dropgate_core::error::AppError;
use dropgate_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The raw bearer token string, without validation.
///
/// Used by logout, which revokes the literal token value.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_bearer(parts)?))
    }
}

/// Extracted authenticated caller context, required.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;
        let authenticated = state.account_manager.authenticate(&token).await?;
        Ok(AuthUser(RequestContext::new(
            authenticated.user_id,
            authenticated.role,
        )))
    }
}

/// Extracted caller context for endpoints that also serve anonymous
/// callers.
///
/// No Authorization header means anonymous; a present but invalid token
/// is still rejected rather than silently downgraded.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<RequestContext>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get("authorization").is_none() {
            return Ok(OptionalAuthUser(None));
        }

        let AuthUser(ctx) = AuthUser::from_request_parts(parts, state).await?;
        Ok(OptionalAuthUser(Some(ctx)))
    }
}

/// Pull the token out of a `Bearer` Authorization header.
fn extract_bearer(parts: &Parts) -> Result<String, ApiError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError(AppError::unauthorized("Missing Authorization header")))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError(AppError::unauthorized("Invalid Authorization header format")))?;

    Ok(token.to_string())
}
