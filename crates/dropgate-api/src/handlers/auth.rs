//! Auth handlers — register, two-step login, logout, two-factor
//! enrollment.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use dropgate_auth::account::{LoginOutcome, TotpSetup};
use dropgate_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest, TotpLoginRequest, TotpVerifyRequest};
use crate::dto::response::{
    ApiResponse, LoginResponse, MessageResponse, TokenResponse, TotpVerifyResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, BearerToken};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state
        .account_manager
        .register(&req.username, &req.password, &req.email)
        .await?;

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let outcome = state
        .account_manager
        .login(&req.email, &req.password)
        .await?;

    let response = match outcome {
        LoginOutcome::Authenticated(issued) => LoginResponse::Authenticated {
            access_token: issued.token,
            expires_at: issued.expires_at,
            user: UserResponse::from(issued.user),
        },
        LoginOutcome::ChallengeIssued { correlation_id } => {
            LoginResponse::TwoFactorPending { correlation_id }
        }
    };

    Ok(Json(ApiResponse::ok(response)))
}

/// POST /api/auth/login/totp
pub async fn login_totp(
    State(state): State<AppState>,
    Json(req): Json<TotpLoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let issued = state
        .account_manager
        .confirm_totp(req.correlation_id, &req.code)
        .await?;

    Ok(Json(ApiResponse::ok(TokenResponse {
        access_token: issued.token,
        expires_at: issued.expires_at,
        user: UserResponse::from(issued.user),
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.account_manager.logout(&token).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// POST /api/auth/totp/setup
pub async fn totp_setup(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<TotpSetup>>, ApiError> {
    let setup = state.account_manager.setup_totp(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(setup)))
}

/// POST /api/auth/totp/verify
pub async fn totp_verify(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<TotpVerifyRequest>,
) -> Result<Json<ApiResponse<TotpVerifyResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let verified = state
        .account_manager
        .verify_totp_setup(auth.user_id, &req.code)
        .await?;

    Ok(Json(ApiResponse::ok(TotpVerifyResponse { verified })))
}
