//! Public share-link handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use dropgate_core::error::AppError;
use dropgate_service::share::AccessDecision;

use crate::dto::request::ShareDownloadRequest;
use crate::dto::response::{ApiResponse, ShareFileResponse};
use crate::error::{ApiError, deny_response};
use crate::extractors::OptionalAuthUser;
use crate::state::AppState;

/// GET /api/share/{token}
pub async fn file_info(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .share_access
        .file_info(&token, caller.as_ref())
        .await?;

    match result {
        Ok(file) => {
            let body = ApiResponse::ok(ShareFileResponse::from(file));
            Ok((StatusCode::OK, Json(body)).into_response())
        }
        Err(reason) => Ok(deny_response(reason)),
    }
}

/// POST /api/share/{token}/download
pub async fn download(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Path(token): Path<String>,
    Json(req): Json<ShareDownloadRequest>,
) -> Result<Response, ApiError> {
    let file = state.share_access.resolve(&token).await?;

    let decision = state
        .share_access
        .authorize(
            &file,
            caller.as_ref(),
            req.password.as_deref(),
            req.otp_code.as_deref(),
        )
        .await?;

    let reason = match decision {
        AccessDecision::Admit => {
            let result = state.share_access.download(&file, caller.as_ref()).await?;

            let response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, result.file.content_type.clone())
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", result.file.name),
                )
                .header(header::CONTENT_LENGTH, result.data.len())
                .body(Body::from(result.data))
                .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

            return Ok(response);
        }
        AccessDecision::Deny(reason) => reason,
    };

    Ok(deny_response(reason))
}
