//! Maps domain errors and share denials to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use dropgate_core::error::{AppError, ErrorKind};
use dropgate_service::share::DenyReason;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper carrying an [`AppError`] out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = match err.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Database
            | ErrorKind::Storage
            | ErrorKind::Configuration
            | ErrorKind::Internal => {
                tracing::error!(error = %err.message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Build the HTTP response for a refused share request.
///
/// `PASSWORD_REQUIRED` maps to 401 (supply credentials and retry); every
/// other reason is a 403 with its stable code.
pub fn deny_response(reason: DenyReason) -> Response {
    let status = match reason {
        DenyReason::PasswordRequired => StatusCode::UNAUTHORIZED,
        _ => StatusCode::FORBIDDEN,
    };

    let message = match reason {
        DenyReason::NotAvailableYet => "This share link is not available yet",
        DenyReason::Expired => "This share link has expired",
        DenyReason::PasswordRequired => "This file requires a password",
        DenyReason::PasswordIncorrect => "Incorrect file password",
        DenyReason::TwoFactorRequired => "This file requires a valid one-time code",
    };

    let body = ApiErrorResponse {
        error: reason.code().to_string(),
        message: message.to_string(),
    };

    (status, Json(body)).into_response()
}
