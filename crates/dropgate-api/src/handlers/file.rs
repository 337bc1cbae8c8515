//! Owner file handlers — upload, listing, summary, deletion, history.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use dropgate_core::error::AppError;
use dropgate_core::types::pagination::PageRequest;
use dropgate_core::types::sorting::{FileSortField, SortDirection};
use dropgate_entity::file::{FileListQuery, FileSummary, StatusFilter};
use dropgate_entity::download::FileDownloadHistory;
use dropgate_service::file::UploadRequest;

use crate::dto::request::ListFilesParams;
use crate::dto::response::{ApiResponse, FileResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, OptionalAuthUser};
use crate::state::AppState;

/// POST /api/files/upload — multipart upload, anonymous or authenticated.
pub async fn upload(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Bytes> = None;
    let mut password: Option<String> = None;
    let mut available_from: Option<DateTime<Utc>> = None;
    let mut available_to: Option<DateTime<Utc>> = None;
    let mut require_totp = false;
    let mut is_public = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(String::from);
                content_type = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "password" => {
                password = Some(read_text(field).await?);
            }
            "available_from" => {
                available_from = Some(parse_timestamp(&read_text(field).await?)?);
            }
            "available_to" => {
                available_to = Some(parse_timestamp(&read_text(field).await?)?);
            }
            "require_totp" => {
                require_totp = read_text(field).await?.parse().unwrap_or(false);
            }
            "is_public" => {
                is_public = read_text(field).await?.parse().unwrap_or(false);
            }
            _ => {}
        }
    }

    let file_name = file_name.ok_or_else(|| AppError::validation("file is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file data is required"))?;

    let req = UploadRequest {
        name: file_name,
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        password,
        available_from,
        available_to,
        require_totp,
        is_public,
    };

    let file = state
        .upload_service
        .upload(&req, data, caller.map(|ctx| ctx.user_id))
        .await?;

    Ok(Json(ApiResponse::ok(FileResponse::from(file))))
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListFilesParams>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let query = into_list_query(&params);
    let page = state.file_service.list_owned(&auth, &query).await?;

    let items: Vec<FileResponse> = page.items.into_iter().map(FileResponse::from).collect();
    Ok(Json(ApiResponse::ok(serde_json::json!({
        "items": items,
        "page": page.page,
        "limit": page.limit,
        "total_items": page.total_items,
        "total_pages": page.total_pages,
    }))))
}

/// GET /api/files/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<FileSummary>>, ApiError> {
    let summary = state.file_service.summary(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.file_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "File deleted".to_string(),
    })))
}

/// GET /api/files/{id}/history
pub async fn download_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileDownloadHistory>>, ApiError> {
    let history = state.file_service.download_history(&auth, id).await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// Translate the raw query parameters into a typed listing query.
///
/// Unknown status values fall back to an unfiltered listing.
fn into_list_query(params: &ListFilesParams) -> FileListQuery {
    let status = params
        .status
        .as_deref()
        .map(StatusFilter::parse)
        .unwrap_or_default();

    let sort_by = match params.sort_by.as_deref() {
        Some("fileName") => FileSortField::FileName,
        _ => FileSortField::CreatedAt,
    };

    let order = match params.order.as_deref() {
        Some(o) if o.eq_ignore_ascii_case("asc") => SortDirection::Asc,
        _ => SortDirection::Desc,
    };

    FileListQuery {
        status,
        sort_by,
        order,
        page: PageRequest::new(params.page.unwrap_or(1), params.limit.unwrap_or(20)),
    }
}

/// Read a multipart text field.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Read error: {e}")))
}

/// Parse an RFC 3339 timestamp field.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::validation(format!("Invalid timestamp: '{value}'")))
}
