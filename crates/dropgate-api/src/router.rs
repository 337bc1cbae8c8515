//! Route definitions for the Dropgate HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Leave room for multipart framing around the payload itself.
    let max_body = state.config.storage.max_upload_size_bytes as usize + 1024 * 1024;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(file_routes())
        .merge(share_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: register, two-step login, logout, TOTP enrollment
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/login/totp", post(handlers::auth::login_totp))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/totp/setup", post(handlers::auth::totp_setup))
        .route("/auth/totp/verify", post(handlers::auth::totp_verify))
}

/// User self-service endpoints
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(handlers::user::me))
}

/// Owner file endpoints: upload, listing, summary, delete, history
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload", post(handlers::file::upload))
        .route("/files", get(handlers::file::list_files))
        .route("/files/summary", get(handlers::file::summary))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/history", get(handlers::file::download_history))
}

/// Public share-link endpoints
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/share/{token}", get(handlers::share::file_info))
        .route("/share/{token}/download", post(handlers::share::download))
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::Method;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new().allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<axum::http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    cors.max_age(std::time::Duration::from_secs(
        cors_config.max_age_seconds,
    ))
}
