//! Application state shared across all handlers.

use std::sync::Arc;

use dropgate_auth::account::AccountManager;
use dropgate_core::config::AppConfig;
use dropgate_service::file::{FileService, UploadService};
use dropgate_service::share::ShareAccessService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Credential and session lifecycle manager.
    pub account_manager: Arc<AccountManager>,
    /// Share-link admission and download service.
    pub share_access: Arc<ShareAccessService>,
    /// Owner-facing file service.
    pub file_service: Arc<FileService>,
    /// Upload service.
    pub upload_service: Arc<UploadService>,
}
