//! Dropgate server — time-gated file sharing backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use dropgate_core::config::AppConfig;
use dropgate_core::error::AppError;
use dropgate_core::traits::clock::SystemClock;

#[tokio::main]
async fn main() {
    let env = std::env::var("DROPGATE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Dropgate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = dropgate_database::DatabasePool::connect(&config.database).await?;
    dropgate_database::migration::run_migrations(db.pool()).await?;
    let pool = db.into_pool();

    // ── Step 2: Blob storage ─────────────────────────────────────
    tracing::info!(root = %config.storage.blob_root, "Initializing blob storage");
    let blobs: Arc<dyn dropgate_core::traits::storage::BlobStore> =
        Arc::new(dropgate_storage::LocalBlobStore::new(&config.storage.blob_root).await?);

    // ── Step 3: Stores ───────────────────────────────────────────
    let user_store: Arc<dyn dropgate_entity::store::UserStore> = Arc::new(
        dropgate_database::repositories::PgUserStore::new(pool.clone()),
    );
    let auth_store: Arc<dyn dropgate_entity::store::AuthStore> = Arc::new(
        dropgate_database::repositories::PgAuthStore::new(pool.clone()),
    );
    let file_store: Arc<dyn dropgate_entity::store::FileStore> = Arc::new(
        dropgate_database::repositories::PgFileStore::new(pool.clone()),
    );

    // ── Step 4: Auth components ──────────────────────────────────
    let clock: Arc<dyn dropgate_core::traits::clock::Clock> = Arc::new(SystemClock);
    let hasher = Arc::new(dropgate_auth::password::PasswordHasher::new());
    let jwt_encoder = Arc::new(dropgate_auth::jwt::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(dropgate_auth::jwt::JwtDecoder::new(
        &config.auth,
        Arc::clone(&auth_store),
    ));
    let totp = Arc::new(dropgate_auth::totp::TotpEngine::new(&config.auth));

    let account_manager = Arc::new(dropgate_auth::account::AccountManager::new(
        Arc::clone(&user_store),
        Arc::clone(&auth_store),
        Arc::clone(&hasher),
        jwt_encoder,
        jwt_decoder,
        Arc::clone(&totp),
        Arc::clone(&clock),
        &config.auth,
    ));

    // ── Step 5: Services ─────────────────────────────────────────
    let share_access = Arc::new(dropgate_service::share::ShareAccessService::new(
        Arc::clone(&file_store),
        Arc::clone(&user_store),
        Arc::clone(&blobs),
        Arc::clone(&hasher),
        Arc::clone(&totp),
        Arc::clone(&clock),
    ));
    let file_service = Arc::new(dropgate_service::file::FileService::new(
        Arc::clone(&file_store),
        Arc::clone(&clock),
    ));
    let upload_service = Arc::new(dropgate_service::file::UploadService::new(
        Arc::clone(&file_store),
        Arc::clone(&blobs),
        Arc::clone(&hasher),
        Arc::clone(&clock),
        config.policy.clone(),
        config.storage.max_upload_size_bytes,
    ));

    // ── Step 6: HTTP server ──────────────────────────────────────
    let app_state = dropgate_api::state::AppState {
        config: Arc::new(config.clone()),
        account_manager,
        share_access,
        file_service,
        upload_service,
    };

    let app = dropgate_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Dropgate server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Dropgate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
