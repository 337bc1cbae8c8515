//! Shared test fixtures: a fully wired service stack over the in-memory
//! stores with a pinned clock.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use dropgate_auth::account::{AccountManager, LoginOutcome};
use dropgate_auth::jwt::{JwtDecoder, JwtEncoder};
use dropgate_auth::password::PasswordHasher;
use dropgate_auth::totp::TotpEngine;
use dropgate_core::config::auth::AuthConfig;
use dropgate_core::config::policy::SharePolicy;
use dropgate_core::traits::clock::{Clock, FixedClock};
use dropgate_database::repositories::memory::{MemoryAuthStore, MemoryFileStore, MemoryUserStore};
use dropgate_entity::file::File;
use dropgate_entity::user::User;
use dropgate_service::context::RequestContext;
use dropgate_service::file::{FileService, UploadRequest, UploadService};
use dropgate_service::share::ShareAccessService;
use dropgate_storage::MemoryBlobStore;

/// Maximum upload size used in tests.
pub const TEST_MAX_UPLOAD: u64 = 1024 * 1024;

/// A fully wired test environment.
pub struct TestEnv {
    pub users: Arc<MemoryUserStore>,
    pub files: Arc<MemoryFileStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub clock: FixedClock,
    pub totp: Arc<TotpEngine>,
    pub manager: AccountManager,
    pub access: ShareAccessService,
    pub file_service: FileService,
    pub upload_service: UploadService,
}

/// The instant every test clock starts at.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

/// Build a wired environment over fresh in-memory stores.
pub fn test_env() -> TestEnv {
    let config = AuthConfig {
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_minutes: 60,
        challenge_ttl_seconds: 300,
        totp_issuer: "Dropgate".to_string(),
        password_min_length: 8,
    };

    let users = Arc::new(MemoryUserStore::new());
    let auth_store = Arc::new(MemoryAuthStore::new());
    let files = Arc::new(MemoryFileStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let clock = FixedClock::at(base_time());
    let clock_arc: Arc<dyn Clock> = Arc::new(clock.clone());

    let hasher = Arc::new(PasswordHasher::new());
    let jwt_encoder = Arc::new(JwtEncoder::new(&config));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config, auth_store.clone()));
    let totp = Arc::new(TotpEngine::new(&config));

    let manager = AccountManager::new(
        users.clone(),
        auth_store.clone(),
        hasher.clone(),
        jwt_encoder,
        jwt_decoder,
        totp.clone(),
        clock_arc.clone(),
        &config,
    );

    let access = ShareAccessService::new(
        files.clone(),
        users.clone(),
        blobs.clone(),
        hasher.clone(),
        totp.clone(),
        clock_arc.clone(),
    );

    let file_service = FileService::new(files.clone(), clock_arc.clone());

    let upload_service = UploadService::new(
        files.clone(),
        blobs.clone(),
        hasher,
        clock_arc,
        SharePolicy::default(),
        TEST_MAX_UPLOAD,
    );

    TestEnv {
        users,
        files,
        blobs,
        clock,
        totp,
        manager,
        access,
        file_service,
        upload_service,
    }
}

impl TestEnv {
    /// Register a user and return it.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> User {
        self.manager
            .register(username, password, email)
            .await
            .expect("registration failed")
    }

    /// Register a user and log in, returning the user and a valid token.
    pub async fn register_and_login(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> (User, String) {
        let user = self.register(username, email, password).await;
        match self.manager.login(email, password).await.unwrap() {
            LoginOutcome::Authenticated(issued) => (user, issued.token),
            LoginOutcome::ChallengeIssued { .. } => panic!("unexpected two-factor challenge"),
        }
    }

    /// The request context for a user.
    pub fn ctx(&self, user: &User) -> RequestContext {
        RequestContext::new(user.id, user.role)
    }

    /// Upload a small file with the given window offset (hours from the
    /// pinned clock) and options.
    pub async fn upload_file(
        &self,
        owner: Option<Uuid>,
        name: &str,
        from_offset_hours: i64,
        to_offset_hours: i64,
        password: Option<&str>,
        require_totp: bool,
    ) -> File {
        let now = self.clock.now();
        let req = UploadRequest {
            name: name.to_string(),
            content_type: "text/plain".to_string(),
            password: password.map(String::from),
            available_from: Some(now + chrono::Duration::hours(from_offset_hours)),
            available_to: Some(now + chrono::Duration::hours(to_offset_hours)),
            require_totp,
            is_public: false,
        };
        self.upload_service
            .upload(&req, Bytes::from_static(b"test payload"), owner)
            .await
            .expect("upload failed")
    }

    /// Enable two-factor for a user the way the product does: run setup,
    /// then confirm with a code derived from the returned secret.
    pub async fn enable_totp(&self, user: &User) -> String {
        let setup = self.manager.setup_totp(user.id).await.unwrap();
        let code = self
            .totp
            .generate(
                &setup.secret,
                &user.username,
                self.clock.now().timestamp() as u64,
            )
            .unwrap();
        assert!(self.manager.verify_totp_setup(user.id, &code).await.unwrap());
        setup.secret
    }

    /// Generate the current one-time code for a secret.
    pub fn current_code(&self, secret: &str, username: &str) -> String {
        self.totp
            .generate(secret, username, self.clock.now().timestamp() as u64)
            .unwrap()
    }
}
