//! Integration tests for time-bounded share access control.

mod common;

use bytes::Bytes;
use chrono::Duration;

use dropgate_core::error::ErrorKind;
use dropgate_entity::store::FileStore;
use dropgate_service::share::{AccessDecision, DenyReason};

#[tokio::test]
async fn test_active_share_admits_and_returns_payload() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;

    let file = env
        .upload_file(Some(owner.id), "report.txt", 0, 1, None, false)
        .await;

    let resolved = env.access.resolve(&file.share_token).await.unwrap();
    let decision = env
        .access
        .authorize(&resolved, None, None, None)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Admit);

    let result = env.access.download(&resolved, None).await.unwrap();
    assert_eq!(result.data, Bytes::from_static(b"test payload"));

    // The admitted download landed in the ledger, as anonymous.
    let records = env.files.downloads_for_file(file.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].downloader_id, None);
}

#[tokio::test]
async fn test_expired_share_denies_for_strangers() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "report.txt", 0, 1, None, false)
        .await;

    // Same share, two hours later: the window has closed.
    env.clock.advance(Duration::hours(2));

    let resolved = env.access.resolve(&file.share_token).await.unwrap();
    let decision = env
        .access
        .authorize(&resolved, None, None, None)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Deny(DenyReason::Expired));
}

#[tokio::test]
async fn test_pending_share_denies_until_window_opens() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "report.txt", 2, 5, None, false)
        .await;

    let decision = env
        .access
        .authorize(&file, None, None, None)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Deny(DenyReason::NotAvailableYet));

    env.clock.advance(Duration::hours(3));
    let decision = env
        .access
        .authorize(&file, None, None, None)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Admit);
}

#[tokio::test]
async fn test_owner_is_exempt_from_the_window() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "report.txt", 0, 1, None, false)
        .await;

    env.clock.advance(Duration::hours(2));

    let ctx = env.ctx(&owner);
    let decision = env
        .access
        .authorize(&file, Some(&ctx), None, None)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Admit);

    // Another authenticated user gets no such exemption.
    let (stranger, _) = env
        .register_and_login("bob", "bob@example.com", "tr4verse-moat-9")
        .await;
    let stranger_ctx = env.ctx(&stranger);
    let decision = env
        .access
        .authorize(&file, Some(&stranger_ctx), None, None)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Deny(DenyReason::Expired));
}

#[tokio::test]
async fn test_password_checks_are_independent_of_the_window() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "secret.txt", 0, 1, Some("hunter2"), false)
        .await;

    let no_password = env
        .access
        .authorize(&file, None, None, None)
        .await
        .unwrap();
    assert_eq!(
        no_password,
        AccessDecision::Deny(DenyReason::PasswordRequired)
    );

    let wrong = env
        .access
        .authorize(&file, None, Some("hunter3"), None)
        .await
        .unwrap();
    assert_eq!(wrong, AccessDecision::Deny(DenyReason::PasswordIncorrect));

    let correct = env
        .access
        .authorize(&file, None, Some("hunter2"), None)
        .await
        .unwrap();
    assert_eq!(correct, AccessDecision::Admit);
}

#[tokio::test]
async fn test_window_check_comes_before_the_password_check() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "secret.txt", 0, 1, Some("hunter2"), false)
        .await;

    env.clock.advance(Duration::hours(2));

    // Even the correct password does not reopen an expired window.
    let decision = env
        .access
        .authorize(&file, None, Some("hunter2"), None)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Deny(DenyReason::Expired));
}

#[tokio::test]
async fn test_totp_gated_file_requires_enabled_caller_with_valid_code() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "vault.bin", 0, 1, None, true)
        .await;

    // Anonymous caller: denied regardless of code.
    let decision = env
        .access
        .authorize(&file, None, None, Some("123456"))
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Deny(DenyReason::TwoFactorRequired));

    // Authenticated caller without two-factor enabled: denied.
    let (bob, _) = env
        .register_and_login("bob", "bob@example.com", "tr4verse-moat-9")
        .await;
    let bob_ctx = env.ctx(&bob);
    let decision = env
        .access
        .authorize(&file, Some(&bob_ctx), None, Some("123456"))
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Deny(DenyReason::TwoFactorRequired));

    // Enabled caller with the current code for their own secret: admitted.
    let secret = env.enable_totp(&bob).await;
    let code = env.current_code(&secret, &bob.username);
    let decision = env
        .access
        .authorize(&file, Some(&bob_ctx), None, Some(&code))
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Admit);

    // A wrong code is denied the same way as a missing one.
    let decision = env
        .access
        .authorize(&file, Some(&bob_ctx), None, Some("000000"))
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Deny(DenyReason::TwoFactorRequired));
}

#[tokio::test]
async fn test_unknown_and_deleted_tokens_read_the_same() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "report.txt", 0, 1, None, false)
        .await;

    let err = env.access.resolve("no-such-token").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let ctx = env.ctx(&owner);
    env.file_service.delete(&ctx, file.id).await.unwrap();

    let err = env.access.resolve(&file.share_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_file_info_applies_the_window_but_not_the_password() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "secret.txt", 0, 1, Some("hunter2"), false)
        .await;

    // Metadata is visible without the password while the window is open.
    let info = env.access.file_info(&file.share_token, None).await.unwrap();
    assert!(info.is_ok());

    env.clock.advance(Duration::hours(2));
    let info = env.access.file_info(&file.share_token, None).await.unwrap();
    assert_eq!(info.unwrap_err(), DenyReason::Expired);

    // The owner still sees their own expired file.
    let ctx = env.ctx(&owner);
    let info = env
        .access
        .file_info(&file.share_token, Some(&ctx))
        .await
        .unwrap();
    assert!(info.is_ok());
}

#[tokio::test]
async fn test_authenticated_download_is_recorded_with_the_caller() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let (bob, _) = env
        .register_and_login("bob", "bob@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "report.txt", 0, 1, None, false)
        .await;

    let bob_ctx = env.ctx(&bob);
    env.access.download(&file, Some(&bob_ctx)).await.unwrap();

    let records = env.files.downloads_for_file(file.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].downloader_id, Some(bob.id));
}
