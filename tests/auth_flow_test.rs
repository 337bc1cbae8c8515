//! Integration tests for the authentication and session lifecycle.

mod common;

use chrono::Duration;
use uuid::Uuid;

use dropgate_auth::account::LoginOutcome;
use dropgate_core::error::ErrorKind;

#[tokio::test]
async fn test_register_then_login_issues_working_token() {
    let env = common::test_env();
    let (user, token) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;

    let authenticated = env.manager.authenticate(&token).await.unwrap();
    assert_eq!(authenticated.user_id, user.id);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let env = common::test_env();
    env.register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;

    let err = env
        .manager
        .register("alice2", "tr4verse-moat-9", "alice@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let env = common::test_env();
    env.register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;

    let wrong_password = env
        .manager
        .login("alice@example.com", "not-the-password")
        .await
        .unwrap_err();
    let unknown_account = env
        .manager
        .login("nobody@example.com", "tr4verse-moat-9")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.kind, ErrorKind::Unauthorized);
    assert_eq!(unknown_account.kind, ErrorKind::Unauthorized);
    // Identical messages, so the endpoint cannot enumerate accounts.
    assert_eq!(wrong_password.message, unknown_account.message);
}

#[tokio::test]
async fn test_email_lookup_is_case_insensitive() {
    let env = common::test_env();
    env.register("alice", "Alice@Example.com", "tr4verse-moat-9")
        .await;

    let outcome = env
        .manager
        .login("ALICE@example.COM", "tr4verse-moat-9")
        .await
        .unwrap();
    assert!(matches!(outcome, LoginOutcome::Authenticated(_)));
}

#[tokio::test]
async fn test_logout_revokes_token_for_all_subsequent_checks() {
    let env = common::test_env();
    let (_, token) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;

    assert!(env.manager.authenticate(&token).await.is_ok());

    env.manager.logout(&token).await.unwrap();

    // Signature and expiry are still structurally valid, but the token
    // must never authorize again.
    let err = env.manager.authenticate(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    // Revocation is idempotent.
    env.manager.logout(&token).await.unwrap();
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let env = common::test_env();
    let err = env.manager.authenticate("not-a-jwt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let err = env.manager.logout("not-a-jwt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_totp_setup_and_verify_round_trip() {
    let env = common::test_env();
    let user = env
        .register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;

    let setup = env.manager.setup_totp(user.id).await.unwrap();
    assert!(setup.otpauth_url.starts_with("otpauth://totp/"));
    assert!(setup.qr_code.starts_with("data:image/png;base64,"));

    // Setup alone must not enable two-factor.
    let stored = env.manager.get_user(user.id).await.unwrap();
    assert!(!stored.totp_enabled);
    assert!(stored.totp_secret.is_some());

    let code = env.current_code(&setup.secret, &user.username);
    assert!(env.manager.verify_totp_setup(user.id, &code).await.unwrap());

    let stored = env.manager.get_user(user.id).await.unwrap();
    assert!(stored.totp_enabled);
}

#[tokio::test]
async fn test_totp_verify_with_foreign_code_leaves_totp_disabled() {
    let env = common::test_env();
    let user = env
        .register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;

    env.manager.setup_totp(user.id).await.unwrap();

    let other_secret = env.totp.generate_secret();
    let wrong_code = env.current_code(&other_secret, &user.username);

    assert!(!env
        .manager
        .verify_totp_setup(user.id, &wrong_code)
        .await
        .unwrap());

    let stored = env.manager.get_user(user.id).await.unwrap();
    assert!(!stored.totp_enabled);
    // The secret stays stored so the user can retry.
    assert!(stored.totp_secret.is_some());
}

#[tokio::test]
async fn test_login_with_totp_returns_challenge_then_token() {
    let env = common::test_env();
    let user = env
        .register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let secret = env.enable_totp(&user).await;

    let outcome = env
        .manager
        .login("alice@example.com", "tr4verse-moat-9")
        .await
        .unwrap();
    let correlation_id = match outcome {
        LoginOutcome::ChallengeIssued { correlation_id } => correlation_id,
        LoginOutcome::Authenticated(_) => panic!("expected a two-factor challenge, got a token"),
    };

    let code = env.current_code(&secret, &user.username);
    let issued = env.manager.confirm_totp(correlation_id, &code).await.unwrap();

    let authenticated = env.manager.authenticate(&issued.token).await.unwrap();
    assert_eq!(authenticated.user_id, user.id);
}

#[tokio::test]
async fn test_wrong_code_fails_and_burns_the_challenge() {
    let env = common::test_env();
    let user = env
        .register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let secret = env.enable_totp(&user).await;

    let LoginOutcome::ChallengeIssued { correlation_id } = env
        .manager
        .login("alice@example.com", "tr4verse-moat-9")
        .await
        .unwrap()
    else {
        panic!("expected challenge");
    };

    let err = env
        .manager
        .confirm_totp(correlation_id, "000000")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    // The failed attempt consumed the challenge: even the right code is
    // now refused.
    let code = env.current_code(&secret, &user.username);
    let err = env
        .manager
        .confirm_totp(correlation_id, &code)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_challenge_cannot_be_confirmed_twice() {
    let env = common::test_env();
    let user = env
        .register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let secret = env.enable_totp(&user).await;

    let LoginOutcome::ChallengeIssued { correlation_id } = env
        .manager
        .login("alice@example.com", "tr4verse-moat-9")
        .await
        .unwrap()
    else {
        panic!("expected challenge");
    };

    let code = env.current_code(&secret, &user.username);
    env.manager.confirm_totp(correlation_id, &code).await.unwrap();

    let err = env
        .manager
        .confirm_totp(correlation_id, &code)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_stale_challenge_fails_even_with_valid_code() {
    let env = common::test_env();
    let user = env
        .register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let secret = env.enable_totp(&user).await;

    let LoginOutcome::ChallengeIssued { correlation_id } = env
        .manager
        .login("alice@example.com", "tr4verse-moat-9")
        .await
        .unwrap()
    else {
        panic!("expected challenge");
    };

    // Past the five-minute window. The code below is generated for the
    // advanced clock, so it is cryptographically valid at confirmation
    // time; staleness must still win.
    env.clock.advance(Duration::minutes(6));
    let code = env.current_code(&secret, &user.username);

    let err = env
        .manager
        .confirm_totp(correlation_id, &code)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert!(err.message.contains("expired"));
}

#[tokio::test]
async fn test_second_login_replaces_pending_challenge() {
    let env = common::test_env();
    let user = env
        .register("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let secret = env.enable_totp(&user).await;

    let LoginOutcome::ChallengeIssued {
        correlation_id: first,
    } = env
        .manager
        .login("alice@example.com", "tr4verse-moat-9")
        .await
        .unwrap()
    else {
        panic!("expected challenge");
    };

    let LoginOutcome::ChallengeIssued {
        correlation_id: second,
    } = env
        .manager
        .login("alice@example.com", "tr4verse-moat-9")
        .await
        .unwrap()
    else {
        panic!("expected challenge");
    };

    assert_ne!(first, second);

    // The replaced challenge no longer confirms; the fresh one does.
    let code = env.current_code(&secret, &user.username);
    assert!(env.manager.confirm_totp(first, &code).await.is_err());
    assert!(env.manager.confirm_totp(second, &code).await.is_ok());
}

#[tokio::test]
async fn test_unknown_correlation_id_is_rejected() {
    let env = common::test_env();
    let err = env
        .manager
        .confirm_totp(Uuid::new_v4(), "123456")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}
