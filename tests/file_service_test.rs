//! Integration tests for owner file listing, summary, deletion, history,
//! and upload policy.

mod common;

use bytes::Bytes;
use chrono::Duration;

use dropgate_core::error::ErrorKind;
use dropgate_core::traits::clock::Clock;
use dropgate_core::types::pagination::PageRequest;
use dropgate_core::types::sorting::{FileSortField, SortDirection};
use dropgate_entity::file::{FileListQuery, StatusFilter};
use dropgate_service::file::UploadRequest;

#[tokio::test]
async fn test_list_filters_by_availability_state() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let ctx = env.ctx(&owner);

    // One file per state: open now, opening later, already closed.
    env.upload_file(Some(owner.id), "active.txt", 0, 2, None, false)
        .await;
    env.upload_file(Some(owner.id), "pending.txt", 5, 8, None, false)
        .await;
    env.upload_file(Some(owner.id), "expired.txt", 0, 1, None, false)
        .await;
    env.clock.advance(Duration::minutes(90));

    for (filter, expected) in [
        (StatusFilter::Active, vec!["active.txt"]),
        (StatusFilter::Pending, vec!["pending.txt"]),
        (StatusFilter::Expired, vec!["expired.txt"]),
        (StatusFilter::All, vec!["active.txt", "expired.txt", "pending.txt"]),
    ] {
        let query = FileListQuery {
            status: filter,
            sort_by: FileSortField::FileName,
            order: SortDirection::Asc,
            page: PageRequest::default(),
        };
        let page = env.file_service.list_owned(&ctx, &query).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, expected, "filter {filter:?}");
    }
}

#[tokio::test]
async fn test_unknown_status_parses_as_unfiltered() {
    // The documented fallback: bogus filter values list everything.
    assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
    assert_eq!(StatusFilter::parse("ACTIVE"), StatusFilter::Active);
}

#[tokio::test]
async fn test_summary_counts_match_the_partition() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let ctx = env.ctx(&owner);

    env.upload_file(Some(owner.id), "a.txt", 0, 2, None, false).await;
    env.upload_file(Some(owner.id), "b.txt", 0, 2, None, false).await;
    env.upload_file(Some(owner.id), "c.txt", 5, 8, None, false).await;
    env.upload_file(Some(owner.id), "d.txt", 0, 1, None, false).await;
    env.clock.advance(Duration::minutes(90));

    let summary = env.file_service.summary(&ctx).await.unwrap();
    assert_eq!(summary.active, 2);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.expired, 1);
}

#[tokio::test]
async fn test_listing_sorts_and_paginates() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let ctx = env.ctx(&owner);

    for name in ["cherry.txt", "apple.txt", "banana.txt"] {
        env.upload_file(Some(owner.id), name, 0, 2, None, false).await;
    }

    let query = FileListQuery {
        status: StatusFilter::All,
        sort_by: FileSortField::FileName,
        order: SortDirection::Asc,
        page: PageRequest::new(1, 2),
    };
    let page = env.file_service.list_owned(&ctx, &query).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["apple.txt", "banana.txt"]);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);

    let query = FileListQuery {
        page: PageRequest::new(2, 2),
        ..query
    };
    let page = env.file_service.list_owned(&ctx, &query).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["cherry.txt"]);
}

#[tokio::test]
async fn test_delete_is_owner_scoped_and_soft() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let (other, _) = env
        .register_and_login("bob", "bob@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "report.txt", 0, 2, None, false)
        .await;

    // Someone else's file reads as absent.
    let err = env
        .file_service
        .delete(&env.ctx(&other), file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    env.file_service.delete(&env.ctx(&owner), file.id).await.unwrap();

    // Deleted files disappear from listing and share resolution alike.
    let page = env
        .file_service
        .list_owned(&env.ctx(&owner), &FileListQuery::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());

    let err = env.access.resolve(&file.share_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Deleting twice reads as absent too.
    let err = env
        .file_service
        .delete(&env.ctx(&owner), file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_download_history_is_owner_only_and_ordered() {
    let env = common::test_env();
    let (owner, _) = env
        .register_and_login("alice", "alice@example.com", "tr4verse-moat-9")
        .await;
    let (bob, _) = env
        .register_and_login("bob", "bob@example.com", "tr4verse-moat-9")
        .await;
    let file = env
        .upload_file(Some(owner.id), "report.txt", 0, 5, None, false)
        .await;

    let bob_ctx = env.ctx(&bob);
    env.access.download(&file, Some(&bob_ctx)).await.unwrap();
    env.clock.advance(Duration::minutes(10));
    env.access.download(&file, None).await.unwrap();

    let err = env
        .file_service
        .download_history(&bob_ctx, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let history = env
        .file_service
        .download_history(&env.ctx(&owner), file.id)
        .await
        .unwrap();
    assert_eq!(history.file_name, "report.txt");
    assert_eq!(history.downloads.len(), 2);
    assert_eq!(history.downloads[0].downloader_id, Some(bob.id));
    assert_eq!(history.downloads[1].downloader_id, None);
    assert!(history.downloads[0].downloaded_at <= history.downloads[1].downloaded_at);
}

#[tokio::test]
async fn test_anonymous_upload_has_no_owner() {
    let env = common::test_env();
    let file = env
        .upload_file(None, "drop.txt", 0, 2, None, false)
        .await;
    assert_eq!(file.owner_id, None);

    // Still downloadable through its share link.
    let resolved = env.access.resolve(&file.share_token).await.unwrap();
    let result = env.access.download(&resolved, None).await.unwrap();
    assert_eq!(result.data, Bytes::from_static(b"test payload"));
}

#[tokio::test]
async fn test_upload_policy_bounds_the_window() {
    let env = common::test_env();
    let now = env.clock.now();

    // Too short: under the one-hour minimum.
    let err = env
        .upload_service
        .upload(
            &UploadRequest {
                name: "short.txt".to_string(),
                content_type: "text/plain".to_string(),
                password: None,
                available_from: Some(now),
                available_to: Some(now + Duration::minutes(10)),
                require_totp: false,
                is_public: false,
            },
            Bytes::from_static(b"x"),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Too long: past the thirty-day maximum.
    let err = env
        .upload_service
        .upload(
            &UploadRequest {
                name: "long.txt".to_string(),
                content_type: "text/plain".to_string(),
                password: None,
                available_from: Some(now),
                available_to: Some(now + Duration::days(60)),
                require_totp: false,
                is_public: false,
            },
            Bytes::from_static(b"x"),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Inverted window.
    let err = env
        .upload_service
        .upload(
            &UploadRequest {
                name: "inverted.txt".to_string(),
                content_type: "text/plain".to_string(),
                password: None,
                available_from: Some(now + Duration::hours(2)),
                available_to: Some(now),
                require_totp: false,
                is_public: false,
            },
            Bytes::from_static(b"x"),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Defaults: no window supplied yields the seven-day policy window.
    let file = env
        .upload_service
        .upload(
            &UploadRequest {
                name: "defaults.txt".to_string(),
                content_type: "text/plain".to_string(),
                password: None,
                available_from: None,
                available_to: None,
                require_totp: false,
                is_public: false,
            },
            Bytes::from_static(b"x"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(file.available_from, now);
    assert_eq!(file.available_to, now + Duration::days(7));
}

#[tokio::test]
async fn test_upload_rejects_short_file_passwords_and_oversize_payloads() {
    let env = common::test_env();

    let err = env
        .upload_service
        .upload(
            &UploadRequest {
                name: "p.txt".to_string(),
                content_type: "text/plain".to_string(),
                password: Some("abc".to_string()),
                available_from: None,
                available_to: None,
                require_totp: false,
                is_public: false,
            },
            Bytes::from_static(b"x"),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let oversize = Bytes::from(vec![0u8; (common::TEST_MAX_UPLOAD + 1) as usize]);
    let err = env
        .upload_service
        .upload(
            &UploadRequest {
                name: "big.bin".to_string(),
                content_type: "application/octet-stream".to_string(),
                password: None,
                available_from: None,
                available_to: None,
                require_totp: false,
                is_public: false,
            },
            oversize,
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
