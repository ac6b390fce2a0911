//! Retention sweep tests.

use bytes::Bytes;
use chrono::{Duration, Utc};

use cirrus_entity::upload::UploadSession;

use crate::helpers::{TestApp, upload_file};

#[tokio::test]
async fn test_expired_sessions_are_reclaimed() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let live = app
        .upload
        .init_session(&ctx, "live.bin", 10, None)
        .await
        .unwrap();
    app.upload
        .upload_chunk(&ctx, live.session_id, 0, Bytes::from("staged"))
        .await
        .unwrap();

    // A zero-TTL session is expired the moment it exists.
    let stale = app
        .session_repo
        .insert(UploadSession::new(ctx.user_id, "stale.bin", 10, None, 1, 0));
    app.staging
        .write_chunk(stale.id, 0, Bytes::from("abandoned"))
        .await
        .unwrap();

    let reclaimed = app.sweep.sweep_expired_sessions(Utc::now()).await;
    assert_eq!(reclaimed, 1);

    assert!(app.session_repo.find(stale.id).is_none());
    assert!(!app.staging.chunk_exists(stale.id, 0).await.unwrap());

    // The live session and its staged bytes are untouched.
    assert!(app.session_repo.find(live.session_id).is_some());
    assert!(app.staging.chunk_exists(live.session_id, 0).await.unwrap());
}

#[tokio::test]
async fn test_session_removal_is_conditional_on_expiry() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let init = app
        .upload
        .init_session(&ctx, "racing.bin", 10, None)
        .await
        .unwrap();

    // A sweep evaluated at a time when the session is still live must
    // leave it alone even if asked to remove it directly.
    assert!(!app.session_repo.remove_if_expired(init.session_id, Utc::now()));
    assert!(app.session_repo.find(init.session_id).is_some());
}

#[tokio::test]
async fn test_trash_is_purged_after_the_retention_window() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let old_file = upload_file(&app, &ctx, "old.bin", &[1u8; 100], None).await;
    let fresh_file = upload_file(&app, &ctx, "fresh.bin", &[2u8; 50], None).await;
    app.files.soft_delete(&ctx, old_file.id).await.unwrap();
    app.files.soft_delete(&ctx, fresh_file.id).await.unwrap();

    // Backdate one deletion past the 30-day window.
    let mut backdated = app.file_repo.find(old_file.id).unwrap();
    backdated.deleted_at = Some(Utc::now() - Duration::days(31));
    app.file_repo.update(backdated);

    let folder = app.tree.create_folder(&ctx, "old-folder", None).await.unwrap();
    app.folder_repo
        .mark_deleted_subtree(folder.id, ctx.user_id, Utc::now() - Duration::days(31));

    assert_eq!(app.ledger.used(ctx.user_id), 150);

    let report = app.sweep.sweep_trash(Utc::now()).await;
    assert_eq!(report.files_purged, 1);
    assert_eq!(report.folders_purged, 1);
    assert_eq!(report.bytes_reclaimed, 100);

    // Only the aged-out nodes are gone; each node ages independently.
    assert!(app.file_repo.find(old_file.id).is_none());
    assert!(!app.blob.exists(&old_file.storage_key).await.unwrap());
    assert!(app.folder_repo.find(folder.id).is_none());
    assert!(app.file_repo.find(fresh_file.id).is_some());
    assert!(app.blob.exists(&fresh_file.storage_key).await.unwrap());
    assert_eq!(app.ledger.used(ctx.user_id), 50);

    // Re-running the sweep is a no-op.
    let report = app.sweep.sweep_trash(Utc::now()).await;
    assert_eq!(report.files_purged, 0);
    assert_eq!(report.bytes_reclaimed, 0);
}

#[tokio::test]
async fn test_full_sweep_reports_combined_counters() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let stale = app
        .session_repo
        .insert(UploadSession::new(ctx.user_id, "stale.bin", 10, None, 1, 0));
    app.staging
        .write_chunk(stale.id, 0, Bytes::from("x"))
        .await
        .unwrap();

    let file = upload_file(&app, &ctx, "gone.bin", &[3u8; 64], None).await;
    app.files.soft_delete(&ctx, file.id).await.unwrap();
    let mut backdated = app.file_repo.find(file.id).unwrap();
    backdated.deleted_at = Some(Utc::now() - Duration::days(31));
    app.file_repo.update(backdated);

    let report = app.sweep.run_once(Utc::now()).await;
    assert_eq!(report.sessions_reclaimed, 1);
    assert_eq!(report.files_purged, 1);
    assert_eq!(report.bytes_reclaimed, 64);
}
