//! Per-file lifecycle tests.

use cirrus_core::error::ErrorKind;

use crate::helpers::{TestApp, read_stream, upload_file};

#[tokio::test]
async fn test_trashed_files_cannot_be_downloaded() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let file = upload_file(&app, &ctx, "draft.txt", b"draft", None).await;
    app.files.soft_delete(&ctx, file.id).await.unwrap();

    // Trashed looks the same as missing to a reader, even the owner.
    let err = app.files.download(&ctx, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    // Bytes remain charged while the file sits in the trash.
    assert_eq!(app.ledger.used(ctx.user_id), 5);

    app.files.restore(&ctx, file.id).await.unwrap();
    let download = app.files.download(&ctx, file.id).await.unwrap();
    assert_eq!(read_stream(download.stream).await, b"draft");
}

#[tokio::test]
async fn test_restore_requires_a_trashed_file() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let file = upload_file(&app, &ctx, "live.txt", b"live", None).await;
    let err = app.files.restore(&ctx, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_hard_delete_debits_exactly_once() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let file = upload_file(&app, &ctx, "big.bin", &[7u8; 200], None).await;
    assert_eq!(app.ledger.used(ctx.user_id), 200);

    app.files.soft_delete(&ctx, file.id).await.unwrap();
    app.files.hard_delete(&ctx, file.id).await.unwrap();
    assert_eq!(app.ledger.used(ctx.user_id), 0);
    assert!(!app.blob.exists(&file.storage_key).await.unwrap());

    // A second permanent delete of the now-absent id fails before the
    // ledger is touched.
    let err = app.files.hard_delete(&ctx, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.ledger.used(ctx.user_id), 0);
}

#[tokio::test]
async fn test_rename_is_owner_only() {
    let app = TestApp::new().await;
    let owner = app.ctx();
    let other = app.ctx();

    let file = upload_file(&app, &owner, "old-name.txt", b"x", None).await;

    let err = app
        .files
        .rename(&other, file.id, "stolen.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let renamed = app.files.rename(&owner, file.id, "new-name.txt").await.unwrap();
    assert_eq!(renamed.name, "new-name.txt");
    assert_eq!(app.file_repo.find(file.id).unwrap().name, "new-name.txt");
}
