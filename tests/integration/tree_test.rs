//! Folder hierarchy, cascade, and trash tests.

use cirrus_core::error::ErrorKind;
use cirrus_entity::grant::{GrantRole, ResourceType};
use cirrus_service::share::CreateGrantRequest;

use crate::helpers::{TestApp, upload_file};

#[tokio::test]
async fn test_breadcrumbs_follow_the_materialized_path() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let docs = app.tree.create_folder(&ctx, "docs", None).await.unwrap();
    let reports = app
        .tree
        .create_folder(&ctx, "reports", Some(docs.id))
        .await
        .unwrap();
    let q3 = app
        .tree
        .create_folder(&ctx, "q3", Some(reports.id))
        .await
        .unwrap();

    assert_eq!(q3.path, vec![docs.id, reports.id]);

    let trail = app.tree.breadcrumbs(&ctx, q3.id).await.unwrap();
    let names: Vec<&str> = trail.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "reports", "q3"]);

    // Renaming an ancestor shows up in the trail without touching paths.
    app.tree.rename(&ctx, docs.id, "documents").await.unwrap();
    let trail = app.tree.breadcrumbs(&ctx, q3.id).await.unwrap();
    assert_eq!(trail[0].name, "documents");
    assert_eq!(app.folder_repo.find(q3.id).unwrap().path, vec![docs.id, reports.id]);
}

#[tokio::test]
async fn test_cascade_soft_delete_and_restore_roundtrip() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let root = app.tree.create_folder(&ctx, "project", None).await.unwrap();
    let sub = app
        .tree
        .create_folder(&ctx, "assets", Some(root.id))
        .await
        .unwrap();
    let in_root = upload_file(&app, &ctx, "readme.md", b"hello", Some(root.id)).await;
    let in_sub = upload_file(&app, &ctx, "logo.png", b"png", Some(sub.id)).await;
    let outside = upload_file(&app, &ctx, "notes.txt", b"keep", None).await;

    app.tree.soft_delete(&ctx, root.id).await.unwrap();

    // The whole subtree carries one shared timestamp.
    let root_after = app.folder_repo.find(root.id).unwrap();
    let sub_after = app.folder_repo.find(sub.id).unwrap();
    assert!(root_after.is_deleted && sub_after.is_deleted);
    assert_eq!(root_after.deleted_at, sub_after.deleted_at);
    assert!(app.file_repo.find(in_root.id).unwrap().is_deleted);
    assert!(app.file_repo.find(in_sub.id).unwrap().is_deleted);
    assert!(!app.file_repo.find(outside.id).unwrap().is_deleted);

    // Trashed bytes still count against the quota.
    assert_eq!(app.ledger.used(ctx.user_id), 5 + 3 + 4);

    let trash = app.tree.list_trash(&ctx).await.unwrap();
    assert_eq!(trash.folders.len(), 2);
    assert_eq!(trash.files.len(), 2);

    app.tree.restore(&ctx, root.id).await.unwrap();
    assert!(!app.folder_repo.find(root.id).unwrap().is_deleted);
    assert!(!app.folder_repo.find(sub.id).unwrap().is_deleted);
    assert!(!app.file_repo.find(in_sub.id).unwrap().is_deleted);
    assert!(app.tree.list_trash(&ctx).await.unwrap().folders.is_empty());
}

#[tokio::test]
async fn test_hard_delete_reclaims_quota_and_blobs() {
    let app = TestApp::new().await;
    let ctx = app.ctx();

    let root = app.tree.create_folder(&ctx, "scratch", None).await.unwrap();
    let sub = app
        .tree
        .create_folder(&ctx, "deep", Some(root.id))
        .await
        .unwrap();
    let file = upload_file(&app, &ctx, "junk.bin", &[9u8; 128], Some(sub.id)).await;
    let kept = upload_file(&app, &ctx, "kept.bin", &[1u8; 16], None).await;
    assert_eq!(app.ledger.used(ctx.user_id), 144);

    // Purge is only allowed from the trash.
    let err = app.tree.hard_delete(&ctx, root.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    app.tree.soft_delete(&ctx, root.id).await.unwrap();
    app.tree.hard_delete(&ctx, root.id).await.unwrap();

    assert!(app.folder_repo.find(root.id).is_none());
    assert!(app.folder_repo.find(sub.id).is_none());
    assert!(app.file_repo.find(file.id).is_none());
    assert!(!app.blob.exists(&file.storage_key).await.unwrap());
    assert_eq!(app.ledger.used(ctx.user_id), 16);
    assert!(app.file_repo.find(kept.id).is_some());
}

#[tokio::test]
async fn test_root_listing_flattens_shared_resources() {
    let app = TestApp::new().await;
    let owner = app.ctx();
    let friend = app.ctx();

    let shared_folder = app.tree.create_folder(&owner, "shared", None).await.unwrap();
    let inner = upload_file(&app, &owner, "inner.txt", b"inside", Some(shared_folder.id)).await;
    let shared_file = upload_file(&app, &owner, "direct.txt", b"direct", None).await;
    let own_folder = app.tree.create_folder(&friend, "mine", None).await.unwrap();

    for (resource_type, resource_id) in [
        (ResourceType::Folder, shared_folder.id.into_uuid()),
        (ResourceType::File, shared_file.id.into_uuid()),
    ] {
        app.share
            .create_grant(
                &owner,
                CreateGrantRequest {
                    resource_type,
                    resource_id,
                    role: GrantRole::Viewer,
                    grantee: Some(friend.user_id),
                    public: false,
                    expires_at: None,
                },
            )
            .await
            .unwrap();
    }

    let root = app.tree.list_children(&friend, None).await.unwrap();
    assert_eq!(root.folders.len(), 2);
    assert_eq!(root.files.len(), 1);
    let own = root.folders.iter().find(|f| f.folder.id == own_folder.id).unwrap();
    assert!(!own.shared);
    let shared = root
        .folders
        .iter()
        .find(|f| f.folder.id == shared_folder.id)
        .unwrap();
    assert!(shared.shared);
    assert!(root.files[0].shared);

    // The grant on the folder opens that exact folder for listing.
    let contents = app
        .tree
        .list_children(&friend, Some(shared_folder.id))
        .await
        .unwrap();
    assert_eq!(contents.files.len(), 1);
    assert_eq!(contents.files[0].file.id, inner.id);
    assert!(contents.files[0].shared);

    // But it does not extend to any other folder of the owner.
    let private = app.tree.create_folder(&owner, "private", None).await.unwrap();
    let err = app
        .tree
        .list_children(&friend, Some(private.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);
}

#[tokio::test]
async fn test_owner_scoping() {
    let app = TestApp::new().await;
    let owner = app.ctx();
    let other = app.ctx();

    let folder = app.tree.create_folder(&owner, "secret", None).await.unwrap();

    // Another caller cannot create under, rename, or delete it.
    let err = app
        .tree
        .create_folder(&other, "sub", Some(folder.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = app.tree.rename(&other, folder.id, "stolen").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = app.tree.soft_delete(&other, folder.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
