//! Folder tree operations: creation, listing, cascades, purge.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use cirrus_core::error::AppError;
use cirrus_core::result::AppResult;
use cirrus_core::traits::BlobStore;
use cirrus_core::types::{FolderId, UserId};
use cirrus_entity::folder::Folder;
use cirrus_entity::grant::ResourceType;
use cirrus_store::{FileRepository, FolderRepository, GrantRepository, QuotaLedger};

use crate::context::RequestContext;

use super::listing::{Breadcrumb, FolderContents, ListedFile, ListedFolder, TrashContents};

/// Operations on the per-owner folder hierarchy.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Grant repository, used for shared listings.
    grant_repo: Arc<GrantRepository>,
    /// Quota ledger, debited on permanent deletes.
    ledger: Arc<QuotaLedger>,
    /// Blob store holding file artifacts.
    blob: Arc<dyn BlobStore>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        grant_repo: Arc<GrantRepository>,
        ledger: Arc<QuotaLedger>,
        blob: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            grant_repo,
            ledger,
            blob,
        }
    }

    /// Create a folder under the given parent (None = root level).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }

        let parent = match parent_id {
            Some(id) => Some(self.live_owned_folder(ctx.user_id, id)?),
            None => None,
        };

        let folder = self
            .folder_repo
            .insert(Folder::new(name, parent.as_ref(), ctx.user_id));

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?parent_id,
            "Folder created"
        );
        Ok(folder)
    }

    /// List the non-deleted direct contents of a folder.
    ///
    /// `folder_id = None` is the caller's root view: their own root-level
    /// items plus everything reachable through a non-expired grant,
    /// flattened in and de-duplicated against the owned entries. A named
    /// folder belonging to someone else requires a direct grant on that
    /// exact folder.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        folder_id: Option<FolderId>,
    ) -> AppResult<FolderContents> {
        match folder_id {
            Some(id) => self.list_named(ctx, id),
            None => self.list_root(ctx),
        }
    }

    fn list_named(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<FolderContents> {
        let folder = self
            .folder_repo
            .find(folder_id)
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let shared = if folder.owner_id == ctx.user_id {
            false
        } else {
            // Grants never extend to descendants, so the grant must sit on
            // this exact folder.
            self.grant_repo
                .active_user_grant(folder_id.into_uuid(), ctx.user_id, ctx.request_time)
                .ok_or_else(|| AppError::access_denied("No access to this folder"))?;
            true
        };

        let folders = self
            .folder_repo
            .children(folder.owner_id, Some(folder_id))
            .into_iter()
            .map(|folder| ListedFolder { folder, shared })
            .collect();
        let files = self
            .file_repo
            .children(folder.owner_id, Some(folder_id))
            .into_iter()
            .map(|file| ListedFile { file, shared })
            .collect();

        Ok(FolderContents { folders, files })
    }

    fn list_root(&self, ctx: &RequestContext) -> AppResult<FolderContents> {
        let mut folders: Vec<ListedFolder> = self
            .folder_repo
            .children(ctx.user_id, None)
            .into_iter()
            .map(|folder| ListedFolder {
                folder,
                shared: false,
            })
            .collect();
        let mut files: Vec<ListedFile> = self
            .file_repo
            .children(ctx.user_id, None)
            .into_iter()
            .map(|file| ListedFile { file, shared: false })
            .collect();

        let mut seen: HashSet<Uuid> = folders
            .iter()
            .map(|f| f.folder.id.into_uuid())
            .chain(files.iter().map(|f| f.file.id.into_uuid()))
            .collect();

        for grant in self
            .grant_repo
            .active_for_user(ctx.user_id, ctx.request_time)
        {
            if !seen.insert(grant.resource_id) {
                continue;
            }
            match grant.resource_type {
                ResourceType::Folder => {
                    if let Some(folder) = self
                        .folder_repo
                        .find(grant.resource_id.into())
                        .filter(|f| !f.is_deleted)
                    {
                        folders.push(ListedFolder {
                            folder,
                            shared: true,
                        });
                    }
                }
                ResourceType::File => {
                    if let Some(file) = self
                        .file_repo
                        .find(grant.resource_id.into())
                        .filter(|f| !f.is_deleted)
                    {
                        files.push(ListedFile { file, shared: true });
                    }
                }
            }
        }

        Ok(FolderContents { folders, files })
    }

    /// Resolve the breadcrumb trail from the root down to the folder.
    pub async fn breadcrumbs(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Breadcrumb>> {
        let folder = self.live_owned_folder(ctx.user_id, folder_id)?;

        let mut trail: Vec<Breadcrumb> = self
            .folder_repo
            .find_many(&folder.path)
            .into_iter()
            .map(|ancestor| Breadcrumb {
                id: ancestor.id,
                name: ancestor.name,
            })
            .collect();
        trail.push(Breadcrumb {
            id: folder.id,
            name: folder.name,
        });
        Ok(trail)
    }

    /// Rename a folder. Paths are id-based, so descendants are untouched.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }

        let mut folder = self.live_owned_folder(ctx.user_id, folder_id)?;
        folder.name = new_name.to_string();
        folder.updated_at = Utc::now();
        self.folder_repo.update(folder.clone());

        info!(user_id = %ctx.user_id, folder_id = %folder_id, "Folder renamed");
        Ok(folder)
    }

    /// Move a folder and its whole subtree to the trash.
    ///
    /// The cascade covers every descendant folder and every file parented
    /// anywhere in the subtree, all stamped with one shared timestamp. The
    /// store-level bulk updates are idempotent, so an interrupted cascade
    /// can be re-issued.
    pub async fn soft_delete(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let folder = self.live_owned_folder(ctx.user_id, folder_id)?;

        let deleted_at = Utc::now();
        let folders_marked =
            self.folder_repo
                .mark_deleted_subtree(folder.id, ctx.user_id, deleted_at);
        let subtree = self.folder_repo.subtree_ids(folder.id, ctx.user_id);
        let files_marked = self
            .file_repo
            .mark_deleted_by_parents(&subtree, ctx.user_id, deleted_at);

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            folders_marked,
            files_marked,
            "Folder trashed"
        );
        Ok(())
    }

    /// Restore a trashed folder and its whole subtree.
    pub async fn restore(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let folder = self
            .folder_repo
            .find_owned(folder_id, ctx.user_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if !folder.is_deleted {
            return Err(AppError::validation("Folder is not in the trash"));
        }

        let subtree = self.folder_repo.subtree_ids(folder.id, ctx.user_id);
        let folders_restored = self.folder_repo.restore_subtree(folder.id, ctx.user_id);
        let files_restored = self.file_repo.restore_by_parents(&subtree, ctx.user_id);

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            folders_restored,
            files_restored,
            "Folder restored"
        );
        Ok(())
    }

    /// Permanently purge a trashed folder: every descendant file's blob
    /// artifact is deleted, its record removed and its bytes returned to
    /// the quota, then the folder records themselves are removed.
    pub async fn hard_delete(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let folder = self
            .folder_repo
            .find_owned(folder_id, ctx.user_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if !folder.is_deleted {
            return Err(AppError::validation("Folder is not in the trash"));
        }

        let subtree = self.folder_repo.subtree_ids(folder.id, ctx.user_id);
        let mut files_purged = 0u64;
        let mut bytes_reclaimed = 0u64;
        for file in self.file_repo.under_parents(&subtree, ctx.user_id) {
            self.blob.delete(&file.storage_key).await?;
            // One-shot remove guards the ledger: the debit happens at most
            // once per record.
            if let Some(removed) = self.file_repo.remove(file.id) {
                self.ledger.debit(removed.owner_id, removed.size_bytes);
                bytes_reclaimed += removed.size_bytes;
                files_purged += 1;
            }
        }
        for id in &subtree {
            self.folder_repo.remove(*id);
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            folders_purged = subtree.len(),
            files_purged,
            bytes_reclaimed,
            "Folder purged"
        );
        Ok(())
    }

    /// Everything currently in the caller's trash.
    pub async fn list_trash(&self, ctx: &RequestContext) -> AppResult<TrashContents> {
        Ok(TrashContents {
            folders: self.folder_repo.trashed(ctx.user_id),
            files: self.file_repo.trashed(ctx.user_id),
        })
    }

    /// An existing, non-deleted folder owned by the caller.
    fn live_owned_folder(&self, owner_id: UserId, folder_id: FolderId) -> AppResult<Folder> {
        self.folder_repo
            .find_owned(folder_id, owner_id)
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }
}
