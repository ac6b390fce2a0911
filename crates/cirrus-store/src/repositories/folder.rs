//! Folder repository with path-predicate cascade operations.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use cirrus_core::types::{FolderId, UserId};
use cirrus_entity::folder::Folder;

/// Repository for [`Folder`] records.
///
/// The soft-delete and restore cascades are expressed as bulk conditional
/// updates over the materialized-path predicate (`id == root` or
/// `path contains root`), so a cascade interrupted mid-way can simply be
/// re-applied.
#[derive(Debug, Default)]
pub struct FolderRepository {
    /// Folder records by id.
    folders: DashMap<FolderId, Folder>,
}

impl FolderRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new folder record.
    pub fn insert(&self, folder: Folder) -> Folder {
        self.folders.insert(folder.id, folder.clone());
        folder
    }

    /// Find a folder by id.
    pub fn find(&self, id: FolderId) -> Option<Folder> {
        self.folders.get(&id).map(|f| f.clone())
    }

    /// Find a folder by id, restricted to the given owner.
    pub fn find_owned(&self, id: FolderId, owner_id: UserId) -> Option<Folder> {
        self.find(id).filter(|f| f.owner_id == owner_id)
    }

    /// Replace an existing folder record. Returns `false` if absent.
    pub fn update(&self, folder: Folder) -> bool {
        match self.folders.get_mut(&folder.id) {
            Some(mut entry) => {
                *entry = folder;
                true
            }
            None => false,
        }
    }

    /// Remove a folder record, returning it if present.
    pub fn remove(&self, id: FolderId) -> Option<Folder> {
        self.folders.remove(&id).map(|(_, f)| f)
    }

    /// Non-deleted direct children of the given parent (None = root level)
    /// for one owner.
    pub fn children(&self, owner_id: UserId, parent_id: Option<FolderId>) -> Vec<Folder> {
        self.folders
            .iter()
            .filter(|f| f.owner_id == owner_id && f.parent_id == parent_id && !f.is_deleted)
            .map(|f| f.clone())
            .collect()
    }

    /// Resolve a batch of folder ids, skipping missing ones.
    pub fn find_many(&self, ids: &[FolderId]) -> Vec<Folder> {
        ids.iter().filter_map(|id| self.find(*id)).collect()
    }

    /// Ids of the folder itself plus every descendant folder, regardless
    /// of deletion state.
    pub fn subtree_ids(&self, root: FolderId, owner_id: UserId) -> Vec<FolderId> {
        let mut ids: Vec<FolderId> = self
            .folders
            .iter()
            .filter(|f| f.owner_id == owner_id && (f.id == root || f.is_descendant_of(root)))
            .map(|f| f.id)
            .collect();
        ids.sort();
        ids
    }

    /// Bulk conditional soft-delete: mark the folder and every folder whose
    /// path contains it as deleted with the given timestamp.
    ///
    /// Rows already marked deleted keep their original timestamp, so
    /// re-applying the cascade is a no-op for them. Returns the number of
    /// rows newly marked.
    pub fn mark_deleted_subtree(
        &self,
        root: FolderId,
        owner_id: UserId,
        deleted_at: DateTime<Utc>,
    ) -> u64 {
        let mut marked = 0;
        for mut entry in self.folders.iter_mut() {
            let folder = entry.value_mut();
            if folder.owner_id == owner_id
                && (folder.id == root || folder.is_descendant_of(root))
                && !folder.is_deleted
            {
                folder.is_deleted = true;
                folder.deleted_at = Some(deleted_at);
                folder.updated_at = deleted_at;
                marked += 1;
            }
        }
        marked
    }

    /// Inverse cascade: clear the deleted flag and timestamp on the folder
    /// and every descendant matched by the same path predicate.
    pub fn restore_subtree(&self, root: FolderId, owner_id: UserId) -> u64 {
        let now = Utc::now();
        let mut restored = 0;
        for mut entry in self.folders.iter_mut() {
            let folder = entry.value_mut();
            if folder.owner_id == owner_id
                && (folder.id == root || folder.is_descendant_of(root))
                && folder.is_deleted
            {
                folder.is_deleted = false;
                folder.deleted_at = None;
                folder.updated_at = now;
                restored += 1;
            }
        }
        restored
    }

    /// All trashed folders for one owner.
    pub fn trashed(&self, owner_id: UserId) -> Vec<Folder> {
        self.folders
            .iter()
            .filter(|f| f.owner_id == owner_id && f.is_deleted)
            .map(|f| f.clone())
            .collect()
    }

    /// Trashed folders across all owners whose deletion predates the
    /// cutoff. Used by the retention janitor.
    pub fn trashed_before(&self, cutoff: DateTime<Utc>) -> Vec<Folder> {
        self.folders
            .iter()
            .filter(|f| f.is_deleted && f.deleted_at.is_some_and(|at| at < cutoff))
            .map(|f| f.clone())
            .collect()
    }

    /// Total number of folder records.
    pub fn count(&self) -> usize {
        self.folders.len()
    }
}
