//! File repository with parent-set cascade operations.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use cirrus_core::types::{FileId, FolderId, UserId};
use cirrus_entity::file::File;

/// Repository for [`File`] records.
///
/// File-side cascades are keyed on the set of parent folder ids computed
/// from the folder subtree, mirroring the folder repository's
/// path-predicate updates.
#[derive(Debug, Default)]
pub struct FileRepository {
    /// File records by id.
    files: DashMap<FileId, File>,
}

impl FileRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new file record.
    pub fn insert(&self, file: File) -> File {
        self.files.insert(file.id, file.clone());
        file
    }

    /// Find a file by id.
    pub fn find(&self, id: FileId) -> Option<File> {
        self.files.get(&id).map(|f| f.clone())
    }

    /// Find a file by id, restricted to the given owner.
    pub fn find_owned(&self, id: FileId, owner_id: UserId) -> Option<File> {
        self.find(id).filter(|f| f.owner_id == owner_id)
    }

    /// Replace an existing file record. Returns `false` if absent.
    pub fn update(&self, file: File) -> bool {
        match self.files.get_mut(&file.id) {
            Some(mut entry) => {
                *entry = file;
                true
            }
            None => false,
        }
    }

    /// Remove a file record, returning it if present.
    ///
    /// The caller debits the quota ledger from the returned record, so a
    /// repeated remove of the same id yields `None` and touches nothing.
    pub fn remove(&self, id: FileId) -> Option<File> {
        self.files.remove(&id).map(|(_, f)| f)
    }

    /// Non-deleted files directly under the given parent (None = root
    /// level) for one owner.
    pub fn children(&self, owner_id: UserId, parent_id: Option<FolderId>) -> Vec<File> {
        self.files
            .iter()
            .filter(|f| f.owner_id == owner_id && f.parent_id == parent_id && !f.is_deleted)
            .map(|f| f.clone())
            .collect()
    }

    /// All files (regardless of deletion state) parented by any of the
    /// given folders. Used by the hard-delete purge.
    pub fn under_parents(&self, parents: &[FolderId], owner_id: UserId) -> Vec<File> {
        self.files
            .iter()
            .filter(|f| {
                f.owner_id == owner_id
                    && f.parent_id.is_some_and(|p| parents.contains(&p))
            })
            .map(|f| f.clone())
            .collect()
    }

    /// Bulk conditional soft-delete of every file parented by one of the
    /// given folders. Already-deleted rows keep their timestamp.
    pub fn mark_deleted_by_parents(
        &self,
        parents: &[FolderId],
        owner_id: UserId,
        deleted_at: DateTime<Utc>,
    ) -> u64 {
        let mut marked = 0;
        for mut entry in self.files.iter_mut() {
            let file = entry.value_mut();
            if file.owner_id == owner_id
                && !file.is_deleted
                && file.parent_id.is_some_and(|p| parents.contains(&p))
            {
                file.is_deleted = true;
                file.deleted_at = Some(deleted_at);
                file.updated_at = deleted_at;
                marked += 1;
            }
        }
        marked
    }

    /// Inverse cascade over the same parent set.
    pub fn restore_by_parents(&self, parents: &[FolderId], owner_id: UserId) -> u64 {
        let now = Utc::now();
        let mut restored = 0;
        for mut entry in self.files.iter_mut() {
            let file = entry.value_mut();
            if file.owner_id == owner_id
                && file.is_deleted
                && file.parent_id.is_some_and(|p| parents.contains(&p))
            {
                file.is_deleted = false;
                file.deleted_at = None;
                file.updated_at = now;
                restored += 1;
            }
        }
        restored
    }

    /// All trashed files for one owner.
    pub fn trashed(&self, owner_id: UserId) -> Vec<File> {
        self.files
            .iter()
            .filter(|f| f.owner_id == owner_id && f.is_deleted)
            .map(|f| f.clone())
            .collect()
    }

    /// Trashed files across all owners whose deletion predates the cutoff.
    pub fn trashed_before(&self, cutoff: DateTime<Utc>) -> Vec<File> {
        self.files
            .iter()
            .filter(|f| f.is_deleted && f.deleted_at.is_some_and(|at| at < cutoff))
            .map(|f| f.clone())
            .collect()
    }

    /// Total number of file records.
    pub fn count(&self) -> usize {
        self.files.len()
    }
}
