//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cirrus_core::types::{FolderId, UserId};

/// A folder in the per-owner file hierarchy.
///
/// `path` is the materialized ancestor chain: the ordered list of ancestor
/// folder ids from the root down to the immediate parent. Root folders
/// carry an empty path. Storing ids rather than names means renames never
/// touch descendant paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<FolderId>,
    /// The folder owner.
    pub owner_id: UserId,
    /// Ordered ancestor ids, root first. Empty for root folders.
    pub path: Vec<FolderId>,
    /// Whether the folder is soft-deleted (in trash).
    pub is_deleted: bool,
    /// When the folder was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Create a new folder under the given parent.
    ///
    /// The child path is `parent.path ++ [parent.id]`; root folders get an
    /// empty path.
    pub fn new(name: impl Into<String>, parent: Option<&Folder>, owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::new(),
            name: name.into(),
            parent_id: parent.map(|p| p.id),
            owner_id,
            path: parent.map(Folder::child_path).unwrap_or_default(),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The path a direct child of this folder must carry.
    pub fn child_path(&self) -> Vec<FolderId> {
        let mut path = self.path.clone();
        path.push(self.id);
        path
    }

    /// Check whether `ancestor` appears anywhere in this folder's path.
    pub fn is_descendant_of(&self, ancestor: FolderId) -> bool {
        self.path.contains(&ancestor)
    }
}
