//! Listing shapes returned by the tree service.

use serde::{Deserialize, Serialize};

use cirrus_core::types::FolderId;
use cirrus_entity::file::File;
use cirrus_entity::folder::Folder;

/// A folder entry in a listing, flagged when it reaches the caller
/// through a grant rather than ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedFolder {
    /// The folder record.
    pub folder: Folder,
    /// Whether this entry is visible via a share grant.
    pub shared: bool,
}

/// A file entry in a listing, flagged like [`ListedFolder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedFile {
    /// The file record.
    pub file: File,
    /// Whether this entry is visible via a share grant.
    pub shared: bool,
}

/// Direct contents of one folder level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContents {
    /// Subfolders at this level.
    pub folders: Vec<ListedFolder>,
    /// Files at this level.
    pub files: Vec<ListedFile>,
}

/// One step of a breadcrumb trail, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder id of this step.
    pub id: FolderId,
    /// Folder name of this step.
    pub name: String,
}

/// Everything currently in one owner's trash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashContents {
    /// Trashed folders.
    pub folders: Vec<Folder>,
    /// Trashed files.
    pub files: Vec<File>,
}
