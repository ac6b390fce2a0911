//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cirrus_core::types::{FileId, FolderId, UserId};

/// A file stored in Cirrus.
///
/// File records are created only by a completed chunked upload; there is
/// no other creation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// The folder containing this file (None for root-level files).
    pub parent_id: Option<FolderId>,
    /// The file owner.
    pub owner_id: UserId,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Key of the final artifact in the blob store.
    pub storage_key: String,
    /// Whether the file is soft-deleted (in trash).
    pub is_deleted: bool,
    /// When the file was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}
