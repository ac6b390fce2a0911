//! Upload session entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use cirrus_core::types::{FolderId, UploadSessionId, UserId};

/// A chunked upload session tracking progress of a multi-part upload.
///
/// Sessions are ephemeral: a successful completion replaces the session
/// with a [`crate::file::File`] record; abandoned sessions age out and are
/// reclaimed by the retention janitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSession {
    /// Opaque session identifier, also the staging namespace key.
    pub id: UploadSessionId,
    /// The user performing the upload.
    pub owner_id: UserId,
    /// The intended file name.
    pub file_name: String,
    /// Declared total size in bytes.
    pub declared_size: u64,
    /// Target folder for the completed file (None for root).
    pub parent_id: Option<FolderId>,
    /// Indices of chunks successfully received, always within
    /// `0..total_chunks`.
    pub received_chunks: BTreeSet<u32>,
    /// Total number of chunks expected.
    pub total_chunks: u32,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires and becomes reclaimable.
    pub expires_at: DateTime<Utc>,
}

impl UploadSession {
    /// Create a new session expiring `ttl_hours` from now.
    pub fn new(
        owner_id: UserId,
        file_name: impl Into<String>,
        declared_size: u64,
        parent_id: Option<FolderId>,
        total_chunks: u32,
        ttl_hours: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UploadSessionId::new(),
            owner_id,
            file_name: file_name.into(),
            declared_size,
            parent_id,
            received_chunks: BTreeSet::new(),
            total_chunks,
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
        }
    }

    /// Number of distinct chunks received so far.
    pub fn received_count(&self) -> u32 {
        self.received_chunks.len() as u32
    }

    /// Check if every expected chunk has been received.
    ///
    /// Count equality suffices because chunk indices are bounded to
    /// `0..total_chunks` at upload time.
    pub fn is_complete(&self) -> bool {
        self.received_count() == self.total_chunks
    }

    /// Check if the session has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
