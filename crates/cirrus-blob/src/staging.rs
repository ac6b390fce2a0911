//! Staging area for chunked uploads.

use std::sync::Arc;

use bytes::Bytes;

use cirrus_core::result::AppResult;
use cirrus_core::traits::BlobStore;
use cirrus_core::types::UploadSessionId;

/// Writes and reads individual chunks in the staging namespace.
///
/// Each session stages under its own key prefix, so discarding a session
/// is a single prefix delete. Chunk writes are last-writer-wins: a
/// re-uploaded index simply replaces the staged bytes.
#[derive(Debug, Clone)]
pub struct ChunkStaging {
    /// Blob store holding the staging area.
    store: Arc<dyn BlobStore>,
}

impl ChunkStaging {
    /// Create a new staging handler over the given blob store.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Write a single chunk, replacing any previously staged bytes for
    /// the same index.
    pub async fn write_chunk(
        &self,
        session_id: UploadSessionId,
        index: u32,
        data: Bytes,
    ) -> AppResult<u64> {
        let key = Self::chunk_key(session_id, index);
        let size = data.len() as u64;
        self.store.write(&key, data).await?;
        Ok(size)
    }

    /// Read a staged chunk back.
    pub async fn read_chunk(&self, session_id: UploadSessionId, index: u32) -> AppResult<Bytes> {
        let key = Self::chunk_key(session_id, index);
        self.store.read_bytes(&key).await
    }

    /// Check whether a chunk has been staged.
    pub async fn chunk_exists(&self, session_id: UploadSessionId, index: u32) -> AppResult<bool> {
        let key = Self::chunk_key(session_id, index);
        self.store.exists(&key).await
    }

    /// Drop the whole staging area for a session.
    pub async fn discard_session(&self, session_id: UploadSessionId) -> AppResult<()> {
        self.store.delete_prefix(&Self::session_prefix(session_id)).await
    }

    /// Staging key for one chunk of a session.
    pub fn chunk_key(session_id: UploadSessionId, index: u32) -> String {
        format!("_staging/{session_id}/{index:06}")
    }

    /// Staging key prefix for a whole session.
    pub fn session_prefix(session_id: UploadSessionId) -> String {
        format!("_staging/{session_id}")
    }
}
