//! Chunk assembler for completing uploads.

use std::sync::Arc;

use tracing::info;

use cirrus_core::error::{AppError, ErrorKind};
use cirrus_core::result::AppResult;
use cirrus_core::traits::BlobStore;
use cirrus_core::types::UploadSessionId;

use crate::staging::ChunkStaging;

/// Concatenates staged chunks into the final blob.
#[derive(Debug, Clone)]
pub struct ChunkAssembler {
    /// Staging area holding the chunks.
    staging: ChunkStaging,
    /// Blob store receiving the assembled object.
    store: Arc<dyn BlobStore>,
}

impl ChunkAssembler {
    /// Create a new assembler over the given staging area and store.
    pub fn new(staging: ChunkStaging, store: Arc<dyn BlobStore>) -> Self {
        Self { staging, store }
    }

    /// Assemble chunks `0..total_chunks` in order into the blob at
    /// `target_key`, then discard the staging area.
    ///
    /// A missing chunk aborts the assembly before the target blob is
    /// touched; staged chunks are kept so the client can retry the
    /// missing index and complete again. Returns the total bytes written.
    pub async fn assemble(
        &self,
        session_id: UploadSessionId,
        total_chunks: u32,
        target_key: &str,
    ) -> AppResult<u64> {
        info!(
            session_id = %session_id,
            total_chunks,
            target_key,
            "Assembling upload"
        );

        for index in 0..total_chunks {
            if !self.staging.chunk_exists(session_id, index).await? {
                return Err(AppError::new(
                    ErrorKind::Storage,
                    format!("Staged chunk {index} is missing for session {session_id}"),
                ));
            }
        }

        self.store.delete(target_key).await?;

        let mut total_bytes = 0u64;
        for index in 0..total_chunks {
            let chunk = self.staging.read_chunk(session_id, index).await?;
            total_bytes += chunk.len() as u64;
            self.store.append(target_key, chunk).await?;
        }

        self.staging.discard_session(session_id).await?;

        info!(
            session_id = %session_id,
            bytes = total_bytes,
            "Assembly complete"
        );

        Ok(total_bytes)
    }
}
