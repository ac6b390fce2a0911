//! Upload coordinator: session lifecycle and chunk handling.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use cirrus_blob::{ChunkAssembler, ChunkStaging};
use cirrus_core::config::{JanitorConfig, StorageConfig};
use cirrus_core::error::AppError;
use cirrus_core::result::AppResult;
use cirrus_core::types::{FileId, FolderId, UploadSessionId};
use cirrus_entity::file::File;
use cirrus_entity::upload::UploadSession;
use cirrus_store::{FileRepository, FolderRepository, QuotaLedger, UploadSessionRepository};

use crate::context::RequestContext;

/// What the client gets back from a successful session init.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatedUpload {
    /// The session to address chunks to.
    pub session_id: UploadSessionId,
    /// Number of chunks the client must send.
    pub total_chunks: u32,
    /// Fixed chunk size; only the final chunk may be shorter.
    pub chunk_size_bytes: u64,
    /// When the session becomes reclaimable.
    pub expires_at: DateTime<Utc>,
}

/// Coordinates chunked uploads from session init through assembly.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Upload session repository.
    session_repo: Arc<UploadSessionRepository>,
    /// File repository receiving completed uploads.
    file_repo: Arc<FileRepository>,
    /// Folder repository, for validating the target folder.
    folder_repo: Arc<FolderRepository>,
    /// Quota ledger, checked at init and credited at completion.
    ledger: Arc<QuotaLedger>,
    /// Chunk staging area.
    staging: ChunkStaging,
    /// Assembler producing the final artifact.
    assembler: ChunkAssembler,
    /// Storage limits and chunk size.
    storage_config: StorageConfig,
    /// Session TTL source.
    janitor_config: JanitorConfig,
}

impl UploadService {
    /// Creates a new upload service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_repo: Arc<UploadSessionRepository>,
        file_repo: Arc<FileRepository>,
        folder_repo: Arc<FolderRepository>,
        ledger: Arc<QuotaLedger>,
        staging: ChunkStaging,
        assembler: ChunkAssembler,
        storage_config: StorageConfig,
        janitor_config: JanitorConfig,
    ) -> Self {
        Self {
            session_repo,
            file_repo,
            folder_repo,
            ledger,
            staging,
            assembler,
            storage_config,
            janitor_config,
        }
    }

    /// Open an upload session for a file of the declared size.
    ///
    /// The quota check is a read-only headroom test; nothing is reserved,
    /// so two sessions initiated concurrently can both pass and jointly
    /// overshoot the limit once completed.
    pub async fn init_session(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        declared_size: u64,
        parent_id: Option<FolderId>,
    ) -> AppResult<InitiatedUpload> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }
        if declared_size == 0 {
            return Err(AppError::validation("Declared size must be at least 1 byte"));
        }
        if declared_size > self.storage_config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "Declared size exceeds the {} byte upload limit",
                self.storage_config.max_upload_size_bytes
            )));
        }
        if let Some(parent_id) = parent_id {
            self.folder_repo
                .find_owned(parent_id, ctx.user_id)
                .filter(|f| !f.is_deleted)
                .ok_or_else(|| AppError::not_found("Target folder not found"))?;
        }
        if !self
            .ledger
            .has_headroom(ctx.user_id, declared_size, ctx.storage_limit_bytes)
        {
            return Err(AppError::quota_exceeded(format!(
                "Upload of {declared_size} bytes would exceed the storage quota"
            )));
        }

        let chunk_size = self.storage_config.chunk_size_bytes;
        let total_chunks = declared_size.div_ceil(chunk_size) as u32;
        let session = self.session_repo.insert(UploadSession::new(
            ctx.user_id,
            file_name,
            declared_size,
            parent_id,
            total_chunks,
            self.janitor_config.session_ttl_hours,
        ));

        info!(
            user_id = %ctx.user_id,
            session_id = %session.id,
            declared_size,
            total_chunks,
            "Upload session initiated"
        );
        Ok(InitiatedUpload {
            session_id: session.id,
            total_chunks,
            chunk_size_bytes: chunk_size,
            expires_at: session.expires_at,
        })
    }

    /// Receive one chunk. Chunks may arrive in any order; a retried index
    /// replaces the staged bytes. Returns the distinct received count.
    pub async fn upload_chunk(
        &self,
        ctx: &RequestContext,
        session_id: UploadSessionId,
        index: u32,
        data: Bytes,
    ) -> AppResult<u32> {
        let session = self
            .session_repo
            .find_owned(session_id, ctx.user_id)
            .ok_or_else(|| AppError::session_not_found("Upload session not found"))?;
        if index >= session.total_chunks {
            return Err(AppError::validation(format!(
                "Chunk index {index} out of range (expected 0..{})",
                session.total_chunks
            )));
        }

        self.staging.write_chunk(session_id, index, data).await?;
        // Record progress only after the bytes are safely staged; the union
        // is atomic at the store layer.
        self.session_repo
            .add_received_chunk(session_id, index)
            .ok_or_else(|| AppError::session_not_found("Upload session not found"))
    }

    /// Complete the upload: verify all chunks arrived, assemble the final
    /// artifact, create the file record, and charge the quota.
    ///
    /// On an assembly failure the session and its staged chunks are left
    /// intact so the client can re-send and complete again.
    pub async fn complete_upload(
        &self,
        ctx: &RequestContext,
        session_id: UploadSessionId,
    ) -> AppResult<File> {
        let session = self
            .session_repo
            .find_owned(session_id, ctx.user_id)
            .ok_or_else(|| AppError::session_not_found("Upload session not found"))?;
        if !session.is_complete() {
            return Err(AppError::incomplete_upload(
                session.received_count(),
                session.total_chunks,
            ));
        }

        // Claim the session before touching the blob store: the one-shot
        // remove lets exactly one of two racing completions proceed, so
        // the file is created and the ledger credited at most once. The
        // loser observes the session gone.
        let session = self
            .session_repo
            .remove(session_id)
            .ok_or_else(|| AppError::session_not_found("Upload session not found"))?;

        let file_id = FileId::new();
        let storage_key = format!("objects/{file_id}");
        if let Err(e) = self
            .assembler
            .assemble(session_id, session.total_chunks, &storage_key)
            .await
        {
            // Give the claim back so completion can be retried once the
            // missing chunk is re-sent.
            self.session_repo.insert(session);
            return Err(e);
        }

        let now = Utc::now();
        let file = self.file_repo.insert(File {
            id: file_id,
            name: session.file_name.clone(),
            parent_id: session.parent_id,
            owner_id: session.owner_id,
            size_bytes: session.declared_size,
            storage_key,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        });
        self.ledger.credit(session.owner_id, session.declared_size);

        info!(
            user_id = %ctx.user_id,
            session_id = %session_id,
            file_id = %file.id,
            bytes = file.size_bytes,
            "Chunked upload completed"
        );
        Ok(file)
    }
}
