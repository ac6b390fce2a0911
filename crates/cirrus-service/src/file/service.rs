//! File operations: streaming downloads and trash lifecycle.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use cirrus_core::error::AppError;
use cirrus_core::result::AppResult;
use cirrus_core::traits::{BlobStore, ByteStream};
use cirrus_core::types::FileId;
use cirrus_entity::file::File;
use cirrus_entity::grant::ResourceType;
use cirrus_store::{FileRepository, QuotaLedger};

use crate::context::RequestContext;
use crate::share::ShareService;

/// A resolved download: the file's metadata plus its byte stream.
pub struct FileDownload {
    /// The file record (name, size, owner).
    pub file: File,
    /// Streamed artifact contents.
    pub stream: ByteStream,
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

/// Operations on individual files.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Share resolver, for grant and public-link access checks.
    share: ShareService,
    /// Quota ledger, debited on permanent deletes.
    ledger: Arc<QuotaLedger>,
    /// Blob store holding file artifacts.
    blob: Arc<dyn BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        share: ShareService,
        ledger: Arc<QuotaLedger>,
        blob: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            file_repo,
            share,
            ledger,
            blob,
        }
    }

    /// Stream a file the caller owns or holds a non-expired grant on.
    ///
    /// Trashed files are indistinguishable from missing ones.
    pub async fn download(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<FileDownload> {
        let file = self
            .file_repo
            .find(file_id)
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if !self.share.can_read(
            file_id.into_uuid(),
            file.owner_id,
            ctx.user_id,
            ctx.request_time,
        ) {
            return Err(AppError::access_denied("No access to this file"));
        }

        let stream = self.blob.read(&file.storage_key).await?;
        Ok(FileDownload { file, stream })
    }

    /// Stream a file via a public share token.
    pub async fn download_public(&self, token: &str) -> AppResult<FileDownload> {
        let grant = self.share.resolve_public(token, Utc::now())?;
        if grant.resource_type != ResourceType::File {
            return Err(AppError::validation("Share link does not point to a file"));
        }

        let file = self
            .file_repo
            .find(grant.resource_id.into())
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let stream = self.blob.read(&file.storage_key).await?;
        Ok(FileDownload { file, stream })
    }

    /// Rename a file. Owner-only.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        new_name: &str,
    ) -> AppResult<File> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }

        let mut file = self
            .file_repo
            .find_owned(file_id, ctx.user_id)
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.name = new_name.to_string();
        file.updated_at = Utc::now();
        self.file_repo.update(file.clone());

        info!(user_id = %ctx.user_id, file_id = %file_id, "File renamed");
        Ok(file)
    }

    /// Move a single file to the trash. Its bytes stay on the quota.
    pub async fn soft_delete(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let mut file = self
            .file_repo
            .find_owned(file_id, ctx.user_id)
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let now = Utc::now();
        file.is_deleted = true;
        file.deleted_at = Some(now);
        file.updated_at = now;
        self.file_repo.update(file);

        info!(user_id = %ctx.user_id, file_id = %file_id, "File trashed");
        Ok(())
    }

    /// Restore a trashed file.
    pub async fn restore(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let mut file = self
            .file_repo
            .find_owned(file_id, ctx.user_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if !file.is_deleted {
            return Err(AppError::validation("File is not in the trash"));
        }

        file.is_deleted = false;
        file.deleted_at = None;
        file.updated_at = Utc::now();
        self.file_repo.update(file);

        info!(user_id = %ctx.user_id, file_id = %file_id, "File restored");
        Ok(())
    }

    /// Permanently delete a trashed file: artifact, record, and quota.
    ///
    /// The record removal is one-shot, so the ledger is debited at most
    /// once; a second permanent delete of the same id fails `NotFound`
    /// before the ledger is touched.
    pub async fn hard_delete(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let file = self
            .file_repo
            .find_owned(file_id, ctx.user_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if !file.is_deleted {
            return Err(AppError::validation("File is not in the trash"));
        }

        self.blob.delete(&file.storage_key).await?;
        let removed = self
            .file_repo
            .remove(file_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        self.ledger.debit(removed.owner_id, removed.size_bytes);

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            bytes_reclaimed = removed.size_bytes,
            "File purged"
        );
        Ok(())
    }
}
