//! Shared test helpers building the full service stack over a temporary
//! blob root.

use std::sync::Arc;

use bytes::Bytes;

use cirrus_blob::{ChunkAssembler, ChunkStaging, LocalBlobStore};
use cirrus_core::config::{AppConfig, JanitorConfig, QuotaConfig, StorageConfig};
use cirrus_core::traits::BlobStore;
use cirrus_core::types::UserId;
use cirrus_service::{
    FileService, RequestContext, ShareService, TreeService, UploadService,
};
use cirrus_store::{
    FileRepository, FolderRepository, GrantRepository, QuotaLedger, UploadSessionRepository,
};
use cirrus_worker::RetentionSweep;

/// Default quota for test callers: 1 GiB.
pub const TEST_QUOTA: u64 = 1024 * 1024 * 1024;

/// Chunk size used by the test stack: 5 MiB, the production default.
pub const CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Fully wired application stack over a temporary directory.
pub struct TestApp {
    /// Blob store rooted in `_tmp`.
    pub blob: Arc<dyn BlobStore>,
    /// Chunk staging over the blob store.
    pub staging: ChunkStaging,
    /// Folder repository.
    pub folder_repo: Arc<FolderRepository>,
    /// File repository.
    pub file_repo: Arc<FileRepository>,
    /// Upload session repository.
    pub session_repo: Arc<UploadSessionRepository>,
    /// Quota ledger.
    pub ledger: Arc<QuotaLedger>,
    /// Tree service.
    pub tree: TreeService,
    /// Upload service.
    pub upload: UploadService,
    /// Share service.
    pub share: ShareService,
    /// File service.
    pub files: FileService,
    /// Retention sweep.
    pub sweep: RetentionSweep,
    /// Keeps the blob root alive for the test's duration.
    _tmp: tempfile::TempDir,
}

impl TestApp {
    /// Build the whole stack with default configuration.
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let config = AppConfig {
            storage: StorageConfig {
                data_root: tmp.path().to_string_lossy().into_owned(),
                ..StorageConfig::default()
            },
            ..AppConfig::default()
        };
        Self::with_config(tmp, config).await
    }

    async fn with_config(tmp: tempfile::TempDir, config: AppConfig) -> Self {
        let blob: Arc<dyn BlobStore> = Arc::new(
            LocalBlobStore::new(&config.storage.data_root)
                .await
                .expect("create blob store"),
        );
        let staging = ChunkStaging::new(Arc::clone(&blob));
        let assembler = ChunkAssembler::new(staging.clone(), Arc::clone(&blob));

        let folder_repo = Arc::new(FolderRepository::new());
        let file_repo = Arc::new(FileRepository::new());
        let session_repo = Arc::new(UploadSessionRepository::new());
        let grant_repo = Arc::new(GrantRepository::new());
        let ledger = Arc::new(QuotaLedger::new());

        let tree = TreeService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
            Arc::clone(&grant_repo),
            Arc::clone(&ledger),
            Arc::clone(&blob),
        );
        let upload = UploadService::new(
            Arc::clone(&session_repo),
            Arc::clone(&file_repo),
            Arc::clone(&folder_repo),
            Arc::clone(&ledger),
            staging.clone(),
            assembler,
            config.storage.clone(),
            config.janitor.clone(),
        );
        let share = ShareService::new(
            Arc::clone(&file_repo),
            Arc::clone(&folder_repo),
            Arc::clone(&grant_repo),
        );
        let files = FileService::new(
            Arc::clone(&file_repo),
            share.clone(),
            Arc::clone(&ledger),
            Arc::clone(&blob),
        );
        let sweep = RetentionSweep::new(
            Arc::clone(&session_repo),
            Arc::clone(&file_repo),
            Arc::clone(&folder_repo),
            Arc::clone(&ledger),
            staging.clone(),
            Arc::clone(&blob),
            JanitorConfig::default(),
        );

        Self {
            blob,
            staging,
            folder_repo,
            file_repo,
            session_repo,
            ledger,
            tree,
            upload,
            share,
            files,
            sweep,
            _tmp: tmp,
        }
    }

    /// A fresh caller context with the default test quota.
    pub fn ctx(&self) -> RequestContext {
        let quota = QuotaConfig {
            default_limit_bytes: TEST_QUOTA,
        };
        RequestContext::with_default_limit(UserId::new(), &quota)
    }

    /// A fresh caller context with an explicit quota limit.
    pub fn ctx_with_limit(&self, limit: u64) -> RequestContext {
        RequestContext::new(UserId::new(), limit)
    }
}

/// Upload a complete file through the chunked protocol and return it.
pub async fn upload_file(
    app: &TestApp,
    ctx: &RequestContext,
    name: &str,
    content: &[u8],
    parent_id: Option<cirrus_core::types::FolderId>,
) -> cirrus_entity::file::File {
    let init = app
        .upload
        .init_session(ctx, name, content.len() as u64, parent_id)
        .await
        .expect("init session");

    for index in 0..init.total_chunks {
        let start = (index as u64 * init.chunk_size_bytes) as usize;
        let end = (start + init.chunk_size_bytes as usize).min(content.len());
        app.upload
            .upload_chunk(
                ctx,
                init.session_id,
                index,
                Bytes::copy_from_slice(&content[start..end]),
            )
            .await
            .expect("upload chunk");
    }

    app.upload
        .complete_upload(ctx, init.session_id)
        .await
        .expect("complete upload")
}

/// Drain a download stream into memory.
pub async fn read_stream(mut stream: cirrus_core::traits::ByteStream) -> Vec<u8> {
    use futures::StreamExt;

    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.expect("stream chunk"));
    }
    out
}
