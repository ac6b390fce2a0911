//! Cirrus Server — multi-tenant file-storage backend core.
//!
//! Main entry point that wires configuration, the blob store, the
//! in-memory repositories, the core services, and the retention janitor
//! together, then waits for a shutdown signal.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use cirrus_core::config::AppConfig;
use cirrus_core::error::AppError;
use cirrus_core::traits::BlobStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("CIRRUS_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Cirrus v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Blob store ───────────────────────────────────────
    tracing::info!(root = %config.storage.data_root, "Initializing blob store...");
    let blob: Arc<dyn BlobStore> =
        Arc::new(cirrus_blob::LocalBlobStore::new(&config.storage.data_root).await?);
    let staging = cirrus_blob::ChunkStaging::new(Arc::clone(&blob));
    let assembler = cirrus_blob::ChunkAssembler::new(staging.clone(), Arc::clone(&blob));
    tracing::info!("Blob store initialized");

    // ── Step 2: Repositories and ledger ──────────────────────────
    let folder_repo = Arc::new(cirrus_store::FolderRepository::new());
    let file_repo = Arc::new(cirrus_store::FileRepository::new());
    let session_repo = Arc::new(cirrus_store::UploadSessionRepository::new());
    let grant_repo = Arc::new(cirrus_store::GrantRepository::new());
    let ledger = Arc::new(cirrus_store::QuotaLedger::new());

    // ── Step 3: Services ─────────────────────────────────────────
    let tree_service = Arc::new(cirrus_service::TreeService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&file_repo),
        Arc::clone(&grant_repo),
        Arc::clone(&ledger),
        Arc::clone(&blob),
    ));
    let upload_service = Arc::new(cirrus_service::UploadService::new(
        Arc::clone(&session_repo),
        Arc::clone(&file_repo),
        Arc::clone(&folder_repo),
        Arc::clone(&ledger),
        staging.clone(),
        assembler,
        config.storage.clone(),
        config.janitor.clone(),
    ));
    let share_service = cirrus_service::ShareService::new(
        Arc::clone(&file_repo),
        Arc::clone(&folder_repo),
        Arc::clone(&grant_repo),
    );
    let file_service = Arc::new(cirrus_service::FileService::new(
        Arc::clone(&file_repo),
        share_service.clone(),
        Arc::clone(&ledger),
        Arc::clone(&blob),
    ));
    let share_service = Arc::new(share_service);
    tracing::info!(
        default_quota_bytes = config.quota.default_limit_bytes,
        "Services initialized"
    );

    // The embedding layer (HTTP, RPC, tests) drives these services; the
    // binary only keeps them alive alongside the janitor.
    let _ = (tree_service, upload_service, share_service, file_service);

    // ── Step 4: Retention janitor ────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweep = Arc::new(cirrus_worker::RetentionSweep::new(
        session_repo,
        file_repo,
        folder_repo,
        ledger,
        staging,
        Arc::clone(&blob),
        config.janitor.clone(),
    ));
    let janitor = cirrus_worker::JanitorRunner::new(sweep);
    let janitor_handle = tokio::spawn(async move {
        janitor.run(shutdown_rx).await;
    });

    tracing::info!("Cirrus is up");

    // ── Step 5: Wait for shutdown ────────────────────────────────
    wait_for_shutdown().await;
    tracing::info!("Shutting down...");

    let _ = shutdown_tx.send(true);
    let _ = janitor_handle.await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for Ctrl-C or SIGTERM.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
