//! The two idempotent retention passes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use cirrus_blob::ChunkStaging;
use cirrus_core::config::JanitorConfig;
use cirrus_core::traits::BlobStore;
use cirrus_store::{FileRepository, FolderRepository, QuotaLedger, UploadSessionRepository};

/// Counters from one full sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Expired upload sessions reclaimed.
    pub sessions_reclaimed: u64,
    /// Trashed files permanently purged.
    pub files_purged: u64,
    /// Trashed folders permanently purged.
    pub folders_purged: u64,
    /// Bytes returned to owners' quotas.
    pub bytes_reclaimed: u64,
}

/// Reclaims expired upload sessions and aged-out trash.
///
/// Both passes are idempotent and safe to re-run after interruption.
/// Failures on one node are logged and skipped so the rest of the sweep
/// still completes; the skipped node is retried on the next run.
#[derive(Debug, Clone)]
pub struct RetentionSweep {
    /// Upload session repository.
    session_repo: Arc<UploadSessionRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Quota ledger, debited when file records are purged.
    ledger: Arc<QuotaLedger>,
    /// Chunk staging area for abandoned sessions.
    staging: ChunkStaging,
    /// Blob store holding final artifacts.
    blob: Arc<dyn BlobStore>,
    /// Retention windows.
    config: JanitorConfig,
}

impl RetentionSweep {
    /// Creates a new retention sweep.
    pub fn new(
        session_repo: Arc<UploadSessionRepository>,
        file_repo: Arc<FileRepository>,
        folder_repo: Arc<FolderRepository>,
        ledger: Arc<QuotaLedger>,
        staging: ChunkStaging,
        blob: Arc<dyn BlobStore>,
        config: JanitorConfig,
    ) -> Self {
        Self {
            session_repo,
            file_repo,
            folder_repo,
            ledger,
            staging,
            blob,
            config,
        }
    }

    /// Run both passes and return the combined counters.
    pub async fn run_once(&self, now: DateTime<Utc>) -> SweepReport {
        let sessions_reclaimed = self.sweep_expired_sessions(now).await;
        let mut report = self.sweep_trash(now).await;
        report.sessions_reclaimed = sessions_reclaimed;

        info!(
            sessions_reclaimed = report.sessions_reclaimed,
            files_purged = report.files_purged,
            folders_purged = report.folders_purged,
            bytes_reclaimed = report.bytes_reclaimed,
            "Retention sweep complete"
        );
        report
    }

    /// Reclaim upload sessions past their expiry: staged chunks first,
    /// then the session record.
    ///
    /// The record removal is conditional on the session still being
    /// expired, so a `complete_upload` racing the janitor either finishes
    /// first (the conditional delete no-ops on the missing record) or
    /// observes the session gone.
    pub async fn sweep_expired_sessions(&self, now: DateTime<Utc>) -> u64 {
        let mut reclaimed = 0;
        for session in self.session_repo.expired(now) {
            if let Err(e) = self.staging.discard_session(session.id).await {
                warn!(
                    session_id = %session.id,
                    error = %e,
                    "Failed to discard staging area, will retry next sweep"
                );
                continue;
            }
            if self.session_repo.remove_if_expired(session.id, now) {
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Permanently purge files and folders trashed longer than the
    /// retention window. Each node ages independently; a folder can
    /// outlive its purged children or vice versa.
    pub async fn sweep_trash(&self, now: DateTime<Utc>) -> SweepReport {
        let cutoff = now - Duration::days(self.config.trash_retention_days);
        let mut report = SweepReport::default();

        for file in self.file_repo.trashed_before(cutoff) {
            if let Err(e) = self.blob.delete(&file.storage_key).await {
                warn!(
                    file_id = %file.id,
                    error = %e,
                    "Failed to delete artifact, will retry next sweep"
                );
                continue;
            }
            // One-shot remove keeps the debit exactly-once even if a sweep
            // overlaps a user-initiated permanent delete.
            if let Some(removed) = self.file_repo.remove(file.id) {
                self.ledger.debit(removed.owner_id, removed.size_bytes);
                report.bytes_reclaimed += removed.size_bytes;
                report.files_purged += 1;
            }
        }

        for folder in self.folder_repo.trashed_before(cutoff) {
            if self.folder_repo.remove(folder.id).is_some() {
                report.folders_purged += 1;
            }
        }

        report
    }

    /// The configured sweep interval.
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.config.interval_seconds)
    }

    /// Whether the janitor is enabled at all.
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }
}
