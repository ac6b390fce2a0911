//! Retention janitor configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the background retention sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Whether the janitor runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between sweeps (default daily).
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Upload session time-to-live in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
    /// Days a trashed item survives before permanent purge.
    #[serde(default = "default_retention_days")]
    pub trash_retention_days: i64,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
            session_ttl_hours: default_session_ttl(),
            trash_retention_days: default_retention_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    86_400
}

fn default_session_ttl() -> i64 {
    24
}

fn default_retention_days() -> i64 {
    30
}
