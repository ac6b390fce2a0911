//! Per-owner storage quota configuration.

use serde::{Deserialize, Serialize};

/// Quota defaults applied when the identity boundary supplies no
/// per-user limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Default per-user storage limit in bytes (default 10 GB).
    #[serde(default = "default_limit")]
    pub default_limit_bytes: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_limit_bytes: default_limit(),
        }
    }
}

fn default_limit() -> u64 {
    10_737_418_240 // 10 GB
}
