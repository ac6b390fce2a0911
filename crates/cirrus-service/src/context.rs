//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cirrus_core::config::QuotaConfig;
use cirrus_core::types::UserId;

/// Context for the current authenticated request.
///
/// Authentication itself happens outside this crate; callers hand in the
/// verified user id and the quota limit resolved for that user so that
/// every operation knows *who* is acting and under *which* limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's storage quota limit in bytes.
    pub storage_limit_bytes: u64,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, storage_limit_bytes: u64) -> Self {
        Self {
            user_id,
            storage_limit_bytes,
            request_time: Utc::now(),
        }
    }

    /// Context for a caller without a per-user limit: the configured
    /// default quota applies.
    pub fn with_default_limit(user_id: UserId, quota: &QuotaConfig) -> Self {
        Self::new(user_id, quota.default_limit_bytes)
    }
}
