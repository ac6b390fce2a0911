//! Per-owner quota ledger with atomic counters.

use dashmap::DashMap;

use cirrus_core::types::UserId;

/// Running total of storage bytes charged per owner.
///
/// Bytes are charged at upload completion and released only at permanent
/// deletion; trashed files still count. Updates go through the per-key
/// entry lock, so concurrent credits and debits never lose increments.
///
/// `has_headroom` is a read-only check: nothing is reserved at session
/// init, so two concurrent inits can both pass and jointly overshoot once
/// both complete. That race is a documented property of the design.
#[derive(Debug, Default)]
pub struct QuotaLedger {
    /// Bytes used per owner.
    used: DashMap<UserId, u64>,
}

impl QuotaLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently charged to the owner.
    pub fn used(&self, owner_id: UserId) -> u64 {
        self.used.get(&owner_id).map(|v| *v).unwrap_or(0)
    }

    /// Check whether `additional` bytes still fit under `limit`.
    pub fn has_headroom(&self, owner_id: UserId, additional: u64, limit: u64) -> bool {
        self.used(owner_id).saturating_add(additional) <= limit
    }

    /// Atomically charge bytes to the owner.
    pub fn credit(&self, owner_id: UserId, bytes: u64) {
        self.used
            .entry(owner_id)
            .and_modify(|v| *v = v.saturating_add(bytes))
            .or_insert(bytes);
    }

    /// Atomically release bytes from the owner, saturating at zero.
    pub fn debit(&self, owner_id: UserId, bytes: u64) {
        self.used
            .entry(owner_id)
            .and_modify(|v| *v = v.saturating_sub(bytes))
            .or_insert(0);
    }
}
