//! Permission grant repository.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use cirrus_core::types::{GrantId, UserId};
use cirrus_entity::grant::PermissionGrant;

/// Repository for [`PermissionGrant`] records.
///
/// Token uniqueness is probabilistic (128-bit random tokens), not
/// enforced by the store.
#[derive(Debug, Default)]
pub struct GrantRepository {
    /// Grants by id.
    grants: DashMap<GrantId, PermissionGrant>,
}

impl GrantRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new grant record.
    pub fn insert(&self, grant: PermissionGrant) -> PermissionGrant {
        self.grants.insert(grant.id, grant.clone());
        grant
    }

    /// All grants on a resource.
    pub fn for_resource(&self, resource_id: Uuid) -> Vec<PermissionGrant> {
        self.grants
            .iter()
            .filter(|g| g.resource_id == resource_id)
            .map(|g| g.clone())
            .collect()
    }

    /// A non-expired direct user grant on the resource, if any.
    pub fn active_user_grant(
        &self,
        resource_id: Uuid,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Option<PermissionGrant> {
        self.grants
            .iter()
            .find(|g| {
                g.resource_id == resource_id
                    && g.grantee() == Some(user_id)
                    && !g.is_expired(now)
            })
            .map(|g| g.clone())
    }

    /// All non-expired grants held by a user, across resources.
    pub fn active_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> Vec<PermissionGrant> {
        self.grants
            .iter()
            .filter(|g| g.grantee() == Some(user_id) && !g.is_expired(now))
            .map(|g| g.clone())
            .collect()
    }

    /// Look up a public grant by its token, expired or not.
    ///
    /// Expiry is the caller's concern: an expired match is a different
    /// failure (`LinkExpired`) than no match at all (`LinkInvalid`).
    pub fn by_token(&self, token: &str) -> Option<PermissionGrant> {
        self.grants
            .iter()
            .find(|g| g.public_token() == Some(token))
            .map(|g| g.clone())
    }

    /// Total number of grant records.
    pub fn count(&self) -> usize {
        self.grants.len()
    }
}
