//! Permission grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cirrus_core::types::{GrantId, UserId};

/// Type of resource a grant applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A file.
    File,
    /// A folder.
    Folder,
}

/// Permission level granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantRole {
    /// Read-only access.
    Viewer,
    /// Read and modify access.
    Editor,
}

/// The recipient of a grant: a direct user share or an unauthenticated
/// public link. The two forms are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantTarget {
    /// Shared directly with another user.
    User(UserId),
    /// Shared via a capability-bearing public token.
    Public {
        /// 128-bit random token, hex encoded.
        token: String,
    },
}

/// A grant of access to a single file or folder.
///
/// Grants never apply to descendants of a shared folder; access derivation
/// is strictly per-resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Unique grant identifier.
    pub id: GrantId,
    /// Type of the shared resource.
    pub resource_type: ResourceType,
    /// ID of the shared resource (file or folder).
    pub resource_id: Uuid,
    /// Permission level granted.
    pub role: GrantRole,
    /// Grant recipient.
    pub target: GrantTarget,
    /// When the grant expires (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// The user who created the grant (the resource owner).
    pub created_by: UserId,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
}

impl PermissionGrant {
    /// Check if the grant has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }

    /// The public token, if this is a public-link grant.
    pub fn public_token(&self) -> Option<&str> {
        match &self.target {
            GrantTarget::Public { token } => Some(token),
            GrantTarget::User(_) => None,
        }
    }

    /// The grantee user id, if this is a direct user share.
    pub fn grantee(&self) -> Option<UserId> {
        match &self.target {
            GrantTarget::User(user_id) => Some(*user_id),
            GrantTarget::Public { .. } => None,
        }
    }
}
