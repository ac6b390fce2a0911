//! Grant creation and access resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use cirrus_core::error::AppError;
use cirrus_core::result::AppResult;
use cirrus_core::types::{GrantId, UserId};
use cirrus_entity::grant::{GrantRole, GrantTarget, PermissionGrant, ResourceType};
use cirrus_store::{FileRepository, FolderRepository, GrantRepository};

use crate::context::RequestContext;

use super::token::generate_token;

/// A request to share a resource, either with a user or via a public link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGrantRequest {
    /// Type of the resource being shared.
    pub resource_type: ResourceType,
    /// Id of the resource being shared.
    pub resource_id: Uuid,
    /// Permission level to grant.
    pub role: GrantRole,
    /// Direct grantee, for user shares.
    pub grantee: Option<UserId>,
    /// Whether to mint a public link instead.
    pub public: bool,
    /// Optional expiry; None means the grant never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Resolves who may access what, and mints new grants.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// File repository, for resolving shared files.
    file_repo: Arc<FileRepository>,
    /// Folder repository, for resolving shared folders.
    folder_repo: Arc<FolderRepository>,
    /// Grant repository.
    grant_repo: Arc<GrantRepository>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        folder_repo: Arc<FolderRepository>,
        grant_repo: Arc<GrantRepository>,
    ) -> Self {
        Self {
            file_repo,
            folder_repo,
            grant_repo,
        }
    }

    /// Create a grant on a resource the caller owns.
    ///
    /// Exactly one of `grantee` / `public` must be set; the two target
    /// forms are mutually exclusive. Public grants carry a fresh random
    /// token. Grants are add-only: there is no revocation, only expiry.
    pub async fn create_grant(
        &self,
        ctx: &RequestContext,
        request: CreateGrantRequest,
    ) -> AppResult<PermissionGrant> {
        self.owned_resource(ctx, request.resource_type, request.resource_id)?;

        let target = match (request.grantee, request.public) {
            (Some(_), true) | (None, false) => {
                return Err(AppError::validation(
                    "Exactly one of grantee or public must be specified",
                ));
            }
            (Some(grantee), false) => {
                if grantee == ctx.user_id {
                    return Err(AppError::validation("Cannot share a resource with yourself"));
                }
                GrantTarget::User(grantee)
            }
            (None, true) => GrantTarget::Public {
                token: generate_token(),
            },
        };

        let grant = self.grant_repo.insert(PermissionGrant {
            id: GrantId::new(),
            resource_type: request.resource_type,
            resource_id: request.resource_id,
            role: request.role,
            target,
            expires_at: request.expires_at,
            created_by: ctx.user_id,
            created_at: Utc::now(),
        });

        info!(
            user_id = %ctx.user_id,
            grant_id = %grant.id,
            resource_id = %grant.resource_id,
            "Grant created"
        );
        Ok(grant)
    }

    /// Whether the caller may read the resource: its owner, or the holder
    /// of a non-expired direct grant on it.
    pub fn can_read(
        &self,
        resource_id: Uuid,
        owner_id: UserId,
        caller: UserId,
        now: DateTime<Utc>,
    ) -> bool {
        caller == owner_id
            || self
                .grant_repo
                .active_user_grant(resource_id, caller, now)
                .is_some()
    }

    /// Resolve a public token to its grant.
    pub fn resolve_public(&self, token: &str, now: DateTime<Utc>) -> AppResult<PermissionGrant> {
        let grant = self
            .grant_repo
            .by_token(token)
            .ok_or_else(|| AppError::link_invalid("Unknown share link"))?;
        if grant.is_expired(now) {
            return Err(AppError::link_expired("Share link has expired"));
        }
        Ok(grant)
    }

    /// All grants on a resource. Owner-only.
    pub async fn list_grants(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AppResult<Vec<PermissionGrant>> {
        self.owned_resource(ctx, resource_type, resource_id)?;
        Ok(self.grant_repo.for_resource(resource_id))
    }

    /// All non-expired grants held by the caller.
    pub fn user_grants(&self, caller: UserId, now: DateTime<Utc>) -> Vec<PermissionGrant> {
        self.grant_repo.active_for_user(caller, now)
    }

    /// Resolve the resource and require caller ownership.
    fn owned_resource(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AppResult<()> {
        let owner_id = match resource_type {
            ResourceType::File => self
                .file_repo
                .find(resource_id.into())
                .filter(|f| !f.is_deleted)
                .map(|f| f.owner_id),
            ResourceType::Folder => self
                .folder_repo
                .find(resource_id.into())
                .filter(|f| !f.is_deleted)
                .map(|f| f.owner_id),
        }
        .ok_or_else(|| AppError::not_found("Resource not found"))?;

        if owner_id != ctx.user_id {
            return Err(AppError::access_denied("Only the owner may manage sharing"));
        }
        Ok(())
    }
}
