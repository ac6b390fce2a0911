//! Permission grant entities.

pub mod model;

pub use model::{GrantRole, GrantTarget, PermissionGrant, ResourceType};
