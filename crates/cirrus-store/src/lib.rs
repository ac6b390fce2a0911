//! # cirrus-store
//!
//! The persistent entity store for Cirrus, instantiated in memory.
//!
//! Repositories are keyed on typed ids and backed by [`dashmap::DashMap`]
//! so that the operations the rest of the system relies on for correctness
//! (quota counter updates, chunk-set union, cascade bulk updates over a
//! path predicate, conditional deletes) execute atomically at the storage
//! layer rather than as application-level read-modify-write sequences.

pub mod ledger;
pub mod repositories;

pub use ledger::QuotaLedger;
pub use repositories::{
    FileRepository, FolderRepository, GrantRepository, UploadSessionRepository,
};
