//! # cirrus-core
//!
//! Core crate for Cirrus. Contains the unified error system, typed
//! identifiers, configuration schemas, and the blob-store trait implemented
//! by `cirrus-blob`.
//!
//! This crate has **no** internal dependencies on other Cirrus crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
