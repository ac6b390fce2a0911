//! # cirrus-entity
//!
//! Domain entity models for Cirrus. Every struct in this crate represents
//! a persisted record or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod file;
pub mod folder;
pub mod grant;
pub mod upload;
