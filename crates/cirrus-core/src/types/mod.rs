//! Core type definitions used across the Cirrus workspace.

pub mod id;

pub use id::*;
