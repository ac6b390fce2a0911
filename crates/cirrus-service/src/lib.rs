//! Core services: resource tree, upload coordination, sharing, downloads.
//!
//! Services own the domain rules and delegate atomic state changes to the
//! repositories in `cirrus-store` and blob I/O to `cirrus-blob`. Every
//! caller-facing operation takes a [`context::RequestContext`] identifying
//! the already-authenticated user.

pub mod context;
pub mod file;
pub mod share;
pub mod tree;
pub mod upload;

pub use context::RequestContext;
pub use file::FileService;
pub use share::ShareService;
pub use tree::TreeService;
pub use upload::UploadService;
