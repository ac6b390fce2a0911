//! Chunked upload coordination.

mod service;

pub use service::{InitiatedUpload, UploadService};
