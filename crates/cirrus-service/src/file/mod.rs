//! File downloads and per-file trash lifecycle.

mod service;

pub use service::{FileDownload, FileService};
