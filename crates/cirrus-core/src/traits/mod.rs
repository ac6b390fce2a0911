//! Core traits defined in `cirrus-core` and implemented by other crates.

pub mod blob;

pub use blob::{BlobStore, ByteStream};
