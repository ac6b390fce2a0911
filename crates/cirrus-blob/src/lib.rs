//! Blob storage backends and chunked-upload staging.
//!
//! `LocalBlobStore` implements the [`cirrus_core::traits::BlobStore`]
//! trait over a local directory tree. `ChunkStaging` and `ChunkAssembler`
//! layer the chunked-upload staging area and final assembly on top of any
//! blob store.

pub mod assembler;
pub mod local;
pub mod staging;

pub use assembler::ChunkAssembler;
pub use local::LocalBlobStore;
pub use staging::ChunkStaging;
