//! Blob store trait for pluggable byte-stream storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading stored blobs.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for blob storage backends keyed by opaque string keys.
///
/// Keys use `/`-separated segments; `delete_prefix` and `list_prefix`
/// operate on whole key namespaces (e.g. one upload session's staging
/// area). The trait is defined here in `cirrus-core` and implemented in
/// `cirrus-blob`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local").
    fn backend_type(&self) -> &str;

    /// Write bytes under the given key, replacing any existing blob.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Append bytes to the blob under the given key, creating it if absent.
    async fn append(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read the blob under the given key into memory.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Read the blob under the given key as a byte stream.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Delete the blob under the given key. Missing keys are a no-op.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Delete every blob whose key starts with the given prefix.
    async fn delete_prefix(&self, prefix: &str) -> AppResult<()>;

    /// Check whether a blob exists under the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// List keys under the given prefix.
    async fn list_prefix(&self, prefix: &str) -> AppResult<Vec<String>>;
}
