//! Blob client abstraction
//!
//! This module defines the BlobStore trait that every account client implements.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stream of object bytes, yielded chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Client for one storage account.
///
/// Implementations hold only what is needed to reach their account. They do not
/// share connections or caches with other clients.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Account this client is scoped to
    fn account(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Addressable URL of an object in this account
    fn object_url(&self, container: &str, key: &str) -> String;

    /// Create the container if it does not exist.
    ///
    /// Returns `true` when the container was created and `false` when it was
    /// already present. An existing container is never an error.
    async fn create_container_if_not_exists(&self, container: &str) -> StorageResult<bool>;

    /// Open a read stream on an object.
    ///
    /// Fails with `NotFound` when the object does not exist. Bytes are pulled
    /// lazily as the stream is polled; dropping the stream releases the source.
    async fn open_read(&self, container: &str, key: &str) -> StorageResult<ByteStream>;

    /// Write an object from a stream, replacing any existing object.
    ///
    /// The stream is consumed until it ends and the number of bytes written is
    /// returned. The container must already exist.
    async fn write_stream(&self, container: &str, key: &str, data: ByteStream)
        -> StorageResult<u64>;
}
