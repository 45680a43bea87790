//! Relay Storage Library
//!
//! Account-scoped blob clients used by the relay. Each client is bound to a
//! single storage account and addresses objects by `(container, key)`.
//!
//! Backends:
//!
//! - **azure**: object I/O through `object_store`, container creation through
//!   a Shared Key signed REST call.
//! - **local**: one directory per account, one subdirectory per container.
//!
//! Endpoints are built per request by [`StorageClientFactory`] and never shared.

#[cfg(feature = "storage-azure")]
pub mod azure;
pub mod connection;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use azure::AzureBlobStore;
pub use connection::ConnectionDescriptor;
pub use factory::{StorageClientFactory, StorageEndpoint};
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
pub use relay_core::StorageBackend;
pub use traits::{BlobStore, ByteStream, StorageError, StorageResult};
