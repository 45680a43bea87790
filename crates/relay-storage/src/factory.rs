#[cfg(feature = "storage-azure")]
use crate::AzureBlobStore;
#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
use crate::{BlobStore, ConnectionDescriptor, StorageBackend, StorageError, StorageResult};
use relay_core::{AccountCredential, Config};
use std::path::PathBuf;
use std::sync::Arc;

/// A client bound to one account, together with the credential it was built from.
#[derive(Clone)]
pub struct StorageEndpoint {
    credential: AccountCredential,
    connection: ConnectionDescriptor,
    client: Arc<dyn BlobStore>,
}

impl StorageEndpoint {
    pub fn credential(&self) -> &AccountCredential {
        &self.credential
    }

    pub fn connection(&self) -> &ConnectionDescriptor {
        &self.connection
    }

    pub fn client(&self) -> &Arc<dyn BlobStore> {
        &self.client
    }

    pub fn account(&self) -> &str {
        &self.credential.account_id
    }
}

impl std::fmt::Debug for StorageEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEndpoint")
            .field("account", &self.credential.account_id)
            .field("backend", &self.client.backend_type())
            .finish()
    }
}

/// Builds per-request account endpoints.
///
/// Holds only immutable settings; every call produces a fresh client.
#[derive(Clone, Debug)]
pub struct StorageClientFactory {
    backend: StorageBackend,
    endpoint_suffix: String,
    custom_endpoint: Option<String>,
    local_root: Option<PathBuf>,
}

impl StorageClientFactory {
    pub fn new(
        backend: StorageBackend,
        endpoint_suffix: impl Into<String>,
        custom_endpoint: Option<String>,
        local_root: Option<PathBuf>,
    ) -> Self {
        Self {
            backend,
            endpoint_suffix: endpoint_suffix.into(),
            custom_endpoint,
            local_root,
        }
    }

    /// Create a factory based on configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.storage_backend,
            config.storage_endpoint_suffix.clone(),
            config.storage_endpoint.clone(),
            config.local_storage_path.as_ref().map(PathBuf::from),
        )
    }

    /// Factory for the local backend rooted at `root`
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(StorageBackend::Local, "local", None, Some(root.into()))
    }

    /// Build an endpoint for the account named by `credential`.
    ///
    /// Fails with `InvalidCredential` when the credential is malformed.
    pub fn build_endpoint(&self, credential: &AccountCredential) -> StorageResult<StorageEndpoint> {
        let connection = ConnectionDescriptor::from_credential(
            credential,
            &self.endpoint_suffix,
            self.custom_endpoint.as_deref(),
        )?;

        let client: Arc<dyn BlobStore> = match self.backend {
            #[cfg(feature = "storage-azure")]
            StorageBackend::Azure => Arc::new(AzureBlobStore::new(connection.clone())?),

            #[cfg(not(feature = "storage-azure"))]
            StorageBackend::Azure => {
                return Err(StorageError::ConfigError(
                    "Azure storage backend not available (storage-azure feature not enabled)"
                        .to_string(),
                ))
            }

            #[cfg(feature = "storage-local")]
            StorageBackend::Local => {
                let root = self.local_root.clone().ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
                Arc::new(LocalBlobStore::new(root, connection.account_name.clone()))
            }

            #[cfg(not(feature = "storage-local"))]
            StorageBackend::Local => {
                return Err(StorageError::ConfigError(
                    "Local storage backend not available (storage-local feature not enabled)"
                        .to_string(),
                ))
            }
        };

        Ok(StorageEndpoint {
            credential: credential.clone(),
            connection,
            client,
        })
    }
}
