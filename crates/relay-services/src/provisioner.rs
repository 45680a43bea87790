use relay_storage::{StorageEndpoint, StorageError};

/// Result of making sure a destination container exists.
#[derive(Debug)]
pub enum ProvisionResult {
    Created,
    AlreadyExisted,
    Failed(StorageError),
}

pub struct ContainerProvisioner;

impl ContainerProvisioner {
    /// Ensure `container` exists in the destination account.
    ///
    /// Idempotent. A container that already exists is not an error; every
    /// other failure is returned as `Failed` for the caller to act on.
    pub async fn ensure_container(
        destination: &StorageEndpoint,
        container: &str,
    ) -> ProvisionResult {
        match destination
            .client()
            .create_container_if_not_exists(container)
            .await
        {
            Ok(true) => {
                tracing::info!(
                    account = %destination.account(),
                    container = %container,
                    "Destination container created"
                );
                ProvisionResult::Created
            }
            Ok(false) => ProvisionResult::AlreadyExisted,
            Err(e) => {
                tracing::error!(
                    account = %destination.account(),
                    container = %container,
                    error = %e,
                    "Failed to provision destination container"
                );
                ProvisionResult::Failed(e)
            }
        }
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use relay_core::AccountCredential;
    use relay_storage::StorageClientFactory;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_container_twice() {
        let dir = tempdir().unwrap();
        let endpoint = StorageClientFactory::local(dir.path())
            .build_endpoint(&AccountCredential::new("backup", "dest-secret"))
            .unwrap();

        assert!(matches!(
            ContainerProvisioner::ensure_container(&endpoint, "mycontainer").await,
            ProvisionResult::Created
        ));
        assert!(matches!(
            ContainerProvisioner::ensure_container(&endpoint, "mycontainer").await,
            ProvisionResult::AlreadyExisted
        ));
    }

    #[tokio::test]
    async fn test_failure_is_returned_not_raised() {
        let dir = tempdir().unwrap();
        // A file where the account directory should be blocks container creation.
        std::fs::write(dir.path().join("backup"), b"not a directory").unwrap();
        let endpoint = StorageClientFactory::local(dir.path())
            .build_endpoint(&AccountCredential::new("backup", "dest-secret"))
            .unwrap();

        let result = ContainerProvisioner::ensure_container(&endpoint, "mycontainer").await;
        assert!(matches!(result, ProvisionResult::Failed(_)));
    }
}
