//! End-to-end handling of one storage notification.

use crate::credentials::CredentialResolver;
use crate::event_parser::EventParser;
use crate::provisioner::{ContainerProvisioner, ProvisionResult};
use crate::secrets::SecretStore;
use crate::transfer::TransferExecutor;
use relay_core::{
    AccountCredential, AccountRole, AppError, Config, CopyOutcome, CopyStatus, DestinationRef, FailurePolicy,
};
use relay_storage::{StorageClientFactory, StorageEndpoint, StorageError};
use std::sync::Arc;

/// Coordinates parse, credential resolution, provisioning and transfer.
///
/// Holds only immutable collaborators, so one instance serves concurrent
/// events without coordination.
#[derive(Clone)]
pub struct CopyOrchestrator {
    destination_account: String,
    policy: FailurePolicy,
    resolver: CredentialResolver,
    factory: StorageClientFactory,
}

impl CopyOrchestrator {
    pub fn new(
        destination_account: impl Into<String>,
        policy: FailurePolicy,
        resolver: CredentialResolver,
        factory: StorageClientFactory,
    ) -> Self {
        Self {
            destination_account: destination_account.into(),
            policy,
            resolver,
            factory,
        }
    }

    pub fn from_config(config: &Config, secrets: Arc<dyn SecretStore>) -> Self {
        Self::new(
            config.destination_account.clone(),
            config.failure_policy,
            CredentialResolver::new(secrets),
            StorageClientFactory::from_config(config),
        )
    }

    /// Replicate the object named by `raw` into the destination account.
    ///
    /// Parsing, credential and client errors abort before any storage call.
    /// Provisioning and transfer failures are reported according to the
    /// failure policy.
    pub async fn handle_event(&self, raw: &[u8]) -> Result<CopyOutcome, AppError> {
        let event = EventParser::parse(raw)?;
        let reference = &event.reference;
        let container = reference.container_name.as_str();
        let key = reference.object_key.as_str();
        let source_account = reference.source_account_id();

        if let Some(event_id) = event.event_id.as_deref() {
            tracing::Span::current().record("event_id", event_id);
        }
        tracing::info!(
            event_id = event.event_id.as_deref().unwrap_or("-"),
            event_type = event.event_type.as_deref().unwrap_or("-"),
            url = %event.source_url,
            "Blob event received"
        );

        let source_credential = self
            .resolver
            .resolve(source_account, AccountRole::Source)
            .await?;
        let destination_credential = self
            .resolver
            .resolve(&self.destination_account, AccountRole::Destination)
            .await?;

        let source = self.build_endpoint(&source_credential, AccountRole::Source)?;
        let destination = self.build_endpoint(&destination_credential, AccountRole::Destination)?;

        let mut failures = Vec::new();

        let provisioned = ContainerProvisioner::ensure_container(&destination, container).await;
        if let ProvisionResult::Failed(e) = provisioned {
            if self.policy.is_strict() {
                return Err(AppError::Provisioning {
                    container: container.to_string(),
                    message: e.to_string(),
                });
            }
            tracing::warn!(
                container = %container,
                error = %e,
                "Continuing with transfer despite provisioning failure"
            );
            failures.push(format!("container provisioning failed: {}", e));
        }

        let transfer = TransferExecutor::copy(&source, &destination, container, key).await;
        if !transfer.is_completed() {
            let message = transfer
                .error
                .unwrap_or_else(|| "unknown transfer error".to_string());
            if self.policy.is_strict() {
                return Err(AppError::Transfer {
                    key: key.to_string(),
                    message,
                });
            }
            failures.push(format!("copy failed: {}", message));
        }

        let destination_ref = DestinationRef {
            account: destination.account().to_string(),
            container: container.to_string(),
            key: key.to_string(),
            url: destination.client().object_url(container, key),
        };

        let outcome = if failures.is_empty() {
            CopyOutcome {
                status: CopyStatus::Success,
                message: format!(
                    "Copied {}/{} ({} bytes) from {} to {}",
                    container, key, transfer.bytes_copied, source_account, destination_ref.account
                ),
                destination: destination_ref,
            }
        } else {
            tracing::warn!(
                container = %container,
                key = %key,
                failures = failures.len(),
                "Event handled with failures under lenient policy"
            );
            CopyOutcome {
                status: CopyStatus::PartialFailure,
                message: failures.join("; "),
                destination: destination_ref,
            }
        };

        Ok(outcome)
    }

    fn build_endpoint(
        &self,
        credential: &AccountCredential,
        role: AccountRole,
    ) -> Result<StorageEndpoint, AppError> {
        self.factory.build_endpoint(credential).map_err(|e| match e {
            StorageError::InvalidCredential(msg) => AppError::ClientConstruction(format!(
                "{} account '{}': {}",
                role, credential.account_id, msg
            )),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::ClientConstruction(other.to_string()),
        })
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use crate::secrets::StaticSecretStore;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::stream;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    const EVENT: &[u8] =
        br#"{"data":{"url":"https://acct1.example-storage.net/mycontainer/sub/file.txt"}}"#;

    struct CountingStore {
        inner: StaticSecretStore,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl SecretStore for CountingStore {
        async fn get(&self, account_id: &str, role: AccountRole) -> Result<Option<String>, AppError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.get(account_id, role).await
        }
    }

    fn secrets() -> StaticSecretStore {
        StaticSecretStore::new()
            .with_secret("acct1", AccountRole::Source, "source-secret")
            .with_secret("backup", AccountRole::Destination, "dest-secret")
    }

    fn orchestrator(root: &Path, policy: FailurePolicy, store: Arc<dyn SecretStore>) -> CopyOrchestrator {
        CopyOrchestrator::new(
            "backup",
            policy,
            CredentialResolver::new(store),
            StorageClientFactory::local(root),
        )
    }

    async fn seed_source(root: &Path, data: &'static [u8]) {
        let source = StorageClientFactory::local(root)
            .build_endpoint(&AccountCredential::new("acct1", "source-secret"))
            .unwrap();
        source
            .client()
            .create_container_if_not_exists("mycontainer")
            .await
            .unwrap();
        source
            .client()
            .write_stream(
                "mycontainer",
                "file.txt",
                Box::pin(stream::iter(vec![Ok(Bytes::from_static(data))])),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_event_is_replicated() {
        let dir = tempdir().unwrap();
        seed_source(dir.path(), b"hello relay").await;
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Lenient, Arc::new(secrets()));

        let outcome = orchestrator.handle_event(EVENT).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.destination.account, "backup");
        assert_eq!(outcome.destination.container, "mycontainer");
        assert_eq!(outcome.destination.key, "file.txt");
        let copied = std::fs::read(dir.path().join("backup/mycontainer/file.txt")).unwrap();
        assert_eq!(copied, b"hello relay");
    }

    #[tokio::test]
    async fn test_malformed_event_has_no_side_effects() {
        let dir = tempdir().unwrap();
        let store = Arc::new(CountingStore {
            inner: secrets(),
            lookups: AtomicUsize::new(0),
        });
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Lenient, store.clone());

        for raw in [&b"{}"[..], b"not json", br#"{"data":{"url":"https://acct1.x.net/"}}"#] {
            let result = orchestrator.handle_event(raw).await;
            assert!(matches!(result, Err(AppError::MalformedEvent(_))));
        }

        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_source_credential() {
        let dir = tempdir().unwrap();
        let store = StaticSecretStore::new().with_secret("backup", AccountRole::Destination, "d");
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Lenient, Arc::new(store));

        let err = orchestrator.handle_event(EVENT).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::CredentialNotFound { ref account_id, role: AccountRole::Source } if account_id == "acct1"
        ));
        assert!(!dir.path().join("backup").exists());
    }

    #[tokio::test]
    async fn test_missing_destination_credential() {
        let dir = tempdir().unwrap();
        let store = StaticSecretStore::new().with_secret("acct1", AccountRole::Source, "s");
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Strict, Arc::new(store));

        let err = orchestrator.handle_event(EVENT).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::CredentialNotFound { role: AccountRole::Destination, .. }
        ));
    }

    #[tokio::test]
    async fn test_lenient_policy_reports_partial_failure() {
        let dir = tempdir().unwrap();
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Lenient, Arc::new(secrets()));

        let outcome = orchestrator.handle_event(EVENT).await.unwrap();

        assert_eq!(outcome.status, CopyStatus::PartialFailure);
        assert!(outcome.message.contains("copy failed"));
        assert_eq!(outcome.destination.key, "file.txt");
        // The container is still provisioned even though the copy failed.
        assert!(dir.path().join("backup/mycontainer").is_dir());
        assert!(!dir.path().join("backup/mycontainer/file.txt").exists());
    }

    #[tokio::test]
    async fn test_strict_policy_surfaces_transfer_failure() {
        let dir = tempdir().unwrap();
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Strict, Arc::new(secrets()));

        let err = orchestrator.handle_event(EVENT).await.unwrap_err();
        assert!(matches!(err, AppError::Transfer { ref key, .. } if key == "file.txt"));
    }

    #[tokio::test]
    async fn test_lenient_policy_copies_after_provisioning_failure() {
        let dir = tempdir().unwrap();
        seed_source(dir.path(), b"data").await;
        std::fs::write(dir.path().join("backup"), b"blocks the account directory").unwrap();
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Lenient, Arc::new(secrets()));

        let outcome = orchestrator.handle_event(EVENT).await.unwrap();

        assert_eq!(outcome.status, CopyStatus::PartialFailure);
        assert!(outcome.message.contains("container provisioning failed"));
        // The transfer was still attempted after the provisioning failure.
        assert!(outcome.message.contains("copy failed"));
        assert_eq!(outcome.destination.container, "mycontainer");
    }

    #[tokio::test]
    async fn test_single_segment_url_copies_object_named_after_container() {
        let dir = tempdir().unwrap();
        let source = StorageClientFactory::local(dir.path())
            .build_endpoint(&AccountCredential::new("acct1", "source-secret"))
            .unwrap();
        source.client().create_container_if_not_exists("mycontainer").await.unwrap();
        source
            .client()
            .write_stream(
                "mycontainer",
                "mycontainer",
                Box::pin(stream::iter(vec![Ok(Bytes::from_static(b"top level"))])),
            )
            .await
            .unwrap();
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Strict, Arc::new(secrets()));

        let outcome = orchestrator
            .handle_event(br#"{"data":{"url":"https://acct1.example-storage.net/mycontainer"}}"#)
            .await
            .unwrap();

        assert_eq!(outcome.destination.container, "mycontainer");
        assert_eq!(outcome.destination.key, "mycontainer");
        let copied = std::fs::read(dir.path().join("backup/mycontainer/mycontainer")).unwrap();
        assert_eq!(copied, b"top level");
    }

    #[tokio::test]
    async fn test_unconfigured_local_root_is_internal_error() {
        let orchestrator = CopyOrchestrator::new(
            "backup",
            FailurePolicy::Lenient,
            CredentialResolver::new(Arc::new(secrets())),
            StorageClientFactory::new(relay_core::StorageBackend::Local, "local", None, None),
        );

        let err = orchestrator.handle_event(EVENT).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(ref m) if m.contains("LOCAL_STORAGE_PATH")));
    }

    #[tokio::test]
    async fn test_strict_policy_aborts_on_provisioning_failure() {
        let dir = tempdir().unwrap();
        seed_source(dir.path(), b"data").await;
        std::fs::write(dir.path().join("backup"), b"blocks the account directory").unwrap();
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Strict, Arc::new(secrets()));

        let err = orchestrator.handle_event(EVENT).await.unwrap_err();
        assert!(matches!(err, AppError::Provisioning { ref container, .. } if container == "mycontainer"));
    }

    #[tokio::test]
    async fn test_repeated_event_is_idempotent() {
        let dir = tempdir().unwrap();
        seed_source(dir.path(), b"same bytes").await;
        let orchestrator = orchestrator(dir.path(), FailurePolicy::Strict, Arc::new(secrets()));

        let first = orchestrator.handle_event(EVENT).await.unwrap();
        let second = orchestrator.handle_event(EVENT).await.unwrap();

        assert_eq!(first.destination, second.destination);
        let copied = std::fs::read(dir.path().join("backup/mycontainer/file.txt")).unwrap();
        assert_eq!(copied, b"same bytes");
    }

    #[cfg(feature = "storage-azure")]
    #[tokio::test]
    async fn test_invalid_secret_is_client_construction_error() {
        let factory = StorageClientFactory::new(
            relay_core::StorageBackend::Azure,
            "blob.core.windows.net",
            None,
            None,
        );
        let orchestrator = CopyOrchestrator::new(
            "backup",
            FailurePolicy::Lenient,
            CredentialResolver::new(Arc::new(
                StaticSecretStore::new()
                    .with_secret("acct1", AccountRole::Source, "not base64 !!")
                    .with_secret("backup", AccountRole::Destination, "ZGVzdA=="),
            )),
            factory,
        );

        let err = orchestrator.handle_event(EVENT).await.unwrap_err();
        assert!(matches!(err, AppError::ClientConstruction(_)));
    }
}
