//! Relay Services Layer
//!
//! The copy pipeline: event parsing, credential resolution, destination
//! provisioning and the streamed transfer, coordinated by `CopyOrchestrator`.
//! Keep HTTP handling in relay-api; keep the pipeline and its policy here.

pub mod credentials;
pub mod event_parser;
pub mod orchestrator;
pub mod provisioner;
pub mod secrets;
pub mod transfer;

pub use credentials::CredentialResolver;
pub use event_parser::{EventParser, ParsedEvent};
pub use orchestrator::CopyOrchestrator;
pub use provisioner::{ContainerProvisioner, ProvisionResult};
pub use secrets::{EnvSecretStore, SecretStore, StaticSecretStore};
pub use transfer::{TransferExecutor, TransferResult, TransferStatus};

pub use relay_storage::{
    BlobStore, ByteStream, StorageClientFactory, StorageEndpoint, StorageError, StorageResult,
};
