//! Relay Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared by every component of the blob relay.

pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AccountCredential, AccountRole, BlobReference, CopyOutcome, CopyStatus, DestinationRef,
};
pub use policy::FailurePolicy;
pub use storage_types::StorageBackend;
