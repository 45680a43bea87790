//! Error types module
//!
//! All relay errors are unified under the `AppError` enum. Each variant
//! self-describes how it should be presented over HTTP through the
//! `ErrorMetadata` trait.

use crate::models::AccountRole;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like malformed input
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MALFORMED_EVENT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("No {role} credential registered for account '{account_id}'")]
    CredentialNotFound {
        account_id: String,
        role: AccountRole,
    },

    #[error("Secret store error: {0}")]
    SecretStore(String),

    #[error("Client construction failed: {0}")]
    ClientConstruction(String),

    #[error("Failed to provision container '{container}': {message}")]
    Provisioning { container: String, message: String },

    #[error("Failed to copy '{key}': {message}")]
    Transfer { key: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedEvent(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::MalformedEvent(_) => (
            400,
            "MALFORMED_EVENT",
            false,
            Some("Send a JSON body with a data.url field naming the source object"),
            false,
            LogLevel::Debug,
        ),
        AppError::CredentialNotFound { .. } => (
            500,
            "CREDENTIAL_NOT_FOUND",
            false,
            Some("Register a credential for the account in the secret store"),
            false,
            LogLevel::Error,
        ),
        AppError::SecretStore(_) => (
            500,
            "SECRET_STORE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::ClientConstruction(_) => (
            500,
            "CLIENT_CONSTRUCTION_ERROR",
            false,
            Some("Check the stored account credential"),
            true,
            LogLevel::Error,
        ),
        AppError::Provisioning { .. } => (
            502,
            "PROVISIONING_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::Transfer { .. } => (
            502,
            "TRANSFER_ERROR",
            true,
            Some("Retry the event after checking the source object"),
            false,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MalformedEvent(_) => "MalformedEvent",
            AppError::CredentialNotFound { .. } => "CredentialNotFound",
            AppError::SecretStore(_) => "SecretStore",
            AppError::ClientConstruction(_) => "ClientConstruction",
            AppError::Provisioning { .. } => "Provisioning",
            AppError::Transfer { .. } => "Transfer",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Full message, for non-production responses
    pub fn detailed_message(&self) -> String {
        self.to_string()
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MalformedEvent(msg) => format!("Malformed event: {}", msg),
            AppError::CredentialNotFound { account_id, role } => {
                format!("No {} credential for account '{}'", role, account_id)
            }
            AppError::Provisioning { container, .. } => {
                format!("Destination container '{}' could not be provisioned", container)
            }
            AppError::Transfer { key, .. } => format!("Copy of '{}' failed", key),
            AppError::SecretStore(_) => "Secret store unavailable".to_string(),
            AppError::ClientConstruction(_) => "Invalid storage credential".to_string(),
            AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }
}
