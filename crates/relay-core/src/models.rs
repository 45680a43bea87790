//! Domain models for a single relayed event.
//!
//! Nothing here outlives the request that created it.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Location of an object named by a storage notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobReference {
    pub account_host: String,
    pub container_name: String,
    pub object_key: String,
}

impl BlobReference {
    /// Account identifier of the source: the first DNS label of the host.
    pub fn source_account_id(&self) -> &str {
        self.account_host
            .split('.')
            .next()
            .unwrap_or(&self.account_host)
    }
}

/// Which side of the copy a credential is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Source,
    Destination,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Source => "source",
            AccountRole::Destination => "destination",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access material for one storage account.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredential {
    pub account_id: String,
    pub secret: String,
}

impl AccountCredential {
    pub fn new(account_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredential")
            .field("account_id", &self.account_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Result status reported to the webhook caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    Success,
    PartialFailure,
}

/// Addressable identity of the replicated object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DestinationRef {
    pub account: String,
    pub container: String,
    pub key: String,
    /// URL of the object in the destination account
    pub url: String,
}

/// Outcome of handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CopyOutcome {
    pub status: CopyStatus,
    pub message: String,
    pub destination: DestinationRef,
}

impl CopyOutcome {
    pub fn is_success(&self) -> bool {
        self.status == CopyStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_account_id_is_first_label() {
        let reference = BlobReference {
            account_host: "acct1.example-storage.net".to_string(),
            container_name: "mycontainer".to_string(),
            object_key: "file.txt".to_string(),
        };
        assert_eq!(reference.source_account_id(), "acct1");
    }

    #[test]
    fn test_source_account_id_single_label_host() {
        let reference = BlobReference {
            account_host: "localhost".to_string(),
            container_name: "c".to_string(),
            object_key: "k".to_string(),
        };
        assert_eq!(reference.source_account_id(), "localhost");
    }

    #[test]
    fn test_credential_debug_redacts_secret() {
        let credential = AccountCredential::new("acct1", "c2VjcmV0LWtleQ==");
        let debug = format!("{:?}", credential);
        assert!(debug.contains("acct1"));
        assert!(!debug.contains("c2VjcmV0LWtleQ=="));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = CopyOutcome {
            status: CopyStatus::PartialFailure,
            message: "copy failed".to_string(),
            destination: DestinationRef {
                account: "backup".to_string(),
                container: "mycontainer".to_string(),
                key: "file.txt".to_string(),
                url: "https://backup.blob.core.windows.net/mycontainer/file.txt".to_string(),
            },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "partial_failure");
        assert_eq!(json["destination"]["key"], "file.txt");
        assert!(!outcome.is_success());
    }
}
