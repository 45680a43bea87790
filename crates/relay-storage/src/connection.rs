//! Account connection descriptors.
//!
//! A descriptor is the connection-string equivalent for one account: protocol,
//! account name, account key and where the blob service lives.

use crate::traits::{StorageError, StorageResult};
use relay_core::AccountCredential;
use std::fmt;

/// Connection settings for one storage account.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub account_name: String,
    pub account_key: String,
    pub endpoint_suffix: String,
    /// Custom blob endpoint. `{account}` is replaced by the account name;
    /// without the placeholder the account is appended as a path segment.
    pub custom_endpoint: Option<String>,
}

impl ConnectionDescriptor {
    /// Build a descriptor from a resolved credential.
    ///
    /// Fails only when the account id or secret is empty.
    pub fn from_credential(
        credential: &AccountCredential,
        endpoint_suffix: &str,
        custom_endpoint: Option<&str>,
    ) -> StorageResult<Self> {
        if credential.account_id.trim().is_empty() {
            return Err(StorageError::InvalidCredential(
                "account id is empty".to_string(),
            ));
        }
        if credential.secret.trim().is_empty() {
            return Err(StorageError::InvalidCredential(format!(
                "secret for account '{}' is empty",
                credential.account_id
            )));
        }

        Ok(Self {
            account_name: credential.account_id.clone(),
            account_key: credential.secret.clone(),
            endpoint_suffix: endpoint_suffix.to_string(),
            custom_endpoint: custom_endpoint.map(String::from),
        })
    }

    /// Base URL of the blob service for this account, without trailing slash
    pub fn blob_endpoint(&self) -> String {
        match &self.custom_endpoint {
            Some(endpoint) if endpoint.contains("{account}") => endpoint
                .replace("{account}", &self.account_name)
                .trim_end_matches('/')
                .to_string(),
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.account_name),
            None => format!("https://{}.{}", self.account_name, self.endpoint_suffix),
        }
    }

    pub fn protocol(&self) -> &str {
        if self.blob_endpoint().starts_with("http://") {
            "http"
        } else {
            "https"
        }
    }

    /// Render as a storage connection string. Contains the account key.
    pub fn to_connection_string(&self) -> String {
        match &self.custom_endpoint {
            Some(_) => format!(
                "DefaultEndpointsProtocol={};AccountName={};AccountKey={};BlobEndpoint={}",
                self.protocol(),
                self.account_name,
                self.account_key,
                self.blob_endpoint()
            ),
            None => format!(
                "DefaultEndpointsProtocol={};AccountName={};AccountKey={};EndpointSuffix={}",
                self.protocol(),
                self.account_name,
                self.account_key,
                self.endpoint_suffix
            ),
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("blob_endpoint", &self.blob_endpoint())
            .finish()
    }
}
