use crate::secrets::SecretStore;
use relay_core::{AccountCredential, AccountRole, AppError};
use std::sync::Arc;

/// Resolves account identifiers to credentials through a `SecretStore`.
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn SecretStore>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Resolve the credential for `account_id` acting as `role`.
    ///
    /// Missing or empty secrets fail with `CredentialNotFound`. Secret values
    /// are never logged.
    pub async fn resolve(
        &self,
        account_id: &str,
        role: AccountRole,
    ) -> Result<AccountCredential, AppError> {
        let not_found = || AppError::CredentialNotFound {
            account_id: account_id.to_string(),
            role,
        };

        if account_id.trim().is_empty() {
            return Err(not_found());
        }

        match self.store.get(account_id, role).await? {
            Some(secret) if !secret.trim().is_empty() => {
                tracing::debug!(account = %account_id, role = %role, "Credential resolved");
                Ok(AccountCredential::new(account_id, secret))
            }
            _ => {
                tracing::warn!(account = %account_id, role = %role, "No credential registered");
                Err(not_found())
            }
        }
    }
}
