//! Secret stores holding per-account storage keys.
//!
//! A store answers "what is the secret for this account in this role". It
//! never decides what a missing secret means; that is `CredentialResolver`'s job.

use async_trait::async_trait;
use relay_core::{AccountRole, AppError};
use std::collections::HashMap;
use std::env;

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Look up the secret for `account_id` in `role`.
    ///
    /// Returns `Ok(None)` when no secret is registered.
    async fn get(&self, account_id: &str, role: AccountRole) -> Result<Option<String>, AppError>;
}

/// Secrets read from process environment variables.
///
/// For account `acct1` in the source role, `{prefix}_SOURCE_ACCT1` is tried
/// first, then `{prefix}_ACCT1`. Non-alphanumeric characters map to `_`.
#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn normalize(part: &str) -> String {
        part.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Candidate variable names, most specific first
    pub fn variable_names(&self, account_id: &str, role: AccountRole) -> [String; 2] {
        let prefix = Self::normalize(&self.prefix);
        let account = Self::normalize(account_id);
        [
            format!("{}_{}_{}", prefix, Self::normalize(role.as_str()), account),
            format!("{}_{}", prefix, account),
        ]
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get(&self, account_id: &str, role: AccountRole) -> Result<Option<String>, AppError> {
        for name in self.variable_names(account_id, role) {
            match env::var(&name) {
                Ok(value) if !value.trim().is_empty() => {
                    tracing::debug!(variable = %name, account = %account_id, role = %role, "Secret found in environment");
                    return Ok(Some(value));
                }
                Ok(_) | Err(env::VarError::NotPresent) => continue,
                Err(env::VarError::NotUnicode(_)) => {
                    return Err(AppError::SecretStore(format!(
                        "environment variable {} is not valid unicode",
                        name
                    )));
                }
            }
        }
        Ok(None)
    }
}

/// In-memory secrets keyed by account and role.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<(String, AccountRole), String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(
        mut self,
        account_id: impl Into<String>,
        role: AccountRole,
        secret: impl Into<String>,
    ) -> Self {
        self.insert(account_id, role, secret);
        self
    }

    pub fn insert(
        &mut self,
        account_id: impl Into<String>,
        role: AccountRole,
        secret: impl Into<String>,
    ) {
        self.secrets
            .insert((account_id.into(), role), secret.into());
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get(&self, account_id: &str, role: AccountRole) -> Result<Option<String>, AppError> {
        Ok(self
            .secrets
            .get(&(account_id.to_string(), role))
            .filter(|s| !s.trim().is_empty())
            .cloned())
    }
}
