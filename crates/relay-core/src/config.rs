//! Configuration module
//!
//! Loads relay settings from the environment (with `.env` support) and
//! validates them before the server starts.

use std::env;
use std::str::FromStr;

use crate::policy::FailurePolicy;
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_EVENT_BODY_BYTES: usize = 1024 * 1024;
const STORAGE_ENDPOINT_SUFFIX: &str = "blob.core.windows.net";
const SECRET_ENV_PREFIX: &str = "RELAY_SECRET";

/// Log output format for the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Relay configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// Account that every object is replicated into.
    pub destination_account: String,
    pub storage_backend: StorageBackend,
    pub storage_endpoint_suffix: String,
    /// Custom blob endpoint (emulators). May contain an `{account}` placeholder.
    pub storage_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub failure_policy: FailurePolicy,
    pub secret_env_prefix: String,
    pub max_event_body_bytes: usize,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let config = Config {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            destination_account: var("DESTINATION_ACCOUNT")
                .map(|s| s.trim().to_string())
                .ok_or_else(|| anyhow::anyhow!("DESTINATION_ACCOUNT must be set"))?,
            storage_backend: var("STORAGE_BACKEND")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(StorageBackend::Azure),
            storage_endpoint_suffix: var("STORAGE_ENDPOINT_SUFFIX")
                .unwrap_or_else(|| STORAGE_ENDPOINT_SUFFIX.to_string()),
            storage_endpoint: var("STORAGE_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            failure_policy: var("RELAY_FAILURE_POLICY")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or_default(),
            secret_env_prefix: var("SECRET_ENV_PREFIX")
                .unwrap_or_else(|| SECRET_ENV_PREFIX.to_string()),
            max_event_body_bytes: var("MAX_EVENT_BODY_BYTES")
                .unwrap_or_else(|| MAX_EVENT_BODY_BYTES.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_EVENT_BODY_BYTES must be a valid number"))?,
            log_format: var("LOG_FORMAT")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.destination_account.contains(['.', '/']) {
            return Err(anyhow::anyhow!(
                "DESTINATION_ACCOUNT must be an account name, not a host or URL"
            ));
        }

        if self.max_event_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_EVENT_BODY_BYTES must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::Azure => {
                if let Some(endpoint) = &self.storage_endpoint {
                    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                        return Err(anyhow::anyhow!(
                            "STORAGE_ENDPOINT must start with http:// or https://"
                        ));
                    }
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
