//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use relay_core::Config;
use relay_services::{CopyOrchestrator, EnvSecretStore, SecretStore};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        destination_account = %config.destination_account,
        failure_policy = %config.failure_policy,
        "Configuration loaded and validated successfully"
    );

    let secrets: Arc<dyn SecretStore> =
        Arc::new(EnvSecretStore::new(config.secret_env_prefix.clone()));
    let state = build_state(config.clone(), secrets);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Build shared state around the given secret store.
pub fn build_state(config: Config, secrets: Arc<dyn SecretStore>) -> Arc<AppState> {
    let orchestrator = CopyOrchestrator::from_config(&config, secrets);
    Arc::new(AppState::new(config, orchestrator))
}
