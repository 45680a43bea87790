//! Application state shared by all handlers.

use relay_core::Config;
use relay_services::CopyOrchestrator;

/// Immutable per-process state. Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: CopyOrchestrator,
}

impl AppState {
    pub fn new(config: Config, orchestrator: CopyOrchestrator) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}
