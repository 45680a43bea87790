//! Relay API Library
//!
//! This crate provides the webhook handler, health probes and server setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
