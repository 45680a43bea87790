//! API constants

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Versioned API prefix
pub const API_PREFIX: &str = "/api/v0";

/// Webhook path under `API_PREFIX`
pub const BLOB_EVENTS_PATH: &str = "/events/blob";

/// Legacy function-style trigger path, mounted under `API_BASE`
pub const LEGACY_TRIGGER_PATH: &str = "/HandleBlobDeletion";
