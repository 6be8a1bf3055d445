use std::sync::Arc;

use docproc_core::DocumentConverter;

/// Shared application state accessible from all handlers.
///
/// The converter is constructed once at startup and shared read-only
/// across requests; handlers never mutate state.
pub struct AppState {
    pub converter: Arc<dyn DocumentConverter>,
    /// Static bearer token the `/extract` endpoint compares against.
    pub api_key: String,
    /// Outbound client for callback delivery.
    pub http: reqwest::Client,
}
