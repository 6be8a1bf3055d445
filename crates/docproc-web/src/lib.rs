use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

pub mod auth;
pub mod callback;
pub mod handlers;
pub mod models;
pub mod state;
pub mod upload;

use state::AppState;

/// Build the service router. Split out of `main` so integration tests
/// can drive the service in-process with an injected converter.
pub fn app(state: Arc<AppState>) -> Router {
    // Allow large file uploads (50MB)
    let body_limit = DefaultBodyLimit::max(50 * 1024 * 1024);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/extract", post(handlers::extract::extract))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
