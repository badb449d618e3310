use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Service endpoints that belong to neither store.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Used by monitoring and load balancer checks.
        .route("/health", get(handlers::health))
}
