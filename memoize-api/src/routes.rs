//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Memoized profile
        .route("/profile", get(handlers::get_profile))
        .route("/profile/cache", delete(handlers::invalidate_profile))
        .route("/profile/cache/stats", get(handlers::profile_cache_stats))

        .with_state(state)
}
