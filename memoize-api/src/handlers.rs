//! API route handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /profile
///
/// The cache may block on a cold slot, so the lookup runs on the blocking pool.
pub async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<ProfileResponse>> {
    let lookup = Arc::clone(&state);
    let profile = tokio::task::spawn_blocking(move || {
        lookup.profiles.fetch_profile(&lookup.config.profile_id)
    })
    .await?;

    let Some(profile) = profile else {
        return Err(ApiError::internal("Internal Server Error"));
    };

    debug!(login = %profile.login, "Served profile");
    Ok(Json(ProfileResponse::from(profile)))
}

/// DELETE /profile/cache
pub async fn invalidate_profile(State(state): State<Arc<AppState>>) -> StatusCode {
    state.profiles.invalidate();
    info!(cache = state.profiles.cache_name(), "Profile cache invalidated");
    StatusCode::NO_CONTENT
}

/// GET /profile/cache/stats
pub async fn profile_cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        cache: state.profiles.cache_name().into(),
        stats: state.profiles.stats(),
    })
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
        profile_cached: state.profiles.stats().cached,
    })
}
