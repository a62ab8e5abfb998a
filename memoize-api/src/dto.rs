//! DTOs for API responses.

use serde::Serialize;

use memoize_cache::CacheStats;
use memoize_core::types::Profile;

/// Response for `GET /profile`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Account login handle
    pub login: String,
    /// Personal web page
    pub web: String,
    /// Display name
    pub name: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            login: p.login,
            web: p.web,
            name: p.name,
        }
    }
}

/// Response for `GET /profile/cache/stats`.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    /// Cache name
    pub cache: String,
    /// Counters and current state
    #[serde(flatten)]
    pub stats: CacheStats,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Whether the profile slot is populated
    pub profile_cached: bool,
}
