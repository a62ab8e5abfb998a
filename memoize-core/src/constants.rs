//! Shared constants for memoize.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default lifetime of a cached profile.
pub const DEFAULT_PROFILE_TTL: Duration = Duration::from_secs(10 * 60);

/// Lifetime of a cached fetch failure.
/// Short so the next caller after it retries the source soon.
pub const DEFAULT_ERROR_TTL: Duration = Duration::from_secs(5);

/// Name used for a cache when none is configured.
pub const DEFAULT_CACHE_NAME: &str = "memoize";

/// Prefix for background refresh thread names.
pub const REFRESH_THREAD_PREFIX: &str = "memoize-refresh";

// ═══════════════════════════════════════════════════════════════════════════════
// API DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Profile id served by `GET /profile`.
pub const DEFAULT_PROFILE_ID: &str = "123";

/// Default API port.
pub const DEFAULT_API_PORT: u16 = 3001;
