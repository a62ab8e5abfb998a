//! Cache configuration and statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use memoize_core::constants::DEFAULT_CACHE_NAME;

/// Cache configuration.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Name used in log fields and background thread names
    pub name: String,
}

impl CacheConfig {
    /// Creates a configuration with the given cache name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CACHE_NAME.into(),
        }
    }
}

/// Cache statistics.
///
/// Fresh hits are not counted so the read path stays free of shared writes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Calls answered with an expired memo
    pub stale_hits: u64,
    /// Calls that found the slot empty and waited for a fetch
    pub cold_loads: u64,
    /// Fetch function invocations
    pub fetches: u64,
    /// Fetches skipped because the slot was refreshed while waiting for the lock
    pub skipped_fetches: u64,
    /// Fetch results dropped because the cache was invalidated meanwhile
    pub discarded_installs: u64,
    /// Calls to `invalidate_cache`
    pub invalidations: u64,
    /// Whether the slot currently holds a memo
    pub cached: bool,
    /// Whether a refresh owner currently exists
    pub refreshing: bool,
}

#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    pub(crate) stale_hits: AtomicU64,
    pub(crate) cold_loads: AtomicU64,
    pub(crate) fetches: AtomicU64,
    pub(crate) skipped_fetches: AtomicU64,
    pub(crate) discarded_installs: AtomicU64,
    pub(crate) invalidations: AtomicU64,
}

impl StatCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, cached: bool, refreshing: bool) -> CacheStats {
        CacheStats {
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            cold_loads: self.cold_loads.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            skipped_fetches: self.skipped_fetches.load(Ordering::Relaxed),
            discarded_installs: self.discarded_installs.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            cached,
            refreshing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_name() {
        assert_eq!(CacheConfig::default().name, DEFAULT_CACHE_NAME);
        assert_eq!(CacheConfig::named("profile").name, "profile");
    }

    #[test]
    fn test_snapshot_reads_counters() {
        let counters = StatCounters::default();
        StatCounters::bump(&counters.stale_hits);
        StatCounters::bump(&counters.stale_hits);
        StatCounters::bump(&counters.fetches);

        let stats = counters.snapshot(true, false);
        assert_eq!(stats.stale_hits, 2);
        assert_eq!(stats.fetches, 1);
        assert_eq!(stats.cold_loads, 0);
        assert!(stats.cached);
        assert!(!stats.refreshing);
    }
}
