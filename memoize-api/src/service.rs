//! Memoized profile retrieval.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use memoize_cache::{CacheStats, Memo, SafeMemoize};
use memoize_core::traits::ProfileSource;
use memoize_core::types::Profile;

/// Serves profiles from a [`ProfileSource`] through a single memoized slot.
///
/// The slot is not keyed: every id shares it, and the id only matters for
/// whichever call ends up performing the fetch.
///
/// A failed fetch is cached as `None` for `error_ttl`, so callers see the
/// failure as an absent profile and the source is retried soon after.
#[derive(Clone)]
pub struct ProfileService {
    memo: SafeMemoize<Option<Profile>>,
    source: Arc<dyn ProfileSource>,
    ttl: Duration,
    error_ttl: Duration,
    enabled: bool,
}

impl ProfileService {
    /// Creates a caching service over `source`.
    pub fn new(source: Arc<dyn ProfileSource>, ttl: Duration, error_ttl: Duration) -> Self {
        Self {
            memo: SafeMemoize::named("profile"),
            source,
            ttl,
            error_ttl,
            enabled: true,
        }
    }

    /// Bypasses the cache: every call goes straight to the source.
    pub fn no_cache(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Returns the profile for `id`, or `None` if the source failed.
    ///
    /// Blocks only on a cold cache (or always, when caching is disabled).
    pub fn fetch_profile(&self, id: &str) -> Option<Profile> {
        if !self.enabled {
            return load(self.source.as_ref(), id);
        }

        let source = Arc::clone(&self.source);
        let id = id.to_owned();
        let (ttl, error_ttl) = (self.ttl, self.error_ttl);

        self.memo.value(move || match load(source.as_ref(), &id) {
            Some(profile) => Memo::new(Some(profile), ttl),
            None => Memo::new(None, error_ttl),
        })
    }

    /// Drops the cached profile.
    pub fn invalidate(&self) {
        self.memo.invalidate_cache();
    }

    /// Returns statistics for the underlying cache.
    pub fn stats(&self) -> CacheStats {
        self.memo.stats()
    }

    /// Returns the name of the underlying cache.
    pub fn cache_name(&self) -> &str {
        self.memo.name()
    }
}

fn load(source: &dyn ProfileSource, id: &str) -> Option<Profile> {
    match source.fetch_profile(id) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(source = source.name(), id, error = %e, "Profile fetch failed");
            None
        }
    }
}
