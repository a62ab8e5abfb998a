//! Concurrency-safe single-slot memoization.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tracing::{debug, warn};

use memoize_core::constants::REFRESH_THREAD_PREFIX;

use crate::config::{CacheConfig, CacheStats, StatCounters};
use crate::memo::Memo;

/// A single memoized slot with stale-while-revalidate refresh.
///
/// Callers ask for the current value through [`SafeMemoize::value`],
/// supplying the fetch function that computes a fresh [`Memo`]:
///
/// - a valid memo is returned without taking any lock;
/// - an expired memo is returned immediately while exactly one caller
///   schedules a refresh on a background thread;
/// - an empty slot blocks the caller until the first fetch completes.
///
/// The fetch function runs at most once at a time per instance.
///
/// # Ownership
///
/// Construct one instance per cached resource at startup and hand it to
/// whatever needs it. Clones are cheap handles onto the same slot.
///
/// # Invalidation
///
/// [`SafeMemoize::invalidate_cache`] wins over a refresh that is already
/// running: the refresh result is discarded rather than repopulating the
/// slot.
pub struct SafeMemoize<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    config: CacheConfig,
    slot: ArcSwapOption<Memo<T>>,
    /// Set by the single caller that owns the next fetch.
    refresh_in_flight: AtomicBool,
    /// Serializes fetch-and-install. Never taken on the read path.
    fetch_lock: Mutex<()>,
    /// Bumped on every invalidation; fetches started under an older
    /// generation do not install.
    generation: AtomicU64,
    counters: StatCounters,
}

/// Ownership of the refresh gate. Releases it on drop, including when the
/// fetch function panics or the refresh thread cannot be spawned.
struct RefreshTicket<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Drop for RefreshTicket<T> {
    fn drop(&mut self) {
        self.shared.refresh_in_flight.store(false, Ordering::SeqCst);
    }
}

impl<T> SafeMemoize<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates an empty cache with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_config(CacheConfig::named(name))
    }

    /// Creates an empty cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                slot: ArcSwapOption::empty(),
                refresh_in_flight: AtomicBool::new(false),
                fetch_lock: Mutex::new(()),
                generation: AtomicU64::new(0),
                counters: StatCounters::default(),
            }),
        }
    }

    /// Returns the cached value, fetching it if needed.
    ///
    /// `fetch` is only called when the slot is empty or expired, and only
    /// by the caller that owns the refresh. It may run on a background
    /// thread, so it must not touch the cache itself.
    ///
    /// Blocks only when the slot is empty.
    pub fn value<F>(&self, fetch: F) -> T
    where
        F: FnOnce() -> Memo<T> + Send + 'static,
    {
        let shared = &self.shared;
        let stale = {
            let current = shared.slot.load();
            match &*current {
                Some(memo) if memo.is_valid() => return memo.cached_value().clone(),
                Some(memo) => Some(memo.cached_value().clone()),
                None => None,
            }
        };

        let ticket = shared
            .refresh_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then(|| RefreshTicket {
                shared: Arc::clone(shared),
            });

        match stale {
            None => {
                StatCounters::bump(&shared.counters.cold_loads);
                debug!(cache = %shared.config.name, "slot empty, fetching synchronously");
                let generation = shared.generation.load(Ordering::SeqCst);
                let memo = shared.fetch_and_install(fetch, generation, ticket);
                memo.cached_value().clone()
            }
            Some(stale) => {
                StatCounters::bump(&shared.counters.stale_hits);
                if let Some(ticket) = ticket {
                    self.spawn_refresh(fetch, ticket);
                }
                stale
            }
        }
    }

    /// Empties the slot.
    ///
    /// A refresh already in flight still runs to completion, but its result
    /// is not installed. Invalidating an empty cache leaves it empty.
    pub fn invalidate_cache(&self) {
        let shared = &self.shared;
        shared.generation.fetch_add(1, Ordering::SeqCst);
        shared.slot.store(None);
        StatCounters::bump(&shared.counters.invalidations);
        debug!(cache = %shared.config.name, "cache invalidated");
    }

    fn spawn_refresh<F>(&self, fetch: F, ticket: RefreshTicket<T>)
    where
        F: FnOnce() -> Memo<T> + Send + 'static,
    {
        let name = &self.shared.config.name;
        let generation = self.shared.generation.load(Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);

        debug!(cache = %name, generation, "spawning background refresh");

        let spawned = thread::Builder::new()
            .name(format!("{REFRESH_THREAD_PREFIX}-{name}"))
            .spawn(move || {
                shared.fetch_and_install(fetch, generation, Some(ticket));
            });

        // On failure the closure, and with it the ticket, is dropped, so the
        // next caller on the expired slot retries.
        if let Err(e) = spawned {
            warn!(cache = %name, error = %e, "Failed to spawn background refresh");
        }
    }
}

impl<T> SafeMemoize<T> {
    /// Returns the configured cache name.
    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    /// Returns true if the slot holds a memo, fresh or expired.
    pub fn is_cached(&self) -> bool {
        self.shared.slot.load().is_some()
    }

    /// Returns true while some caller owns a pending or running fetch.
    pub fn is_refreshing(&self) -> bool {
        self.shared.refresh_in_flight.load(Ordering::SeqCst)
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared
            .counters
            .snapshot(self.is_cached(), self.is_refreshing())
    }
}

impl<T> Shared<T> {
    /// Runs `fetch` under the lock and installs its result.
    ///
    /// Skips the fetch if another thread installed a valid memo while this
    /// one was waiting for the lock. The install is dropped if the cache was
    /// invalidated since `generation` was read; the fetched memo is still
    /// returned to the caller.
    fn fetch_and_install<F>(
        &self,
        fetch: F,
        generation: u64,
        ticket: Option<RefreshTicket<T>>,
    ) -> Arc<Memo<T>>
    where
        F: FnOnce() -> Memo<T>,
    {
        let guard = self.fetch_lock.lock();

        if let Some(memo) = self.slot.load_full() {
            if memo.is_valid() {
                StatCounters::bump(&self.counters.skipped_fetches);
                debug!(cache = %self.config.name, "slot refreshed while waiting, skipping fetch");
                drop(ticket);
                drop(guard);
                return memo;
            }
        }

        StatCounters::bump(&self.counters.fetches);
        let memo = Arc::new(fetch());

        if self.generation.load(Ordering::SeqCst) == generation {
            self.slot.store(Some(Arc::clone(&memo)));
            self.retract_if_invalidated(&memo, generation);
        } else {
            self.discard(generation);
        }

        drop(ticket);
        drop(guard);
        memo
    }

    /// Removes `memo` from the slot if an invalidation raced its store.
    fn retract_if_invalidated(&self, memo: &Arc<Memo<T>>, generation: u64) {
        if self.generation.load(Ordering::SeqCst) == generation {
            return;
        }
        // The swap only fails when the slot no longer holds `memo`, which
        // already leaves it uninstalled.
        let _ = self.slot.compare_and_swap(memo, None::<Arc<Memo<T>>>);
        self.discard(generation);
    }

    fn discard(&self, generation: u64) {
        StatCounters::bump(&self.counters.discarded_installs);
        debug!(
            cache = %self.config.name,
            generation,
            "cache invalidated during fetch, discarding result"
        );
    }
}

impl<T> Clone for SafeMemoize<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for SafeMemoize<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SafeMemoize<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeMemoize")
            .field("name", &self.shared.config.name)
            .field("cached", &self.is_cached())
            .field("refreshing", &self.is_refreshing())
            .field("generation", &self.shared.generation.load(Ordering::Relaxed))
            .finish()
    }
}
