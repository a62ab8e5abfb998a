//! Immutable cached values with an expiration instant.

use std::time::{Duration, Instant};

/// Deadline offset used when `now + ttl` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A computed value paired with the instant it stops being fresh.
///
/// A `Memo` is never mutated: refreshing a cache means building a new
/// `Memo` and replacing the old one wholesale.
#[derive(Clone, Debug)]
pub struct Memo<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Memo<T> {
    /// Wraps `value`, valid for `ttl` from now.
    ///
    /// A zero `ttl` yields a memo that is already expired. A `ttl` too large
    /// to add to the current instant, such as `Duration::MAX`, is clamped to
    /// roughly a century.
    pub fn new(value: T, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self::with_deadline(value, expires_at)
    }

    /// Wraps `value` with an explicit expiration instant.
    pub fn with_deadline(value: T, expires_at: Instant) -> Self {
        Self { value, expires_at }
    }

    /// Wraps `value` as already expired.
    ///
    /// The next cache access serves it as stale and schedules a refresh.
    pub fn expired(value: T) -> Self {
        Self::with_deadline(value, Instant::now())
    }

    /// Returns true until the expiration instant is reached.
    pub fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }

    /// Returns the stored value, whether or not it has expired.
    pub fn cached_value(&self) -> &T {
        &self.value
    }

    /// Consumes the memo and returns the stored value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the expiration instant.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns the time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
