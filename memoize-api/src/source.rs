//! Simulated profile backend.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use memoize_core::error::{MemoizeError, Result};
use memoize_core::traits::ProfileSource;
use memoize_core::types::Profile;

/// Profile source that derives profiles from their id after a fixed delay.
///
/// Stands in for a slow remote profile service. It can be switched into
/// an outage mode where every call fails.
#[derive(Debug, Default)]
pub struct SimulatedProfileSource {
    latency: Duration,
    calls: AtomicU64,
    failing: AtomicBool,
}

impl SimulatedProfileSource {
    /// Creates a source that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that sleeps `latency` before every answer.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Number of `fetch_profile` calls served so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ProfileSource for SimulatedProfileSource {
    fn fetch_profile(&self, id: &str) -> Result<Profile> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(id, call, "simulated profile fetch");

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(MemoizeError::source_unavailable(id, "simulated outage"));
        }

        let id = id.trim();
        if id.is_empty() {
            return Err(MemoizeError::ProfileNotFound(id.into()));
        }

        Ok(Profile::new(
            format!("user{id}"),
            format!("https://profiles.example.com/{id}"),
            format!("User {id}"),
        ))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_derived_from_id() {
        let source = SimulatedProfileSource::new();
        let profile = source.fetch_profile("123").unwrap();
        assert_eq!(profile.login, "user123");
        assert_eq!(profile.web, "https://profiles.example.com/123");
        assert_eq!(profile.name, "User 123");
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_empty_id_not_found() {
        let source = SimulatedProfileSource::new();
        assert!(matches!(
            source.fetch_profile("  "),
            Err(MemoizeError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_outage_mode() {
        let source = SimulatedProfileSource::new();
        source.set_failing(true);
        let err = source.fetch_profile("123").unwrap_err();
        assert!(matches!(err, MemoizeError::SourceUnavailable { .. }));

        source.set_failing(false);
        assert!(source.fetch_profile("123").is_ok());
        assert_eq!(source.calls(), 2);
    }
}
