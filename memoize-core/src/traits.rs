//! Common traits for memoize.
//!
//! These traits define the retrieval seams that fetch functions wrap,
//! enabling the cache to be exercised against real or simulated backends.

use crate::error::Result;
use crate::types::Profile;

// ═══════════════════════════════════════════════════════════════════════════════
// PROFILE SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for retrieving a profile from its system of record.
///
/// Calls are blocking and potentially slow. Implementations are invoked
/// from background refresh threads, so they must be `Send + Sync` and must
/// bound their own worst-case latency: a refresh, once started, is never
/// cancelled.
///
/// Implementations might use:
/// - A remote HTTP service (production)
/// - A fixed or simulated dataset (development/testing)
pub trait ProfileSource: Send + Sync {
    /// Retrieves the profile identified by `id`.
    fn fetch_profile(&self, id: &str) -> Result<Profile>;

    /// Human-readable name of the source, used in logs.
    fn name(&self) -> &str {
        "profile-source"
    }
}
