//! App state: profile service, config.

use std::sync::Arc;
use std::time::Duration;

use memoize_core::constants::{DEFAULT_ERROR_TTL, DEFAULT_PROFILE_ID, DEFAULT_PROFILE_TTL};
use memoize_core::error::{MemoizeError, Result};
use memoize_core::traits::ProfileSource;

use crate::service::ProfileService;
use crate::source::SimulatedProfileSource;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub profile_id: String,
    pub profile_ttl: Duration,
    pub error_ttl: Duration,
    pub source_latency: Duration,
    pub enable_cache: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            profile_id: DEFAULT_PROFILE_ID.into(),
            profile_ttl: DEFAULT_PROFILE_TTL,
            error_ttl: DEFAULT_ERROR_TTL,
            source_latency: Duration::ZERO,
            enable_cache: true,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the process environment and `.env`.
    ///
    /// Unset variables fall back to defaults; malformed ones are rejected.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            profile_id: lookup("PROFILE_ID").unwrap_or(defaults.profile_id),
            profile_ttl: parse_duration(&lookup, "PROFILE_TTL_SECS", Duration::from_secs)?
                .unwrap_or(defaults.profile_ttl),
            error_ttl: parse_duration(&lookup, "PROFILE_ERROR_TTL_SECS", Duration::from_secs)?
                .unwrap_or(defaults.error_ttl),
            source_latency: parse_duration(
                &lookup,
                "PROFILE_SOURCE_LATENCY_MS",
                Duration::from_millis,
            )?
            .unwrap_or(defaults.source_latency),
            enable_cache: lookup("ENABLE_CACHE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enable_cache),
        })
    }
}

fn parse_duration(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    unit: fn(u64) -> Duration,
) -> Result<Option<Duration>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|n| Some(unit(n)))
        .map_err(|e| MemoizeError::ConfigError(format!("{key}={raw:?}: {e}")))
}

pub struct AppState {
    pub config: ApiConfig,
    pub profiles: ProfileService,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        let source = Arc::new(SimulatedProfileSource::with_latency(config.source_latency));
        Self::with_source(config, source)
    }

    pub fn with_source(config: ApiConfig, source: Arc<dyn ProfileSource>) -> Self {
        let mut profiles = ProfileService::new(source, config.profile_ttl, config.error_ttl);

        if !config.enable_cache {
            profiles = profiles.no_cache();
        }

        Self { config, profiles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.profile_id, "123");
        assert_eq!(config.profile_ttl, Duration::from_secs(600));
        assert!(config.enable_cache);
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_config_from_vars() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PROFILE_ID", "42"),
            ("PROFILE_TTL_SECS", " 30 "),
            ("PROFILE_SOURCE_LATENCY_MS", "15"),
            ("ENABLE_CACHE", "false"),
        ]))
        .unwrap();

        assert_eq!(config.profile_id, "42");
        assert_eq!(config.profile_ttl, Duration::from_secs(30));
        assert_eq!(config.error_ttl, DEFAULT_ERROR_TTL);
        assert_eq!(config.source_latency, Duration::from_millis(15));
        assert!(!config.enable_cache);
    }

    #[test]
    fn test_malformed_duration_is_config_error() {
        let err = ApiConfig::from_lookup(lookup(&[("PROFILE_TTL_SECS", "ten")])).unwrap_err();
        assert!(matches!(err, MemoizeError::ConfigError(_)));
        assert!(err.to_string().contains("PROFILE_TTL_SECS"));
    }

    #[test]
    fn test_max_ttl_serves_from_cache() {
        let config = ApiConfig::from_lookup(lookup(&[(
            "PROFILE_TTL_SECS",
            "18446744073709551615",
        )]))
        .unwrap();
        let source = Arc::new(SimulatedProfileSource::new());
        let state = AppState::with_source(config, source.clone());

        assert!(state.profiles.fetch_profile("123").is_some());
        assert!(state.profiles.fetch_profile("123").is_some());
        assert_eq!(source.calls(), 1);
    }
}
