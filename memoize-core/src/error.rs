//! Error types for memoize.
//!
//! The cache itself never fails; these errors belong to the collaborators
//! around it: profile sources, configuration and server I/O.

use thiserror::Error;

/// Result type alias using `MemoizeError`.
pub type Result<T> = std::result::Result<T, MemoizeError>;

/// Main error type for memoize operations.
#[derive(Debug, Error)]
pub enum MemoizeError {
    // ═══════════════════════════════════════════════════════════════════════════
    // SOURCE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The requested profile does not exist at the source.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// The profile source could not produce a value.
    #[error("Profile source unavailable for '{id}': {reason}")]
    SourceUnavailable { id: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERVER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Socket bind or serve failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl MemoizeError {
    /// Creates a `SourceUnavailable` error.
    pub fn source_unavailable(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns a stable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::IoError(_) => "IO_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = MemoizeError::source_unavailable("123", "connection refused");
        assert_eq!(
            err.to_string(),
            "Profile source unavailable for '123': connection refused"
        );
    }

    #[test_case(MemoizeError::ProfileNotFound("x".into()), "PROFILE_NOT_FOUND" ; "not found")]
    #[test_case(MemoizeError::source_unavailable("x", "down"), "SOURCE_UNAVAILABLE" ; "unavailable")]
    #[test_case(MemoizeError::ConfigError("x".into()), "CONFIG_ERROR" ; "config")]
    fn test_error_codes(err: MemoizeError, code: &str) {
        assert_eq!(err.code(), code);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: MemoizeError = io_err.into();
        assert!(matches!(err, MemoizeError::IoError(_)));
        assert_eq!(err.code(), "IO_ERROR");
    }
}
