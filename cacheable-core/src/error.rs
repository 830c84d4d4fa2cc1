//! Error types for cacheable.
//!
//! Tracker operations never fail. Errors only surface at the edges: parsing
//! TTL strings, mixing container kinds, and loading configuration.

use thiserror::Error;

use crate::types::CacheKind;

/// Result type alias using `CacheableError`.
pub type Result<T> = std::result::Result<T, CacheableError>;

/// Main error type for all cacheable operations.
#[derive(Debug, Error)]
pub enum CacheableError {
    // ═══════════════════════════════════════════════════════════════════════════
    // PARSE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// TTL string could not be parsed into a duration.
    #[error("Invalid TTL '{input}': {reason}")]
    InvalidTtl { input: String, reason: String },

    /// Staleness offset outside of [0, 1].
    #[error("Invalid offset {0}: must be a finite fraction in [0, 1]")]
    InvalidOffset(f64),

    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Operation requires a different container kind.
    #[error("Cache kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: CacheKind, actual: CacheKind },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION / STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CacheableError {
    /// Returns true if this error came from parsing user input.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CacheableError::InvalidTtl { .. }
                | CacheableError::InvalidOffset(_)
                | CacheableError::JsonError(_)
        )
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CacheableError::ConfigError(_)
                | CacheableError::InvalidOffset(_)
                | CacheableError::InvalidTtl { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheableError::InvalidTtl {
            input: "3 fortnights".into(),
            reason: "unknown unit 'fortnights'".into(),
        };
        assert!(err.to_string().contains("3 fortnights"));
        assert!(err.to_string().contains("fortnights'"));

        let err = CacheableError::KindMismatch {
            expected: CacheKind::Sequence,
            actual: CacheKind::Mapping,
        };
        assert_eq!(
            err.to_string(),
            "Cache kind mismatch: expected sequence, got mapping"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(CacheableError::InvalidOffset(1.5).is_parse_error());
        assert!(CacheableError::InvalidOffset(1.5).is_config_error());
        assert!(CacheableError::ConfigError("empty key".into()).is_config_error());
        assert!(!CacheableError::ConfigError("empty key".into()).is_parse_error());

        let mismatch = CacheableError::KindMismatch {
            expected: CacheKind::Mapping,
            actual: CacheKind::Sequence,
        };
        assert!(!mismatch.is_parse_error());
        assert!(!mismatch.is_config_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let result: Result<serde_json::Value> = json_result.map_err(CacheableError::from);
        assert!(matches!(result, Err(CacheableError::JsonError(_))));
    }
}
