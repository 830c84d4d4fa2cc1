//! Tracker configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Store, Ttl};
use crate::constants::{DEFAULT_KEY, DEFAULT_OFFSET, DEFAULT_VERBOSE};
use crate::error::{CacheableError, Result};

/// Settings used to build a [`Store`] and its tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheableConfig {
    /// Log label for the store
    pub key: String,
    /// Expiry window (e.g. `"3h"`)
    pub ttl: Ttl,
    /// Fraction of the window after which the store is stale
    pub offset: f64,
    /// Whether `state()` emits the debug line
    pub verbose: bool,
}

impl Default for CacheableConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            ttl: Ttl::default(),
            offset: DEFAULT_OFFSET,
            verbose: DEFAULT_VERBOSE,
        }
    }
}

impl CacheableConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Rejects settings the tracker would silently accept.
    ///
    /// Stores built directly are never validated; this is the opt-in guard.
    pub fn validate(&self) -> Result<()> {
        if !self.offset.is_finite() || !(0.0..=1.0).contains(&self.offset) {
            return Err(CacheableError::InvalidOffset(self.offset));
        }
        if self.key.trim().is_empty() {
            return Err(CacheableError::ConfigError("key must not be empty".into()));
        }
        if self.ttl.as_millis() <= 0 {
            return Err(CacheableError::ConfigError(format!(
                "ttl must be positive, got {}",
                self.ttl
            )));
        }
        Ok(())
    }

    /// Builds an empty store from these settings.
    pub fn into_store<T>(self) -> Store<T> {
        Store::new()
            .with_key(self.key)
            .with_ttl(self.ttl)
            .with_offset(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default_is_valid() {
        let config = CacheableConfig::default();
        assert_eq!(config.key, "cacheable");
        assert_eq!(config.ttl.to_string(), "3h");
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json() {
        let config = CacheableConfig::from_json_str(r#"{ "ttl": "1s", "verbose": true }"#).unwrap();
        assert_eq!(config.ttl, Ttl::from_secs(1));
        assert_eq!(config.offset, 0.65);
        assert!(config.verbose);
    }

    #[test]
    fn test_config_validate_offset() {
        for offset in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let config = CacheableConfig {
                offset,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(CacheableError::InvalidOffset(_))
            ));
        }

        let edge = CacheableConfig {
            offset: 1.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_config_validate_key_and_ttl() {
        let config = CacheableConfig {
            key: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_config_error());

        let config = CacheableConfig {
            ttl: Ttl::from_millis(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "key": "users", "ttl": "10m", "offset": 0.5 }}"#).unwrap();

        let config = CacheableConfig::from_file(file.path()).unwrap();
        assert_eq!(config.key, "users");
        assert_eq!(config.ttl.as_millis(), 600_000);

        let missing = CacheableConfig::from_file("/nonexistent/cacheable.json");
        assert!(matches!(missing, Err(CacheableError::IoError(_))));
    }

    #[test]
    fn test_config_into_store() {
        let config = CacheableConfig {
            key: "users".into(),
            ttl: Ttl::from_secs(5),
            offset: 0.25,
            verbose: true,
        };
        let store: Store = config.into_store();
        assert_eq!(store.key, "users");
        assert_eq!(store.ttl.as_millis(), 5_000);
        assert_eq!(store.offset, 0.25);
        assert!(store.cache.is_none());
    }
}
