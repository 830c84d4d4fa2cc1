//! The externally owned store record.

use serde::{Deserialize, Serialize};

use super::{Cache, Ttl};
use crate::constants::{DEFAULT_KEY, DEFAULT_OFFSET};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Cache contents plus the timing metadata that drives expiry and staleness.
///
/// The caller owns the store; a tracker borrows it and mutates fields in
/// place. Fields left unset are filled in when the tracker is constructed:
/// `expires` becomes the epoch and `cache` becomes an empty sequence.
///
/// # Example
/// ```
/// use cacheable_core::{Store, Ttl};
///
/// let store: Store = Store::new()
///     .with_key("users")
///     .with_ttl("10m".parse::<Ttl>().unwrap());
/// assert_eq!(store.offset, 0.65);
/// assert!(store.expires.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Store<T = serde_json::Value> {
    /// Label used in log output
    pub key: String,
    /// Expiry window
    pub ttl: Ttl,
    /// Fraction of `ttl` after which the store reads as stale
    pub offset: f64,
    /// Cached payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<Cache<T>>,
    /// Time of the last reset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<Timestamp>,
    /// Time at which the store expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<Timestamp>,
    /// Time at which the store turns stale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale: Option<Timestamp>,
}

impl<T> Store<T> {
    /// Creates a store with the default key, TTL and offset.
    pub fn new() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            ttl: Ttl::default(),
            offset: DEFAULT_OFFSET,
            cache: None,
            ts: None,
            expires: None,
            stale: None,
        }
    }

    /// Sets the log label.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the expiry window.
    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the staleness offset. Not validated.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Seeds the cache contents.
    pub fn with_cache(mut self, cache: impl Into<Cache<T>>) -> Self {
        self.cache = Some(cache.into());
        self
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
