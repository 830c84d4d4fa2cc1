//! Point-in-time view of a store's state.

use std::fmt;

use serde::{Deserialize, Serialize};

use cacheable_core::constants::MS_PER_SECOND;
use cacheable_core::Timestamp;

/// Where a store sits in the FRESH → STALE → EXPIRED cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Neither stale nor expired
    Fresh,
    /// Past the stale threshold, still usable
    Stale,
    /// Past expiry, or holding nothing
    Expired,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Fresh => "FRESH",
            Phase::Stale => "STALE",
            Phase::Expired => "EXPIRED",
        })
    }
}

/// Fields of the debug line for one store at one instant.
///
/// `Display` renders the `field:value:` line that `debug()` logs:
///
/// ```text
/// key:testCache:isStale:false:isExpired:false:cacheSize:1:expiresInSecs:1:staleInSecs:1:
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheReport {
    /// Store label
    pub key: String,
    /// Whether the store is stale
    pub is_stale: bool,
    /// Whether the store is expired
    pub is_expired: bool,
    /// Number of cached elements
    pub cache_size: usize,
    /// Seconds until expiry, negative once passed
    pub expires_in_secs: Option<i64>,
    /// Seconds until staleness, negative once passed; `None` before the first reset
    pub stale_in_secs: Option<i64>,
}

impl CacheReport {
    /// Phase implied by the two flags.
    pub fn phase(&self) -> Phase {
        if self.is_expired {
            Phase::Expired
        } else if self.is_stale {
            Phase::Stale
        } else {
            Phase::Fresh
        }
    }
}

impl fmt::Display for CacheReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key:{}:isStale:{}:isExpired:{}:cacheSize:{}:expiresInSecs:{}:staleInSecs:{}:",
            self.key,
            self.is_stale,
            self.is_expired,
            self.cache_size,
            OptSecs(self.expires_in_secs),
            OptSecs(self.stale_in_secs),
        )
    }
}

struct OptSecs(Option<i64>);

impl fmt::Display for OptSecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(secs) => write!(f, "{secs}"),
            None => f.write_str("none"),
        }
    }
}

/// Whole seconds from `now` until `target`, rounding halves toward +∞.
pub fn secs_until(target: Timestamp, now: Timestamp) -> i64 {
    target
        .saturating_sub(now)
        .saturating_add(MS_PER_SECOND / 2)
        .div_euclid(MS_PER_SECOND)
}
