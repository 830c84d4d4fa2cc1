//! Default settings and time units for cacheable.

use crate::types::Timestamp;

// ═══════════════════════════════════════════════════════════════════════════════
// STORE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Key used to label a store in log output when none is given.
pub const DEFAULT_KEY: &str = "cacheable";

/// Default time-to-live, in humanized form.
pub const DEFAULT_TTL: &str = "3h";

/// Default time-to-live in milliseconds (3 hours).
pub const DEFAULT_TTL_MILLIS: i64 = 3 * MS_PER_HOUR;

/// Fraction of the TTL window after which a store is considered stale.
pub const DEFAULT_OFFSET: f64 = 0.65;

/// Whether `state()` logs the debug line by default.
pub const DEFAULT_VERBOSE: bool = false;

/// Expiry assigned to a store that has never been reset.
/// The epoch forces the first `state()` call to treat the store as expired.
pub const INITIAL_EXPIRES: Timestamp = 0;

// ═══════════════════════════════════════════════════════════════════════════════
// LOGGING
// ═══════════════════════════════════════════════════════════════════════════════

/// `tracing` target for the per-store debug line.
pub const LOG_TARGET: &str = "cacheable";

// ═══════════════════════════════════════════════════════════════════════════════
// TIME UNITS (milliseconds)
// ═══════════════════════════════════════════════════════════════════════════════

/// Milliseconds per second.
pub const MS_PER_SECOND: i64 = 1_000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;

/// Milliseconds per hour.
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Milliseconds per day.
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Milliseconds per week.
pub const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Milliseconds per year (365.25 days).
pub const MS_PER_YEAR: i64 = MS_PER_DAY * 365 + MS_PER_DAY / 4;

/// Longest TTL string accepted by the parser.
pub const MAX_TTL_INPUT_LEN: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_matches_millis() {
        assert_eq!(DEFAULT_TTL_MILLIS, 10_800_000);
        assert_eq!(DEFAULT_TTL.parse::<crate::Ttl>().unwrap().as_millis(), DEFAULT_TTL_MILLIS);
    }

    #[test]
    fn test_unit_ladder() {
        assert_eq!(MS_PER_DAY, 86_400_000);
        assert_eq!(MS_PER_WEEK, 604_800_000);
        assert_eq!(MS_PER_YEAR, 31_557_600_000);
    }

    #[test]
    fn test_default_offset_is_fraction() {
        assert!((0.0..=1.0).contains(&DEFAULT_OFFSET));
    }
}
