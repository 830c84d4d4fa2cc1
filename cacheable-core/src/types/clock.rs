//! Clock implementations.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::Timestamp;
use crate::traits::Clock;

/// Wall-clock time via `chrono::Utc`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle
/// while a tracker owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start)),
        }
    }

    /// Creates a clock frozen at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now())
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        self.millis.store(now, Ordering::SeqCst);
    }

    /// Moves the clock forward by `millis` and returns the new time.
    pub fn advance(&self, millis: i64) -> Timestamp {
        self.millis.fetch_add(millis, Ordering::SeqCst) + millis
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Converts a millisecond timestamp into a UTC datetime, if representable.
pub fn to_datetime(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now() > 1_577_836_800_000);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();

        assert_eq!(handle.advance(650), 1_650);
        assert_eq!(clock.now(), 1_650);

        clock.set(0);
        assert_eq!(handle.now(), 0);
    }

    #[test]
    fn test_to_datetime() {
        let dt = to_datetime(0).unwrap();
        assert_eq!(dt.to_rfc3339(), "1970-01-01T00:00:00+00:00");
        assert!(to_datetime(i64::MAX).is_none());
    }
}
