//! Common traits for cacheable.

use std::sync::Arc;

use crate::types::Timestamp;

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the "current time" used whenever a caller does not pass `now`.
///
/// Implementations:
/// - [`SystemClock`](crate::SystemClock): wall-clock time
/// - [`ManualClock`](crate::ManualClock): caller-driven time for tests and simulations
pub trait Clock {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Timestamp);

    impl Clock for Fixed {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    #[test]
    fn test_clock_through_pointers() {
        let fixed = Fixed(42);
        assert_eq!((&fixed).now(), 42);
        assert_eq!(Arc::new(Fixed(7)).now(), 7);

        let boxed: Box<dyn Clock> = Box::new(Fixed(9));
        assert_eq!(boxed.now(), 9);
    }
}
