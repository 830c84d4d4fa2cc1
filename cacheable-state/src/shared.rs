//! Lock-guarded tracker for stores shared across threads.
//!
//! Every operation, reads included, takes the same mutex for its whole
//! duration, so a reader can never observe a store halfway through a
//! flush/reset transition.

use std::sync::Arc;

use parking_lot::Mutex;

use cacheable_core::{Cache, Clock, Store, SystemClock, Timestamp};

use crate::report::{CacheReport, Phase};
use crate::tracker::Cacheable;

/// Thread-safe handle to a store and its tracker settings.
///
/// Clones share the same store.
pub struct SharedCacheable<T = serde_json::Value, C = SystemClock> {
    store: Arc<Mutex<Store<T>>>,
    clock: C,
    verbose: bool,
}

impl<T> SharedCacheable<T> {
    /// Wraps `store` using wall-clock time.
    pub fn new(store: Store<T>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<T, C: Clock> SharedCacheable<T, C> {
    /// Wraps `store` using the given clock.
    pub fn with_clock(store: Store<T>, clock: C) -> Self {
        Self::from_shared(Arc::new(Mutex::new(store)), clock)
    }

    /// Attaches to a store the caller already shares.
    pub fn from_shared(store: Arc<Mutex<Store<T>>>, clock: C) -> Self {
        let shared = Self {
            store,
            clock,
            verbose: false,
        };
        // Apply construction defaults once, up front.
        shared.with_tracker(|_| ());
        shared
    }

    /// Sets whether `state()` logs the debug line.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Runs `f` against a tracker while holding the lock.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&mut Cacheable<'_, T, &C>) -> R) -> R {
        let mut guard = self.store.lock();
        let mut tracker = Cacheable::with_clock(&mut *guard, &self.clock).verbose(self.verbose);
        f(&mut tracker)
    }

    /// Runs `f` against the live cache while holding the lock.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut Cache<T>) -> R) -> R {
        self.with_tracker(|tracker| f(tracker.fetch()))
    }

    /// Number of cached elements.
    pub fn size(&self) -> usize {
        self.with_tracker(|t| t.size())
    }

    /// See [`Cacheable::expired_at`].
    pub fn expired_at(&self, now: Timestamp) -> bool {
        self.with_tracker(|t| t.expired_at(now))
    }

    /// See [`Cacheable::expired`].
    pub fn expired(&self) -> bool {
        self.with_tracker(|t| t.expired())
    }

    /// See [`Cacheable::stale_at`].
    pub fn stale_at(&self, now: Timestamp) -> bool {
        self.with_tracker(|t| t.stale_at(now))
    }

    /// See [`Cacheable::stale`].
    pub fn stale(&self) -> bool {
        self.with_tracker(|t| t.stale())
    }

    /// See [`Cacheable::phase`].
    pub fn phase(&self) -> Phase {
        self.with_tracker(|t| t.phase())
    }

    /// See [`Cacheable::report`].
    pub fn report(&self) -> CacheReport {
        self.with_tracker(|t| t.report())
    }

    /// See [`Cacheable::flush`].
    pub fn flush(&self) -> bool {
        self.with_tracker(|t| t.flush())
    }

    /// See [`Cacheable::reset_at`].
    pub fn reset_at(&self, now: Timestamp) -> bool {
        self.with_tracker(|t| t.reset_at(now))
    }

    /// See [`Cacheable::reset`].
    pub fn reset(&self) -> bool {
        self.with_tracker(|t| t.reset())
    }

    /// See [`Cacheable::set`].
    pub fn set(&self, cache: impl Into<Cache<T>>) {
        let cache = cache.into();
        self.with_tracker(|t| t.set(cache));
    }

    /// See [`Cacheable::state`].
    pub fn state(&self) -> bool {
        self.with_tracker(|t| t.state())
    }

    /// See [`Cacheable::state_with_logging`].
    pub fn state_with_logging(&self, logging: bool) -> bool {
        self.with_tracker(|t| t.state_with_logging(logging))
    }

    /// Copy of the store as it is right now.
    pub fn snapshot(&self) -> Store<T>
    where
        T: Clone,
    {
        self.store.lock().clone()
    }
}

impl<T, C: Clone> Clone for SharedCacheable<T, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: self.clock.clone(),
            verbose: self.verbose,
        }
    }
}
