//! Expiry and staleness tracking over a borrowed store.

use tracing::{debug, instrument};

use cacheable_core::constants::{INITIAL_EXPIRES, LOG_TARGET};
use cacheable_core::{Cache, Clock, Store, SystemClock, Timestamp};

use crate::report::{secs_until, CacheReport, Phase};

/// TTL state tracker bound to one store.
///
/// Every query that depends on the current time comes in two forms:
/// `*_at(now)` takes an explicit timestamp, and the bare form reads the
/// tracker's clock.
///
/// # Example
///
/// ```rust
/// use cacheable_core::{ManualClock, Store, Ttl};
/// use cacheable_state::Cacheable;
///
/// let clock = ManualClock::new(0);
/// let mut store: Store = Store::new().with_ttl(Ttl::from_secs(1));
/// let mut cache = Cacheable::with_clock(&mut store, clock.clone());
///
/// assert!(cache.state()); // empty, so expired
/// cache.fetch().push(serde_json::json!({ "testing": true })).unwrap();
/// assert!(!cache.stale());
///
/// clock.advance(650);
/// assert!(cache.stale());
///
/// clock.advance(350);
/// assert!(cache.state());
/// assert_eq!(cache.size(), 0);
/// ```
pub struct Cacheable<'a, T = serde_json::Value, C = SystemClock> {
    store: &'a mut Store<T>,
    clock: C,
    verbose: bool,
}

impl<'a, T> Cacheable<'a, T> {
    /// Binds a tracker to `store` using wall-clock time.
    pub fn new(store: &'a mut Store<T>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<'a, T, C: Clock> Cacheable<'a, T, C> {
    /// Binds a tracker to `store` using the given clock.
    ///
    /// A store without `expires` is set to expire at the epoch, and a store
    /// without a cache gets an empty sequence.
    pub fn with_clock(store: &'a mut Store<T>, clock: C) -> Self {
        if store.expires.is_none() {
            store.expires = Some(INITIAL_EXPIRES);
        }
        if store.cache.is_none() {
            store.cache = Some(Cache::default());
        }

        Self {
            store,
            clock,
            verbose: false,
        }
    }

    /// Sets whether `state()` logs the debug line.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the default logging flag for `state()`.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Read-only view of the underlying store.
    pub fn store(&self) -> &Store<T> {
        &*self.store
    }

    /// Current time according to the tracker's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Number of cached elements.
    pub fn size(&self) -> usize {
        self.store.cache.as_ref().map_or(0, Cache::len)
    }

    /// True once `now` reaches the expiry time, or whenever the cache is empty.
    pub fn expired_at(&self, now: Timestamp) -> bool {
        let expires = self.store.expires.unwrap_or(INITIAL_EXPIRES);
        now >= expires || self.size() == 0
    }

    /// [`expired_at`](Self::expired_at) using the clock.
    pub fn expired(&self) -> bool {
        self.expired_at(self.now())
    }

    /// True when not expired and `now` has reached the stale time.
    ///
    /// The expiry half of the check reads the clock rather than `now`. A
    /// caller passing a future `now` can therefore see a store that is both
    /// past expiry and "stale". A store that was never reset is never stale.
    pub fn stale_at(&self, now: Timestamp) -> bool {
        !self.expired() && self.store.stale.map_or(false, |stale| now >= stale)
    }

    /// [`stale_at`](Self::stale_at) using the clock.
    pub fn stale(&self) -> bool {
        self.stale_at(self.now())
    }

    /// Classifies the store at `now`.
    pub fn phase_at(&self, now: Timestamp) -> Phase {
        if self.expired_at(now) {
            Phase::Expired
        } else if self.stale_at(now) {
            Phase::Stale
        } else {
            Phase::Fresh
        }
    }

    /// [`phase_at`](Self::phase_at) using the clock.
    pub fn phase(&self) -> Phase {
        self.phase_at(self.now())
    }

    /// Collects the debug fields at `now` without logging them.
    pub fn report_at(&self, now: Timestamp) -> CacheReport {
        CacheReport {
            key: self.store.key.clone(),
            is_stale: self.stale_at(now),
            is_expired: self.expired_at(now),
            cache_size: self.size(),
            expires_in_secs: self.store.expires.map(|expires| secs_until(expires, now)),
            stale_in_secs: self.store.stale.map(|stale| secs_until(stale, now)),
        }
    }

    /// [`report_at`](Self::report_at) using the clock.
    pub fn report(&self) -> CacheReport {
        self.report_at(self.now())
    }

    /// Logs the state of the store at `now` on the `cacheable` target.
    pub fn debug_at(&self, now: Timestamp) {
        let report = self.report_at(now);
        debug!(
            target: LOG_TARGET,
            key = %report.key,
            is_stale = report.is_stale,
            is_expired = report.is_expired,
            cache_size = report.cache_size,
            expires_in_secs = ?report.expires_in_secs,
            stale_in_secs = ?report.stale_in_secs,
            "{report}"
        );
    }

    /// [`debug_at`](Self::debug_at) using the clock.
    pub fn debug(&self) {
        self.debug_at(self.now());
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Empties the cache, keeping its container kind.
    pub fn flush(&mut self) -> bool {
        self.fetch().clear();
        true
    }

    /// Restarts the TTL window at `now`. The cache is left untouched.
    pub fn reset_at(&mut self, now: Timestamp) -> bool {
        let ttl = self.store.ttl;
        self.store.ts = Some(now);
        self.store.expires = Some(now.saturating_add(ttl.as_millis()));
        self.store.stale = Some(now.saturating_add(ttl.stale_after(self.store.offset)));
        true
    }

    /// [`reset_at`](Self::reset_at) using the clock.
    pub fn reset(&mut self) -> bool {
        let now = self.now();
        self.reset_at(now)
    }

    /// Replaces the cache wholesale. The new contents are not checked
    /// against the previous kind.
    pub fn set(&mut self, cache: impl Into<Cache<T>>) {
        self.store.cache = Some(cache.into());
    }

    /// Direct access to the live cache.
    pub fn fetch(&mut self) -> &mut Cache<T> {
        self.store.cache.get_or_insert_with(Cache::default)
    }

    /// Advances the state machine, logging if the tracker is verbose.
    ///
    /// See [`state_with_logging`](Self::state_with_logging).
    pub fn state(&mut self) -> bool {
        self.state_with_logging(self.verbose)
    }

    /// Flushes and resets an expired store, then reports whether it was
    /// expired.
    ///
    /// This is the only operation that moves a store from EXPIRED back to
    /// FRESH. A non-expired store is left as is.
    #[instrument(level = "trace", skip(self), fields(key = %self.store.key))]
    pub fn state_with_logging(&mut self, logging: bool) -> bool {
        let now = self.now();
        let is_expired = self.expired_at(now);

        if is_expired && self.size() > 0 {
            debug!(target: LOG_TARGET, key = %self.store.key, flushed = self.size(), "Flushing expired cache");
            self.flush();
        }
        if is_expired {
            self.reset_at(now);
        }
        if logging {
            self.debug_at(now);
        }

        is_expired
    }
}
