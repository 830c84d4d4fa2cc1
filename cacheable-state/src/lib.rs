//! TTL state tracking for cacheable stores.
//!
//! A [`Cacheable`] borrows a caller-owned [`Store`](cacheable_core::Store)
//! and answers whether it is fresh, stale or expired, flushing and
//! resetting it when [`state`](Cacheable::state) finds it expired.
//! [`SharedCacheable`] wraps the same operations behind a single mutex.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod report;
mod shared;
mod tracker;

pub use report::{secs_until, CacheReport, Phase};
pub use shared::SharedCacheable;
pub use tracker::Cacheable;
