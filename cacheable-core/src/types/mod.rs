//! Domain types for cacheable.
//!
//! - [`Store`]: Cache contents plus expiry/staleness timestamps
//! - [`Cache`]: Sequence or mapping payload container
//! - [`Ttl`]: Parsed time-to-live window
//! - [`SystemClock`] / [`ManualClock`]: Time sources
//! - [`CacheableConfig`]: Serializable settings

mod cache;
mod clock;
mod config;
mod store;
mod ttl;

pub use cache::*;
pub use clock::*;
pub use config::*;
pub use store::*;
pub use ttl::*;
