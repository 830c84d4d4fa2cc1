//! # cacheable core
//!
//! Core types, errors, and traits for the cacheable TTL state tracker.
//!
//! This crate provides the building blocks used by the tracker and the CLI:
//!
//! - **Types**: the [`Store`] record, the [`Cache`] container, and [`Ttl`] parsing
//! - **Errors**: edge-of-system error types
//! - **Constants**: default settings and time units
//! - **Traits**: the [`Clock`] time source
//!
//! ## Example
//!
//! ```rust
//! use cacheable_core::{Store, Ttl};
//!
//! let store: Store = Store::new().with_ttl("1s".parse::<Ttl>().unwrap());
//! let json = serde_json::to_string(&store).unwrap();
//! assert!(json.contains("\"ttl\":\"1s\""));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{CacheableError, Result};
pub use traits::*;
pub use types::*;
