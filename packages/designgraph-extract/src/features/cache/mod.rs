//! Result cache
//!
//! Pluggable TTL caches keyed by string:
//!
//! - **Ephemeral**: DashMap + background sweep thread
//! - **Tiered**: Ephemeral memory tier over a `SecondaryStore` (in-process or
//!   one JSON file per key on disk), with promotion on secondary hits
//! - **NoOp**: stores nothing
//!
//! All time checks go through an injectable `Clock`.

mod clock;
mod error;
mod metrics;
mod traits;
mod types;

pub mod config;
mod ephemeral_cache;
mod factory;
mod noop_cache;
mod secondary_store;
mod tiered_cache;

pub use clock::*;
pub use error::*;
pub use metrics::*;
pub use traits::*;
pub use types::*;

pub use config::*;
pub use ephemeral_cache::EphemeralCache;
pub use factory::CacheFactory;
pub use noop_cache::NoOpCache;
pub use secondary_store::{DiskStore, MemoryStore, SecondaryStore};
pub use tiered_cache::TieredCache;
