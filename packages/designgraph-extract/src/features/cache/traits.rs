//! Cache port
//!
//! Every implementation is safe to share across threads and reports a miss
//! instead of an error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Bounds a cached value must meet (serializable for the secondary tier)
pub trait CacheValue: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

pub trait Cache<V: CacheValue>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    /// Store `value` for `ttl`; a zero TTL removes any existing entry instead
    fn set(&self, key: &str, value: V, ttl: Duration);

    fn delete(&self, key: &str) -> bool;

    fn clear(&self);

    /// Live (non-expired) keys
    fn keys(&self) -> Vec<String>;

    /// Number of live entries
    fn size(&self) -> usize {
        self.keys().len()
    }

    fn has(&self, key: &str) -> bool;

    /// Release background resources and drop stored entries
    fn destroy(&self) {
        self.clear();
    }
}
