//! Cache that stores nothing (`CachingStrategy::None`)

use crate::features::cache::{Cache, CacheValue};
use std::marker::PhantomData;
use std::time::Duration;

pub struct NoOpCache<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> NoOpCache<V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for NoOpCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: CacheValue> Cache<V> for NoOpCache<V> {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn set(&self, _key: &str, _value: V, _ttl: Duration) {}

    fn delete(&self, _key: &str) -> bool {
        false
    }

    fn clear(&self) {}

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn size(&self) -> usize {
        0
    }

    fn has(&self, _key: &str) -> bool {
        false
    }
}
