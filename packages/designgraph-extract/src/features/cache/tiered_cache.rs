//! Tiered Cache: memory → secondary facade with promotion
//!
//! - **Memory tier**: `EphemeralCache`, bounded by the promotion TTL
//! - **Secondary tier**: a `SecondaryStore` holding JSON envelopes with the
//!   full TTL
//!
//! Data flow:
//! - **Read**: memory → secondary; a secondary hit is promoted into memory
//!   for `min(promotion_ttl, remaining)`
//! - **Write**: memory with `min(ttl, promotion_ttl)`, secondary with `ttl`
//! - Expired or corrupt secondary entries are removed and read as misses

use crate::features::cache::{
    clock::{add_ttl, remaining, Clock, SystemClock},
    config::{DEFAULT_PROMOTION_TTL, DEFAULT_SWEEP_INTERVAL},
    metrics::CacheMetrics,
    Cache, CacheValue, EphemeralCache, SecondaryStore, StoredEntry,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

pub struct TieredCache<V: CacheValue> {
    memory: EphemeralCache<V>,
    secondary: Arc<dyn SecondaryStore>,
    clock: Arc<dyn Clock>,
    promotion_ttl: Duration,
    metrics: Option<Arc<CacheMetrics>>,
}

impl<V: CacheValue> TieredCache<V> {
    pub fn new(secondary: Arc<dyn SecondaryStore>) -> Self {
        Self::with_clock(
            secondary,
            Arc::new(SystemClock),
            DEFAULT_SWEEP_INTERVAL,
            DEFAULT_PROMOTION_TTL,
        )
    }

    pub fn with_clock(
        secondary: Arc<dyn SecondaryStore>,
        clock: Arc<dyn Clock>,
        sweep_interval: Duration,
        promotion_ttl: Duration,
    ) -> Self {
        Self::build(secondary, clock, sweep_interval, promotion_ttl, None)
    }

    pub(crate) fn build(
        secondary: Arc<dyn SecondaryStore>,
        clock: Arc<dyn Clock>,
        sweep_interval: Duration,
        promotion_ttl: Duration,
        metrics: Option<Arc<CacheMetrics>>,
    ) -> Self {
        Self {
            memory: EphemeralCache::build(sweep_interval, Arc::clone(&clock), metrics.clone()),
            secondary,
            clock,
            promotion_ttl,
            metrics,
        }
    }

    /// Memory tier (for inspection)
    pub fn memory(&self) -> &EphemeralCache<V> {
        &self.memory
    }

    /// Read a live secondary entry, removing it when expired or unreadable
    fn load_secondary(&self, key: &str) -> Option<StoredEntry<V>> {
        let bytes = match self.secondary.read(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Secondary tier read failed for {}: {}", key, e);
                return None;
            }
        };

        let entry = match serde_json::from_slice::<StoredEntry<V>>(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Dropping corrupt secondary entry {}: {}", key, e);
                if let Some(metrics) = &self.metrics {
                    metrics.corrupted.inc();
                }
                self.remove_secondary(key);
                return None;
            }
        };

        if entry.key != key {
            tracing::debug!("Secondary entry key mismatch for {}", key);
            return None;
        }

        if remaining(self.clock.now(), entry.expires_at).is_none() {
            if let Some(metrics) = &self.metrics {
                metrics.expirations.inc();
            }
            self.remove_secondary(key);
            return None;
        }

        Some(entry)
    }

    fn remove_secondary(&self, key: &str) -> bool {
        self.secondary.remove(key).unwrap_or_else(|e| {
            tracing::warn!("Secondary tier remove failed for {}: {}", key, e);
            false
        })
    }
}

impl<V: CacheValue> Cache<V> for TieredCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        if let Some(value) = self.memory.get(key) {
            tracing::debug!("Cache hit (memory): {}", key);
            return Some(value);
        }

        let entry = self.load_secondary(key)?;
        let left = remaining(self.clock.now(), entry.expires_at)?;
        let promote_for = left.min(self.promotion_ttl);

        self.memory.set(key, entry.value.clone(), promote_for);
        if let Some(metrics) = &self.metrics {
            metrics.promotions.inc();
            metrics.hits.inc();
        }
        tracing::debug!("Cache hit (secondary), promoted for {:?}: {}", promote_for, key);

        Some(entry.value)
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        if ttl.is_zero() {
            self.delete(key);
            return;
        }

        let envelope = StoredEntry {
            key: key.to_string(),
            expires_at: add_ttl(self.clock.now(), ttl),
            value: &value,
        };

        match serde_json::to_vec(&envelope) {
            Ok(bytes) => {
                if let Err(e) = self.secondary.write(key, &bytes) {
                    tracing::warn!("Secondary tier write failed for {}: {}", key, e);
                }
            }
            Err(e) => tracing::warn!("Skipping secondary tier for {}: {}", key, e),
        }

        self.memory.set(key, value, ttl.min(self.promotion_ttl));
    }

    fn delete(&self, key: &str) -> bool {
        let in_memory = self.memory.delete(key);
        let in_secondary = self.remove_secondary(key);
        in_memory || in_secondary
    }

    fn clear(&self) {
        self.memory.clear();
        if let Err(e) = self.secondary.clear() {
            tracing::warn!("Secondary tier clear failed: {}", e);
        }
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: BTreeSet<String> = self.memory.keys().into_iter().collect();

        let stored = self.secondary.keys().unwrap_or_else(|e| {
            tracing::warn!("Secondary tier listing failed: {}", e);
            Vec::new()
        });
        for key in stored {
            if !keys.contains(&key) && self.load_secondary(&key).is_some() {
                keys.insert(key);
            }
        }

        keys.into_iter().collect()
    }

    fn has(&self, key: &str) -> bool {
        self.memory.has(key) || self.load_secondary(key).is_some()
    }

    /// Stops the memory tier; the secondary tier keeps its entries
    fn destroy(&self) {
        self.memory.destroy();
    }
}
