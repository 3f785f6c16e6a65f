//! Ephemeral Cache: in-process TTL map with a background sweep
//!
//! Expired entries are invisible to reads as soon as they expire and are
//! physically removed either lazily (on the read that finds them) or by the
//! sweep thread, whichever comes first.

use crate::features::cache::{
    clock::{add_ttl, Clock, SystemClock},
    metrics::CacheMetrics,
    Cache, CacheEntry, CacheValue,
};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct Store<V> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<CacheMetrics>>,
}

impl<V> Store<V> {
    /// Remove every expired entry, returning how many were dropped
    fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());

        if let Some(metrics) = &self.metrics {
            metrics.expirations.inc_by(removed as u64);
            metrics.entries.set(self.entries.len() as i64);
        }
        removed
    }

    fn sync_gauge(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.entries.set(self.entries.len() as i64);
        }
    }
}

/// Handle to the sweep thread
struct Sweeper {
    stop_tx: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl Sweeper {
    fn spawn<V: Send + Sync + 'static>(store: Arc<Store<V>>, interval: Duration) -> Option<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let spawned = thread::Builder::new()
            .name("designgraph-cache-sweep".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let removed = store.sweep();
                        if removed > 0 {
                            tracing::debug!("Cache sweep removed {} expired entries", removed);
                        }
                    }
                    // Stop signal or the cache is gone
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match spawned {
            Ok(handle) => Some(Self { stop_tx, handle }),
            Err(e) => {
                tracing::warn!("Cache sweep thread not started, expiry stays lazy: {}", e);
                None
            }
        }
    }

    fn stop(self) {
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            tracing::warn!("Cache sweep thread panicked");
        }
    }
}

/// Ephemeral in-memory cache
pub struct EphemeralCache<V> {
    store: Arc<Store<V>>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl<V: CacheValue> EphemeralCache<V> {
    /// Wall-clock cache sweeping every `sweep_interval`
    pub fn new(sweep_interval: Duration) -> Self {
        Self::with_clock(sweep_interval, Arc::new(SystemClock))
    }

    pub fn with_clock(sweep_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::build(sweep_interval, clock, None)
    }

    pub(crate) fn build(
        sweep_interval: Duration,
        clock: Arc<dyn Clock>,
        metrics: Option<Arc<CacheMetrics>>,
    ) -> Self {
        let store = Arc::new(Store {
            entries: DashMap::new(),
            clock,
            metrics,
        });

        let sweeper = if sweep_interval.is_zero() {
            None
        } else {
            Sweeper::spawn(Arc::clone(&store), sweep_interval)
        };

        Self {
            store,
            sweeper: Mutex::new(sweeper),
        }
    }

    /// Raw stored count, including expired entries not yet swept
    pub fn entry_count(&self) -> usize {
        self.store.entries.len()
    }

    /// Run one sweep now
    pub fn sweep_expired(&self) -> usize {
        self.store.sweep()
    }

    /// Sweep thread is alive
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.lock().is_some()
    }

    fn stop_sweeper(&self) {
        if let Some(sweeper) = self.sweeper.lock().take() {
            sweeper.stop();
        }
    }

    fn record(&self, hit: bool) {
        if let Some(metrics) = &self.store.metrics {
            if hit {
                metrics.hits.inc();
            } else {
                metrics.misses.inc();
            }
        }
    }

    /// Look up `key`, evicting it if it has expired
    fn live_entry(&self, key: &str) -> Option<CacheEntry<V>> {
        let now = self.store.clock.now();
        let entry = self.store.entries.get(key).map(|e| e.clone())?;

        if entry.is_expired(now) {
            // Only remove the entry we saw expire, not a concurrent fresh write
            let removed = self
                .store
                .entries
                .remove_if(key, |_, current| current.is_expired(now));
            if removed.is_some() {
                if let Some(metrics) = &self.store.metrics {
                    metrics.expirations.inc();
                }
                self.store.sync_gauge();
            }
            return None;
        }
        Some(entry)
    }
}

impl<V: CacheValue> Cache<V> for EphemeralCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let value = self.live_entry(key).map(|entry| entry.value);
        self.record(value.is_some());
        value
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        if ttl.is_zero() {
            self.delete(key);
            return;
        }

        let expires_at = add_ttl(self.store.clock.now(), ttl);
        self.store
            .entries
            .insert(key.to_string(), CacheEntry::new(value, expires_at));
        self.store.sync_gauge();
    }

    fn delete(&self, key: &str) -> bool {
        let removed = self.store.entries.remove(key).is_some();
        self.store.sync_gauge();
        removed
    }

    fn clear(&self) {
        self.store.entries.clear();
        self.store.sync_gauge();
    }

    fn keys(&self) -> Vec<String> {
        let now = self.store.clock.now();
        let mut keys: Vec<String> = self
            .store
            .entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    fn size(&self) -> usize {
        let now = self.store.clock.now();
        self.store
            .entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    fn has(&self, key: &str) -> bool {
        self.live_entry(key).is_some()
    }

    fn destroy(&self) {
        self.stop_sweeper();
        self.clear();
    }
}

impl<V> Drop for EphemeralCache<V> {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.get_mut().take() {
            sweeper.stop();
        }
    }
}
