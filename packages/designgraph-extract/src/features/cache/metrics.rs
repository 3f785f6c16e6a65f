//! Prometheus metrics for cache system

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

/// Counters shared by every cache a factory hands out
#[derive(Clone)]
pub struct CacheMetrics {
    pub hits: IntCounter,
    pub misses: IntCounter,
    pub promotions: IntCounter,
    pub expirations: IntCounter,
    pub corrupted: IntCounter,
    pub entries: IntGauge,
}

impl CacheMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            hits: register_int_counter_with_registry!(
                Opts::new("designgraph_cache_hits_total", "Cache hits (any tier)"),
                registry
            )?,
            misses: register_int_counter_with_registry!(
                Opts::new("designgraph_cache_misses_total", "Cache misses"),
                registry
            )?,
            promotions: register_int_counter_with_registry!(
                Opts::new(
                    "designgraph_cache_promotions_total",
                    "Secondary tier hits promoted into memory"
                ),
                registry
            )?,
            expirations: register_int_counter_with_registry!(
                Opts::new("designgraph_cache_expirations_total", "Entries dropped on expiry"),
                registry
            )?,
            corrupted: register_int_counter_with_registry!(
                Opts::new(
                    "designgraph_cache_corrupted_total",
                    "Unreadable secondary tier entries"
                ),
                registry
            )?,
            entries: register_int_gauge_with_registry!(
                Opts::new("designgraph_cache_entries", "Stored memory tier entries"),
                registry
            )?,
        })
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.get() as f64;
        let total = hits + self.misses.get() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}
