//! Cache factory: strategy → implementation

use crate::features::cache::{
    clock::{Clock, SystemClock},
    config::CacheConfig,
    metrics::CacheMetrics,
    Cache, CacheResult, CacheValue, CachingStrategy, DiskStore, EphemeralCache, MemoryStore,
    NoOpCache, SecondaryStore, TieredCache,
};
use prometheus::Registry;
use std::sync::Arc;

pub struct CacheFactory {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<CacheMetrics>>,
}

impl CacheFactory {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            metrics: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register cache metrics on `registry`; every created cache reports there
    pub fn with_registry(mut self, registry: &Registry) -> CacheResult<Self> {
        self.metrics = Some(Arc::new(CacheMetrics::new(registry)?));
        Ok(self)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<&Arc<CacheMetrics>> {
        self.metrics.as_ref()
    }

    pub fn create<V: CacheValue>(&self, strategy: CachingStrategy) -> Arc<dyn Cache<V>> {
        match strategy {
            CachingStrategy::None => Arc::new(NoOpCache::new()),
            CachingStrategy::Memory => Arc::new(EphemeralCache::build(
                self.config.sweep_interval,
                Arc::clone(&self.clock),
                self.metrics.clone(),
            )),
            CachingStrategy::Hybrid => self.tiered(Arc::new(MemoryStore::new())),
            CachingStrategy::Disk => self.tiered(self.disk_store()),
        }
    }

    fn tiered<V: CacheValue>(&self, secondary: Arc<dyn SecondaryStore>) -> Arc<dyn Cache<V>> {
        Arc::new(TieredCache::build(
            secondary,
            Arc::clone(&self.clock),
            self.config.sweep_interval,
            self.config.promotion_ttl,
            self.metrics.clone(),
        ))
    }

    /// Disk-backed secondary tier, or in-process when no directory is usable
    fn disk_store(&self) -> Arc<dyn SecondaryStore> {
        let Some(dir) = &self.config.disk_dir else {
            return Arc::new(MemoryStore::new());
        };

        match DiskStore::new(dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(
                    "Disk cache directory {:?} unusable, falling back to memory: {}",
                    dir,
                    e
                );
                Arc::new(MemoryStore::new())
            }
        }
    }
}

impl Default for CacheFactory {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
