//! Cache configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default interval between background expiry sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on how long a promoted entry stays in the memory tier
pub const DEFAULT_PROMOTION_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Ephemeral sweep period (zero disables the sweep thread)
    pub sweep_interval: Duration,

    pub promotion_ttl: Duration,

    /// Directory for the disk strategy's secondary tier
    pub disk_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            promotion_ttl: DEFAULT_PROMOTION_TTL,
            disk_dir: None,
        }
    }
}

impl CacheConfig {
    pub fn with_disk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.disk_dir = Some(dir.into());
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_promotion_ttl(mut self, ttl: Duration) -> Self {
        self.promotion_ttl = ttl;
        self
    }
}
