//! Configuration validation

use super::error::{ConfigError, ConfigResult};
use super::io::OptionOverrides;
use crate::features::cache::CacheConfig;
use crate::features::extraction::ExtractionOptions;

/// Upper bound for `max_depth` in config files (per-call options are unbounded)
pub const MAX_DEPTH_LIMIT: usize = 128;

/// Upper bound for `max_nodes`
pub const MAX_NODES_LIMIT: usize = 1_000_000;

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

impl Validatable for ExtractionOptions {
    fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_NODES_LIMIT).contains(&self.max_nodes) {
            return Err(ConfigError::range_with_hint(
                "max_nodes",
                self.max_nodes,
                1,
                MAX_NODES_LIMIT,
                "At least the traversal root must be visited",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ExtractionOptions"
    }
}

impl Validatable for OptionOverrides {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(depth) = self.max_depth.filter(|depth| *depth > MAX_DEPTH_LIMIT) {
            return Err(ConfigError::range_with_hint(
                "max_depth",
                depth,
                0,
                MAX_DEPTH_LIMIT,
                "Extract deep subtrees through selectors instead",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "OptionOverrides"
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::range_with_hint(
                "sweep_interval_secs",
                0,
                1,
                u64::MAX,
                "Expired entries are only swept on a positive interval",
            ));
        }

        if self.promotion_ttl.is_zero() {
            return Err(ConfigError::range_with_hint(
                "promotion_ttl_secs",
                0,
                1,
                u64::MAX,
                "A zero promotion TTL would never keep secondary hits in memory",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "CacheConfig"
    }
}
