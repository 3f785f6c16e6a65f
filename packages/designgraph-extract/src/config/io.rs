//! Configuration I/O (YAML loading)
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! options:
//!   max_depth: 8
//!   validation_level: strict
//! cache:
//!   sweep_interval_secs: 30
//!   disk_dir: .designgraph-cache
//! ```

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use crate::features::cache::{CacheConfig, CachingStrategy};
use crate::features::extraction::{ExtractionOptions, OptimizationLevel};
use crate::features::validation::ValidationLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// YAML Schema v1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfigFile {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Base preset
    #[serde(default)]
    pub preset: Preset,

    /// Per-field overrides on top of the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSection>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_children: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_level: Option<OptimizationLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_level: Option<ValidationLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching_strategy: Option<CachingStrategy>,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: ExtractionOptions) -> ExtractionOptions {
        if let Some(v) = self.include_children {
            options.include_children = v;
        }
        if let Some(v) = self.max_depth {
            options.max_depth = v;
        }
        if let Some(v) = self.max_nodes {
            options.max_nodes = v;
        }
        if let Some(v) = self.optimization_level {
            options.optimization_level = v;
        }
        if let Some(v) = self.validation_level {
            options.validation_level = v;
        }
        if let Some(v) = self.caching_strategy {
            options.caching_strategy = v;
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_interval_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_dir: Option<PathBuf>,
}

impl CacheSection {
    pub fn apply(&self, mut config: CacheConfig) -> CacheConfig {
        if let Some(secs) = self.sweep_interval_secs {
            config.sweep_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.promotion_ttl_secs {
            config.promotion_ttl = Duration::from_secs(secs);
        }
        if let Some(dir) = &self.disk_dir {
            config.disk_dir = Some(dir.clone());
        }
        config
    }
}

/// Options and cache settings after preset + overrides + validation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub options: ExtractionOptions,
    pub cache: CacheConfig,
}

impl ExtractionConfigFile {
    pub fn new(preset: Preset) -> Self {
        Self {
            version: 1,
            preset,
            options: None,
            cache: None,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(yaml)?;

        let version = raw
            .get("version")
            .ok_or(ConfigError::MissingVersion)?
            .as_u64()
            .ok_or(ConfigError::MissingVersion)?;
        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        Ok(serde_yaml::from_value(raw)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Apply preset and overrides, then range-check the outcome
    pub fn resolve(&self) -> ConfigResult<ResolvedConfig> {
        let mut options = self.preset.options();
        if let Some(overrides) = &self.options {
            overrides.validate()?;
            options = overrides.apply(options);
        }

        let mut cache = CacheConfig::default();
        if let Some(section) = &self.cache {
            cache = section.apply(cache);
        }

        options.validate()?;
        cache.validate()?;

        Ok(ResolvedConfig { options, cache })
    }
}
