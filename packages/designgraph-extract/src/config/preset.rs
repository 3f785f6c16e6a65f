//! Preset configurations
//!
//! Presets provide complete extraction options for common use cases.

use super::error::{ConfigError, ConfigResult};
use crate::features::cache::CachingStrategy;
use crate::features::extraction::{ExtractionOptions, OptimizationLevel};
use crate::features::validation::ValidationLevel;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Interactive previews
    ///
    /// - max_depth=3, aggressive optimization
    /// - basic validation
    Fast,

    /// Default for prompt building
    ///
    /// - max_depth=5, standard optimization
    /// - standard validation
    #[default]
    Balanced,

    /// Documentation exports
    ///
    /// - max_depth=20, nothing dropped
    /// - strict validation
    Thorough,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Self::Fast, Self::Balanced, Self::Thorough];

    /// Extraction options for this preset
    pub fn options(&self) -> ExtractionOptions {
        let base = ExtractionOptions::default().with_caching(CachingStrategy::Memory);
        match self {
            Self::Fast => base
                .with_max_depth(3)
                .with_optimization(OptimizationLevel::Aggressive)
                .with_validation(ValidationLevel::Basic),
            Self::Balanced => base
                .with_max_depth(5)
                .with_optimization(OptimizationLevel::Standard)
                .with_validation(ValidationLevel::Standard),
            Self::Thorough => base
                .with_max_depth(20)
                .with_optimization(OptimizationLevel::None)
                .with_validation(ValidationLevel::Strict),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Fast => "Shallow walk, vectors collapsed, basic checks",
            Self::Balanced => "Default depth and optimization, standard checks",
            Self::Thorough => "Deep walk, nothing dropped, strict checks",
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}
