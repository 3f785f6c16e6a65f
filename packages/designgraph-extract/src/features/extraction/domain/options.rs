//! Per-call extraction options

use crate::features::cache::CachingStrategy;
use crate::features::validation::ValidationLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// What the traversal is allowed to drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationLevel {
    /// Keep every node verbatim
    None,
    /// Skip hidden nodes
    Basic,
    /// Basic + drop childless groups
    #[default]
    Standard,
    /// Standard + vector-like nodes become effect-free leaves
    Aggressive,
}

impl OptimizationLevel {
    pub const ALL: [OptimizationLevel; 4] =
        [Self::None, Self::Basic, Self::Standard, Self::Aggressive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown optimization level: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    pub include_children: bool,
    pub max_depth: usize,
    pub max_nodes: usize,
    pub optimization_level: OptimizationLevel,
    pub validation_level: ValidationLevel,
    pub caching_strategy: CachingStrategy,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            include_children: true,
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            optimization_level: OptimizationLevel::default(),
            validation_level: ValidationLevel::default(),
            caching_strategy: CachingStrategy::default(),
        }
    }
}

impl ExtractionOptions {
    /// Depth the walk actually stops at (`include_children = false` means 0)
    pub fn effective_max_depth(&self) -> usize {
        if self.include_children {
            self.max_depth
        } else {
            0
        }
    }

    /// Stable JSON form used in cache keys (field order is fixed by the struct)
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_include_children(mut self, include_children: bool) -> Self {
        self.include_children = include_children;
        self
    }

    pub fn with_optimization(mut self, level: OptimizationLevel) -> Self {
        self.optimization_level = level;
        self
    }

    pub fn with_validation(mut self, level: ValidationLevel) -> Self {
        self.validation_level = level;
        self
    }

    pub fn with_caching(mut self, strategy: CachingStrategy) -> Self {
        self.caching_strategy = strategy;
        self
    }
}
