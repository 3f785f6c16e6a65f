//! Performance metric types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    Milliseconds,
    Bytes,
    Count,
    Ratio,
}

/// One recorded sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregated metrics attached to every extraction result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Sum of `*_duration` samples whose name mentions load or fetch
    pub load_time_ms: f64,

    /// Sum of `*_duration` samples whose name mentions render or process
    pub render_time_ms: f64,

    /// Resident set size, where the platform exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_bytes: Option<u64>,

    pub extraction_ms: f64,
    pub node_count: usize,

    /// Every traversal of the call came from cache
    pub cache_hit: bool,
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Latest value of every other metric, by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, f64>,
}

impl PerformanceMetrics {
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total > 0 {
            self.cache_hits as f64 / total as f64
        } else {
            0.0
        }
    }
}
