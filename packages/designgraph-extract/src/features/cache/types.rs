//! Core types for the cache system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const HOUR: u64 = 60 * 60;

/// Where extraction results are kept between calls
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachingStrategy {
    None,
    #[default]
    Memory,
    Disk,
    Hybrid,
}

impl CachingStrategy {
    pub const ALL: [CachingStrategy; 4] = [Self::None, Self::Memory, Self::Disk, Self::Hybrid];

    /// TTL applied to results stored under this strategy
    pub fn default_ttl(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Memory => Duration::from_secs(HOUR),
            Self::Hybrid => Duration::from_secs(24 * HOUR),
            Self::Disk => Duration::from_secs(7 * 24 * HOUR),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Memory => "memory",
            Self::Disk => "disk",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for CachingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown caching strategy: {}", s))
    }
}

/// In-memory cache entry
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// JSON envelope persisted by secondary stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry<V> {
    pub key: String,
    pub expires_at: DateTime<Utc>,
    pub value: V,
}

/// Envelope without its payload (key listing)
#[derive(Debug, Deserialize)]
pub(crate) struct StoredEntryHeader {
    pub key: String,
}
