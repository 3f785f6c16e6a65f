//! Error types for cache system
//!
//! These never cross the `Cache` trait: the cache implementations log and
//! swallow them so a broken tier degrades into a miss.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache corrupted: {0}")]
    Corrupted(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics registration failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
