//! Error types for designgraph-extract
//!
//! `ExtractionError` is what callers of the engine see. `ErrorKind` is the
//! shared code taxonomy: recoverable kinds (`DepthExceeded`, `NodeLimit`,
//! `MalformedBranch`) only ever appear as diagnostics on a result.

use crate::features::validation::ValidationResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error / diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidSource,
    SourceUnavailable,
    ValidationFailed,
    Cancelled,
    InvalidOptions,
    DepthExceeded,
    NodeLimit,
    MalformedBranch,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSource => "INVALID_SOURCE",
            Self::SourceUnavailable => "SOURCE_UNAVAILABLE",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Cancelled => "CANCELLED",
            Self::InvalidOptions => "INVALID_OPTIONS",
            Self::DepthExceeded => "DEPTH_EXCEEDED",
            Self::NodeLimit => "NODE_LIMIT",
            Self::MalformedBranch => "MALFORMED_BRANCH",
        }
    }

    /// Kinds that downgrade to a diagnostic instead of failing the call
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DepthExceeded | Self::NodeLimit | Self::MalformedBranch
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Main error type for extraction
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No usable root, or a selector names a node that is not in the tree
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The source provider could not deliver the document
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Strict validation rejected the result
    #[error("Validation failed with {} error(s)", .0.errors.len())]
    ValidationFailed(Box<ValidationResult>),

    #[error("Extraction cancelled")]
    Cancelled,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSource(_) => ErrorKind::InvalidSource,
            Self::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::InvalidOptions(_) => ErrorKind::InvalidOptions,
        }
    }

    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }

    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    pub fn invalid_options(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, ExtractionError>;
