//! Validation result model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much checking a result goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    None,
    Basic,
    #[default]
    Standard,
    Strict,
}

impl ValidationLevel {
    pub const ALL: [ValidationLevel; 4] = [Self::None, Self::Basic, Self::Standard, Self::Strict];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown validation level: {}", s))
    }
}

/// Error and warning codes
pub mod codes {
    pub const ROOT_MISSING: &str = "ROOT_MISSING";
    pub const NODE_ID_MISSING: &str = "NODE_ID_MISSING";
    pub const DUPLICATE_NODE_ID: &str = "DUPLICATE_NODE_ID";
    pub const TEXT_STYLE_MISSING: &str = "TEXT_STYLE_MISSING";
    pub const INSTANCE_MASTER_MISSING: &str = "INSTANCE_MASTER_MISSING";
    pub const UNRESOLVED_COMPONENT: &str = "UNRESOLVED_COMPONENT";
    pub const INVALID_GEOMETRY: &str = "INVALID_GEOMETRY";

    pub const DEPTH_EXCEEDED: &str = "DEPTH_EXCEEDED";
    pub const NODE_LIMIT: &str = "NODE_LIMIT";
    pub const EMPTY_TOKENS: &str = "EMPTY_TOKENS";
    pub const MALFORMED_BRANCH: &str = "MALFORMED_BRANCH";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: String,
    pub message: String,
    /// Slash-separated node id path from the traversal root (empty for
    /// result-level issues)
    pub path: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub path: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationMetadata {
    pub validated_at: DateTime<Utc>,
    pub validator_version: String,
    pub duration_ms: f64,
    pub total_checks: u32,
    pub passed_checks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub metadata: ValidationMetadata,
}

impl Default for ValidationResult {
    /// Valid, zero checks (nothing validated yet)
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            metadata: ValidationMetadata::default(),
        }
    }
}

impl ValidationResult {
    pub fn has_error(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}
