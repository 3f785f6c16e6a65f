//! Extraction result

use super::{DesignTokens, HierarchyView};
use crate::errors::ErrorKind;
use crate::features::performance::PerformanceMetrics;
use crate::features::validation::ValidationResult;
use crate::shared::models::{ComponentInstanceRef, DesignNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RESULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Recoverable traversal problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            node_id,
        }
    }
}

/// Output of one `extract` call (also the cached value per traversal root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// One depth-truncated tree per traversal root
    pub metadata: Vec<DesignNode>,
    pub hierarchy: HierarchyView,
    pub design_tokens: DesignTokens,
    pub component_instances: Vec<ComponentInstanceRef>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default)]
    pub validation: ValidationResult,
    #[serde(default)]
    pub performance: PerformanceMetrics,
    pub extracted_at: DateTime<Utc>,
    pub version: String,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self {
            metadata: Vec::new(),
            hierarchy: HierarchyView::default(),
            design_tokens: DesignTokens::default(),
            component_instances: Vec::new(),
            diagnostics: Vec::new(),
            validation: ValidationResult::default(),
            performance: PerformanceMetrics::default(),
            extracted_at: Utc::now(),
            version: RESULT_VERSION.to_string(),
        }
    }

    /// Concatenate per-root results in order; later tokens win
    pub fn merge(parts: impl IntoIterator<Item = ExtractionResult>) -> Self {
        let mut merged = Self::empty();
        let mut views = Vec::new();

        for part in parts {
            merged.metadata.extend(part.metadata);
            merged.design_tokens.merge(part.design_tokens);
            merged.component_instances.extend(part.component_instances);
            merged.diagnostics.extend(part.diagnostics);
            views.push(part.hierarchy);
        }

        merged.hierarchy = HierarchyView::combine(views);
        merged
    }

    pub fn has_diagnostic(&self, kind: ErrorKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    pub fn node_count(&self) -> usize {
        self.metadata.iter().map(DesignNode::node_count).sum()
    }
}
