//! Source provider port

use crate::errors::EngineResult;
use crate::features::extraction::domain::Diagnostic;
use crate::shared::models::DesignNode;

/// A fetched document: one root plus normalization diagnostics
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub root: DesignNode,
    pub diagnostics: Vec<Diagnostic>,
}

impl From<DesignNode> for SourceDocument {
    fn from(root: DesignNode) -> Self {
        Self {
            root,
            diagnostics: Vec::new(),
        }
    }
}

/// Delivers the node tree behind a source ref
///
/// Called once per extraction. Fails with `SourceUnavailable` when the
/// document cannot be fetched and `InvalidSource` when it has no usable root.
pub trait SourceProvider: Send + Sync {
    fn fetch(&self, source_ref: &str) -> EngineResult<SourceDocument>;
}
