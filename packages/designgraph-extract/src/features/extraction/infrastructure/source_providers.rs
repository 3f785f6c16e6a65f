//! Source provider adapters

use super::normalize::{normalize_document, normalize_str, NormalizeError};
use crate::errors::{EngineResult, ExtractionError};
use crate::features::extraction::ports::{SourceDocument, SourceProvider};
use crate::shared::models::DesignNode;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// In-memory documents keyed by source ref
#[derive(Default)]
pub struct StaticSourceProvider {
    documents: RwLock<HashMap<String, SourceDocument>>,
}

impl StaticSourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, source_ref: impl Into<String>, root: DesignNode) -> Self {
        self.insert(source_ref, root);
        self
    }

    pub fn insert(&self, source_ref: impl Into<String>, root: DesignNode) {
        self.documents
            .write()
            .insert(source_ref.into(), SourceDocument::from(root));
    }

    /// Normalize and store a raw design-tool payload
    pub fn insert_raw(
        &self,
        source_ref: impl Into<String>,
        raw: &Value,
    ) -> Result<(), NormalizeError> {
        let normalized = normalize_document(raw)?;
        self.documents.write().insert(
            source_ref.into(),
            SourceDocument {
                root: normalized.root,
                diagnostics: normalized.diagnostics,
            },
        );
        Ok(())
    }

    pub fn remove(&self, source_ref: &str) -> bool {
        self.documents.write().remove(source_ref).is_some()
    }
}

impl SourceProvider for StaticSourceProvider {
    fn fetch(&self, source_ref: &str) -> EngineResult<SourceDocument> {
        self.documents
            .read()
            .get(source_ref)
            .cloned()
            .ok_or_else(|| {
                ExtractionError::source_unavailable(format!("no document named '{}'", source_ref))
            })
    }
}

/// Reads `<dir>/<source_ref>.json` in raw design-tool format
pub struct FileSourceProvider {
    dir: PathBuf,
}

impl FileSourceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Source refs are plain file stems; anything path-like is rejected
    fn path_for(&self, source_ref: &str) -> EngineResult<PathBuf> {
        let path_like = source_ref.is_empty()
            || source_ref.contains(['/', '\\'])
            || source_ref.starts_with('.');
        if path_like {
            return Err(ExtractionError::invalid_source(format!(
                "source ref '{}' is not a plain name",
                source_ref
            )));
        }
        Ok(self.dir.join(format!("{}.json", source_ref)))
    }
}

impl SourceProvider for FileSourceProvider {
    fn fetch(&self, source_ref: &str) -> EngineResult<SourceDocument> {
        let path = self.path_for(source_ref)?;

        let json = fs::read_to_string(&path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound => ExtractionError::source_unavailable(format!(
                "{} does not exist",
                path.display()
            )),
            _ => ExtractionError::source_unavailable(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )),
        })?;

        let normalized = normalize_str(&json).map_err(|e| {
            ExtractionError::invalid_source(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!(
            "Loaded {} ({} nodes, {} diagnostics)",
            path.display(),
            normalized.root.node_count(),
            normalized.diagnostics.len()
        );

        Ok(SourceDocument {
            root: normalized.root,
            diagnostics: normalized.diagnostics,
        })
    }
}
