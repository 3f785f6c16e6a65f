//! Test data builders

use chrono::{TimeZone, Utc};
use designgraph_extract::features::cache::ManualClock;
use designgraph_extract::shared::models::DesignNode;
use designgraph_extract::{ExtractionEngine, ExtractionOptions, StaticSourceProvider};
use std::sync::Arc;

/// Engine over a single in-memory document
pub fn engine_with(source_ref: &str, root: DesignNode) -> ExtractionEngine {
    let provider = StaticSourceProvider::new().with_document(source_ref, root);
    ExtractionEngine::new(Arc::new(provider))
}

/// Manual clock pinned to a fixed instant
pub fn manual_clock() -> Arc<ManualClock> {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    Arc::new(ManualClock::new(start))
}

pub fn selectors(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn default_options() -> ExtractionOptions {
    ExtractionOptions::default()
}
