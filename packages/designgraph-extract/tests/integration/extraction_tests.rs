//! End-to-end extraction tests through `ExtractionEngine`

#[path = "../common/mod.rs"]
mod common;

use common::*;
use designgraph_extract::features::cache::{CacheConfig, CacheFactory};
use designgraph_extract::features::validation::codes;
use designgraph_extract::{
    CancellationToken, CachingStrategy, ErrorKind, ExtractionEngine, FileSourceProvider,
    PerformanceMonitor, ValidationLevel,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// Core scenario
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn login_screen_extraction() {
    let engine = engine_with("login", fixture_login_screen());
    let result = engine.extract("login", &[], &default_options()).unwrap();

    assert!(result.validation.valid, "{:?}", result.validation.errors);
    assert!(result.design_tokens.contains_color(LOGIN_PRIMARY));
    assert_eq!(
        result.design_tokens.colors.get("primary-button-fill").map(String::as_str),
        Some(LOGIN_PRIMARY)
    );
    assert_eq!(
        result.design_tokens.colors.get("title-fill").map(String::as_str),
        Some(LOGIN_PRIMARY),
        "text node fill becomes a color token"
    );
    assert_eq!(result.hierarchy.component_count(), 1);
    assert_eq!(result.hierarchy.text_layer_count(), 1);

    assert_eq!(result.design_tokens.spacing.get("login-screen-gap"), Some(&12.0));
    assert_eq!(result.design_tokens.typography["title"].weight, 700);

    assert_eq!(result.component_instances.len(), 1);
    assert_eq!(result.component_instances[0].master_component_id, "10:1");
    assert_eq!(result.hierarchy.layers_in_frame("1:1").count(), 2);
}

#[test]
fn layers_follow_document_order() {
    let engine = engine_with("login", fixture_login_screen());
    let result = engine.extract("login", &[], &default_options()).unwrap();

    let ids: Vec<_> = result
        .hierarchy
        .layers()
        .iter()
        .map(|layer| layer.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1:1", "1:3", "1:2"]);
    assert_eq!(result.performance.node_count, 3);
}

// ═══════════════════════════════════════════════════════════════════════════
// Caching
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn cached_calls_are_idempotent() {
    let engine = engine_with("login", fixture_login_screen());
    let options = default_options();

    let first = engine.extract("login", &[], &options).unwrap();
    let second = engine.extract("login", &[], &options).unwrap();

    assert!(!first.performance.cache_hit);
    assert!(second.performance.cache_hit);
    assert_eq!(second.performance.cache_hits, 1);
    assert_eq!(second.metadata, first.metadata);
    assert_eq!(second.design_tokens, first.design_tokens);
    assert_eq!(second.hierarchy, first.hierarchy);
}

#[test]
fn no_cache_strategy_never_hits() {
    let engine = engine_with("login", fixture_login_screen());
    let options = default_options().with_caching(CachingStrategy::None);

    engine.extract("login", &[], &options).unwrap();
    let second = engine.extract("login", &[], &options).unwrap();

    assert!(!second.performance.cache_hit);
    assert_eq!(second.performance.cache_misses, 1);
}

#[test]
fn each_selector_is_cached_separately() {
    let engine = engine_with("login", fixture_login_screen());
    let selectors = selectors(&["1:3", "1:2"]);

    let first = engine.extract("login", &selectors, &default_options()).unwrap();
    assert_eq!(first.performance.cache_misses, 2);

    let second = engine.extract("login", &selectors, &default_options()).unwrap();
    assert_eq!(second.performance.cache_hits, 2);
    assert!(second.performance.cache_hit);
}

#[test]
fn selector_order_does_not_change_output() {
    let engine = engine_with("login", fixture_login_screen());
    let options = default_options().with_caching(CachingStrategy::None);

    let a = engine.extract("login", &selectors(&["1:3", "1:2"]), &options).unwrap();
    let b = engine.extract("login", &selectors(&["1:2", "1:3", "1:2"]), &options).unwrap();

    let roots: Vec<_> = a.metadata.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(roots, vec!["1:2", "1:3"]);
    assert_eq!(a.metadata, b.metadata);
    assert_eq!(a.design_tokens, b.design_tokens);
}

#[test]
fn disk_cache_is_shared_between_engines() {
    let dir = TempDir::new().unwrap();
    let options = default_options().with_caching(CachingStrategy::Disk);
    let factory = || CacheFactory::new(CacheConfig::default().with_disk_dir(dir.path()));

    let first = engine_with("login", fixture_login_screen())
        .with_cache_factory(factory())
        .extract("login", &[], &options)
        .unwrap();
    assert!(!first.performance.cache_hit);

    let second = engine_with("login", fixture_login_screen())
        .with_cache_factory(factory())
        .extract("login", &[], &options)
        .unwrap();
    assert!(second.performance.cache_hit);
    assert_eq!(second.metadata, first.metadata);
    assert_eq!(second.design_tokens, first.design_tokens);
}

// ═══════════════════════════════════════════════════════════════════════════
// Bounds
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn depth_is_clamped_with_warning() {
    let engine = engine_with("deep", fixture_depth_chain(10));
    let options = default_options().with_max_depth(3);

    let result = engine.extract("deep", &[], &options).unwrap();

    assert!(result.hierarchy.total_depth() <= 3);
    assert!(result.has_diagnostic(ErrorKind::DepthExceeded));
    assert!(result.validation.valid);
    assert!(result.validation.has_warning(codes::DEPTH_EXCEEDED));
}

#[test]
fn large_max_depth_is_accepted() {
    let engine = engine_with("deep", fixture_depth_chain(200));
    let options = default_options().with_max_depth(150);

    let result = engine.extract("deep", &[], &options).unwrap();

    assert_eq!(result.hierarchy.total_depth(), 150);
    assert_eq!(result.node_count(), 151);
    assert!(result.has_diagnostic(ErrorKind::DepthExceeded));
    assert!(result.validation.valid);
}

#[test]
fn max_depth_beyond_tree_walks_everything() {
    let engine = engine_with("deep", fixture_depth_chain(200));
    let options = default_options().with_max_depth(10_000);

    let result = engine.extract("deep", &[], &options).unwrap();

    assert_eq!(result.hierarchy.total_depth(), 200);
    assert!(!result.has_diagnostic(ErrorKind::DepthExceeded));
}

#[test]
fn include_children_false_keeps_only_roots() {
    let engine = engine_with("deep", fixture_depth_chain(4));
    let options = default_options().with_include_children(false);

    let result = engine.extract("deep", &[], &options).unwrap();
    assert_eq!(result.node_count(), 1);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn node_limit_keeps_partial_result() {
    let engine = engine_with("login", fixture_login_screen());
    let options = default_options().with_max_nodes(2);

    let result = engine.extract("login", &[], &options).unwrap();
    assert_eq!(result.node_count(), 2);
    assert!(result.has_diagnostic(ErrorKind::NodeLimit));
    assert!(result.validation.has_warning(codes::NODE_LIMIT));
}

// ═══════════════════════════════════════════════════════════════════════════
// Failures
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn unknown_selector_is_invalid_source() {
    let engine = engine_with("login", fixture_login_screen());
    let err = engine
        .extract("login", &selectors(&["1:2", "404:1"]), &default_options())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSource);
}

#[test]
fn unknown_source_is_unavailable() {
    let engine = engine_with("login", fixture_login_screen());
    let err = engine.extract("signup", &[], &default_options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
}

#[test]
fn zero_node_limit_is_invalid_options() {
    let engine = engine_with("login", fixture_login_screen());
    let err = engine
        .extract("login", &[], &default_options().with_max_nodes(0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOptions);
}

#[test]
fn cancelled_extraction_fails() {
    let engine = engine_with("deep", fixture_depth_chain(50));
    let token = CancellationToken::new();
    token.cancel();

    let err = engine
        .extract_with_cancel("deep", &[], &default_options(), &token)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

// ═══════════════════════════════════════════════════════════════════════════
// File source
// ═══════════════════════════════════════════════════════════════════════════

fn file_engine(dir: &TempDir) -> ExtractionEngine {
    std::fs::write(dir.path().join("login.json"), fixture_login_screen_json()).unwrap();
    ExtractionEngine::new(Arc::new(FileSourceProvider::new(dir.path())))
}

#[test]
fn file_source_normalizes_raw_documents() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir);

    let result = engine.extract("login", &[], &default_options()).unwrap();

    assert!(result.design_tokens.contains_color(LOGIN_PRIMARY));
    assert_eq!(
        result.design_tokens.colors.get("title-fill").map(String::as_str),
        Some(LOGIN_PRIMARY)
    );
    assert_eq!(result.hierarchy.component_count(), 1);
    assert_eq!(result.hierarchy.text_layer_count(), 1);
    assert!(result.has_diagnostic(ErrorKind::MalformedBranch));
    assert!(result.validation.has_warning(codes::MALFORMED_BRANCH));
    assert!(result.validation.valid);
}

#[test]
fn file_source_diagnostics_follow_selected_subtree() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir);

    let result = engine
        .extract("login", &selectors(&["1:2"]), &default_options())
        .unwrap();
    assert!(!result.has_diagnostic(ErrorKind::MalformedBranch));
}

#[test]
fn file_source_rejects_path_like_refs() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir);

    let err = engine.extract("../login", &[], &default_options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSource);

    let err = engine.extract("missing", &[], &default_options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
}

// ═══════════════════════════════════════════════════════════════════════════
// Performance
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn performance_metrics_are_attached() {
    let monitor = Arc::new(PerformanceMonitor::new());
    let engine = engine_with("login", fixture_login_screen()).with_monitor(monitor.clone());
    let options = default_options().with_validation(ValidationLevel::Basic);

    let result = engine.extract("login", &[], &options).unwrap();

    assert!(result.performance.extraction_ms >= 0.0);
    assert!(result.performance.load_time_ms >= 0.0);
    assert!(result.performance.custom.is_empty());
    assert_eq!(result.performance.cache_misses, 1);

    let recorded: Vec<_> = monitor.records().into_iter().map(|r| r.name).collect();
    assert!(recorded.contains(&"extraction_duration".to_string()));
    assert_eq!(monitor.running_timers(), 0);
}
