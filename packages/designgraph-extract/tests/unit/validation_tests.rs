//! Validation level tests, directly and through the engine

#[path = "../common/mod.rs"]
mod common;

use common::*;
use designgraph_extract::features::validation::codes;
use designgraph_extract::shared::models::{DesignNode, Geometry, NodeType};
use designgraph_extract::{
    ExtractionError, ExtractionResult, ValidationLevel, Validator,
};
use pretty_assertions::assert_eq;

fn candidate(root: DesignNode) -> ExtractionResult {
    let mut result = ExtractionResult::empty();
    result.metadata.push(root);
    result
}

// ═══════════════════════════════════════════════════════════════════════════
// Validator
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn level_none_runs_no_checks() {
    let result = Validator::new().validate(&ExtractionResult::empty(), ValidationLevel::None);
    assert!(result.valid);
    assert_eq!(result.metadata.total_checks, 0);
}

#[test]
fn basic_requires_a_root() {
    let result = Validator::new().validate(&ExtractionResult::empty(), ValidationLevel::Basic);
    assert!(!result.valid);
    assert!(result.has_error(codes::ROOT_MISSING));
}

#[test]
fn basic_flags_missing_and_duplicate_ids() {
    let root = DesignNode::frame("1", "Root")
        .with_child(DesignNode::frame("", "Anonymous"))
        .with_child(DesignNode::frame("2", "A"))
        .with_child(DesignNode::frame("2", "A copy"));

    let result = Validator::new().validate(&candidate(root), ValidationLevel::Basic);
    assert!(!result.valid);
    assert!(result.has_error(codes::NODE_ID_MISSING));
    assert!(result.has_error(codes::DUPLICATE_NODE_ID));
}

#[test]
fn duplicate_ids_across_roots_are_allowed() {
    let mut result = candidate(DesignNode::frame("1", "A"));
    result.metadata.push(DesignNode::frame("1", "A again"));

    let validation = Validator::new().validate(&result, ValidationLevel::Basic);
    assert!(validation.valid);
}

#[test]
fn strict_checks_geometry_and_references() {
    let mut broken = DesignNode::new("3", "Broken", NodeType::Rectangle);
    broken.geometry = Geometry::new(0.0, 0.0, -4.0, f64::NAN);

    let root = DesignNode::frame("1", "Root")
        .with_child(broken)
        .with_child(DesignNode::instance("2", "Button", "99:1"));
    let mut result = candidate(root);
    result.component_instances.push(
        result.metadata[0]
            .find("2")
            .and_then(|n| n.component.clone())
            .unwrap(),
    );

    let standard = Validator::new().validate(&result, ValidationLevel::Standard);
    assert!(standard.valid);

    let strict = Validator::new().validate(&result, ValidationLevel::Strict);
    assert!(!strict.valid);
    assert!(strict.has_error(codes::INVALID_GEOMETRY));
    assert!(strict.has_error(codes::UNRESOLVED_COMPONENT));
}

#[test]
fn resolved_component_passes_strict() {
    let root = DesignNode::frame("1", "Root")
        .with_child(DesignNode::new("10:1", "Button", NodeType::Component))
        .with_child(DesignNode::instance("2", "Button", "10:1"));
    let mut result = candidate(root);
    result.component_instances.push(
        result.metadata[0]
            .find("2")
            .and_then(|n| n.component.clone())
            .unwrap(),
    );

    let strict = Validator::new().validate(&result, ValidationLevel::Strict);
    assert!(!strict.has_error(codes::UNRESOLVED_COMPONENT));
}

#[test]
fn passed_checks_never_exceed_total() {
    let result = Validator::new().validate(&candidate(fixture_login_screen()), ValidationLevel::Strict);
    assert!(result.metadata.passed_checks <= result.metadata.total_checks);
    assert!(result.metadata.total_checks > 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Through the engine: text node without style
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn unstyled_text_basic_is_valid() {
    let engine = engine_with("card", fixture_unstyled_text());
    let options = default_options().with_validation(ValidationLevel::Basic);

    let result = engine.extract("card", &[], &options).unwrap();
    assert!(result.validation.valid);
    assert!(!result.validation.has_warning(codes::TEXT_STYLE_MISSING));
}

#[test]
fn unstyled_text_standard_warns() {
    let engine = engine_with("card", fixture_unstyled_text());
    let options = default_options().with_validation(ValidationLevel::Standard);

    let result = engine.extract("card", &[], &options).unwrap();
    assert!(result.validation.valid);
    assert!(!result.validation.warnings.is_empty());
    assert!(result.validation.has_warning(codes::TEXT_STYLE_MISSING));
}

#[test]
fn unstyled_text_strict_fails() {
    let engine = engine_with("card", fixture_unstyled_text());
    let options = default_options().with_validation(ValidationLevel::Strict);

    match engine.extract("card", &[], &options) {
        Err(ExtractionError::ValidationFailed(validation)) => {
            assert!(!validation.valid);
            assert!(validation.has_error(codes::TEXT_STYLE_MISSING));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn strict_failure_is_not_cached() {
    let engine = engine_with("card", fixture_unstyled_text());
    let options = default_options().with_validation(ValidationLevel::Strict);

    assert!(engine.extract("card", &[], &options).is_err());
    let cache = engine.cache_for(options.caching_strategy).unwrap();
    assert_eq!(cache.size(), 0);
}
