//! Result validator
//!
//! Pure function over a candidate `ExtractionResult`. Checks are cumulative
//! per level; `total_checks` counts individual assertions (one per node for
//! node-level checks) so the ratio `passed_checks / total_checks` stays
//! meaningful across tree sizes.

use super::domain::{
    codes, Impact, Severity, ValidationError, ValidationLevel, ValidationMetadata,
    ValidationResult, ValidationWarning,
};
use crate::errors::ErrorKind;
use crate::features::extraction::ExtractionResult;
use crate::shared::models::{DesignNode, NodeType};
use chrono::Utc;
use std::collections::HashSet;
use std::time::Instant;

pub const VALIDATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Accumulates issues and check counts for one run
#[derive(Default)]
struct Report {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
    total: u32,
    passed: u32,
}

impl Report {
    fn pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    fn error(&mut self, code: &str, message: String, path: &str, severity: Severity) {
        self.total += 1;
        self.errors.push(ValidationError {
            code: code.to_string(),
            message,
            path: path.to_string(),
            severity,
        });
    }

    fn warn(&mut self, code: &str, message: String, path: &str, impact: Impact) {
        self.total += 1;
        self.warnings.push(ValidationWarning {
            code: code.to_string(),
            message,
            path: path.to_string(),
            impact,
        });
    }

    /// Type-consistency issue: warning at standard, error at strict
    fn consistency(&mut self, level: ValidationLevel, code: &str, message: String, path: &str) {
        if level == ValidationLevel::Strict {
            self.error(code, message, path, Severity::Medium);
        } else {
            self.warn(code, message, path, Impact::Medium);
        }
    }
}

/// Pre-order walk yielding each node with its id path
fn walk_with_paths(root: &DesignNode) -> Vec<(String, &DesignNode)> {
    let mut out = Vec::new();
    let mut stack = vec![(root.id.clone(), root)];

    while let Some((path, node)) = stack.pop() {
        for child in node.children.iter().rev() {
            stack.push((format!("{}/{}", path, child.id), child));
        }
        out.push((path, node));
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, candidate: &ExtractionResult, level: ValidationLevel) -> ValidationResult {
        let start = Instant::now();
        let mut report = Report::default();

        if level >= ValidationLevel::Basic {
            Self::check_structure(candidate, &mut report);
        }
        if level >= ValidationLevel::Standard {
            Self::check_type_consistency(candidate, level, &mut report);
            Self::check_diagnostics(candidate, &mut report);
            Self::check_tokens(candidate, &mut report);
        }
        if level >= ValidationLevel::Strict {
            Self::check_references(candidate, &mut report);
            Self::check_geometry(candidate, &mut report);
        }

        let result = ValidationResult {
            valid: report.errors.is_empty(),
            errors: report.errors,
            warnings: report.warnings,
            metadata: ValidationMetadata {
                validated_at: Utc::now(),
                validator_version: VALIDATOR_VERSION.to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                total_checks: report.total,
                passed_checks: report.passed,
            },
        };

        tracing::debug!(
            "Validation ({}) finished: {} error(s), {} warning(s), {}/{} checks passed",
            level,
            result.errors.len(),
            result.warnings.len(),
            result.metadata.passed_checks,
            result.metadata.total_checks
        );
        result
    }

    /// Root present, ids non-empty, ids unique within each traversal root
    fn check_structure(candidate: &ExtractionResult, report: &mut Report) {
        if candidate.metadata.is_empty() {
            report.error(
                codes::ROOT_MISSING,
                "Result has no root node".to_string(),
                "",
                Severity::Critical,
            );
            return;
        }
        report.pass();

        for root in &candidate.metadata {
            let mut seen = HashSet::new();
            for (path, node) in walk_with_paths(root) {
                if node.id.is_empty() {
                    report.error(
                        codes::NODE_ID_MISSING,
                        format!("Node '{}' has no id", node.name),
                        &path,
                        Severity::High,
                    );
                    continue;
                }
                report.pass();

                if seen.insert(node.id.as_str()) {
                    report.pass();
                } else {
                    report.error(
                        codes::DUPLICATE_NODE_ID,
                        format!("Node id '{}' appears more than once", node.id),
                        &path,
                        Severity::High,
                    );
                }
            }
        }
    }

    fn check_type_consistency(
        candidate: &ExtractionResult,
        level: ValidationLevel,
        report: &mut Report,
    ) {
        for root in &candidate.metadata {
            for (path, node) in walk_with_paths(root) {
                match node.node_type {
                    NodeType::Text if node.text_style().is_none() => report.consistency(
                        level,
                        codes::TEXT_STYLE_MISSING,
                        format!("Text node '{}' has no text style", node.name),
                        &path,
                    ),
                    NodeType::Instance => {
                        let has_master = node
                            .component
                            .as_ref()
                            .is_some_and(|c| !c.master_component_id.is_empty());
                        if has_master {
                            report.pass();
                        } else {
                            report.consistency(
                                level,
                                codes::INSTANCE_MASTER_MISSING,
                                format!("Instance '{}' has no master component id", node.name),
                                &path,
                            );
                        }
                    }
                    _ => report.pass(),
                }
            }
        }
    }

    /// Surface traversal diagnostics as warnings
    fn check_diagnostics(candidate: &ExtractionResult, report: &mut Report) {
        if candidate.diagnostics.is_empty() {
            report.pass();
            return;
        }

        for diagnostic in &candidate.diagnostics {
            let (code, impact) = match diagnostic.kind {
                ErrorKind::DepthExceeded => (codes::DEPTH_EXCEEDED, Impact::Low),
                ErrorKind::NodeLimit => (codes::NODE_LIMIT, Impact::Medium),
                ErrorKind::MalformedBranch => (codes::MALFORMED_BRANCH, Impact::Medium),
                _ => continue,
            };
            let path = diagnostic.node_id.as_deref().unwrap_or_default();
            report.warn(code, diagnostic.message.clone(), path, impact);
        }
    }

    fn check_tokens(candidate: &ExtractionResult, report: &mut Report) {
        if candidate.design_tokens.is_empty() {
            report.warn(
                codes::EMPTY_TOKENS,
                "No design tokens were extracted".to_string(),
                "",
                Impact::Info,
            );
        } else {
            report.pass();
        }
    }

    /// Every master id must be a node visited by this extraction
    fn check_references(candidate: &ExtractionResult, report: &mut Report) {
        let visited: HashSet<&str> = candidate
            .metadata
            .iter()
            .flat_map(|root| root.iter().map(|(_, node)| node.id.as_str()))
            .collect();

        for instance in &candidate.component_instances {
            if instance.master_component_id.is_empty() {
                // Already reported by the consistency check
                continue;
            }
            if visited.contains(instance.master_component_id.as_str()) {
                report.pass();
            } else {
                report.error(
                    codes::UNRESOLVED_COMPONENT,
                    format!(
                        "Instance '{}' references component '{}' outside this extraction",
                        instance.instance_id, instance.master_component_id
                    ),
                    &instance.instance_id,
                    Severity::High,
                );
            }
        }
    }

    fn check_geometry(candidate: &ExtractionResult, report: &mut Report) {
        for root in &candidate.metadata {
            for (path, node) in walk_with_paths(root) {
                if node.geometry.is_finite() && node.geometry.has_valid_size() {
                    report.pass();
                } else {
                    report.error(
                        codes::INVALID_GEOMETRY,
                        format!(
                            "Node '{}' has invalid geometry ({} x {} at {}, {})",
                            node.name,
                            node.geometry.width,
                            node.geometry.height,
                            node.geometry.x,
                            node.geometry.y
                        ),
                        &path,
                        Severity::High,
                    );
                }
            }
        }
    }
}
