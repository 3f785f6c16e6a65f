//! Bounded tree walker
//!
//! Depth-first pre-order over one traversal root using an explicit stack, so
//! arbitrarily deep documents cannot overflow the call stack. Produces a
//! pruned owned copy of the walked subtree together with layers, tokens and
//! instance references, all in document order.

use super::token_extractor::extract_tokens;
use crate::errors::{EngineResult, ErrorKind, ExtractionError};
use crate::features::extraction::domain::{
    CancellationToken, DesignTokens, Diagnostic, ExtractionOptions, HierarchyBuilder,
    HierarchyView, LayerInfo, OptimizationLevel,
};
use crate::shared::models::{ComponentInstanceRef, DesignNode, NodeType};

/// Everything one traversal root produces
#[derive(Debug)]
pub struct TraversalOutput {
    pub tree: DesignNode,
    pub hierarchy: HierarchyView,
    pub tokens: DesignTokens,
    pub instances: Vec<ComponentInstanceRef>,
    pub diagnostics: Vec<Diagnostic>,
    pub nodes_visited: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct WalkLimits {
    pub max_depth: usize,
    pub max_nodes: usize,
    pub optimization: OptimizationLevel,
    /// Record `DEPTH_EXCEEDED` when children are cut at `max_depth`
    pub warn_on_truncate: bool,
}

impl WalkLimits {
    pub fn from_options(options: &ExtractionOptions) -> Self {
        Self {
            max_depth: options.effective_max_depth(),
            max_nodes: options.max_nodes,
            optimization: options.optimization_level,
            warn_on_truncate: options.include_children,
        }
    }
}

struct Pending<'a> {
    node: &'a DesignNode,
    depth: usize,
    parent: Option<usize>,
    frame_id: Option<String>,
}

struct Slot {
    node: Option<DesignNode>,
    parent: Option<usize>,
}

pub struct TreeWalker<'c> {
    limits: WalkLimits,
    cancel: Option<&'c CancellationToken>,
}

impl<'c> TreeWalker<'c> {
    pub fn new(limits: WalkLimits) -> Self {
        Self {
            limits,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: &'c CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Children the optimization level keeps
    fn keeps(&self, child: &DesignNode) -> bool {
        let level = self.limits.optimization;
        if level >= OptimizationLevel::Basic && !child.visible {
            return false;
        }
        if level >= OptimizationLevel::Standard
            && child.node_type == NodeType::Group
            && child.children.is_empty()
        {
            return false;
        }
        true
    }

    fn is_leaf(&self, node: &DesignNode) -> bool {
        self.limits.optimization == OptimizationLevel::Aggressive && node.node_type.is_vector_like()
    }

    pub fn walk(&self, root: &DesignNode) -> EngineResult<TraversalOutput> {
        let mut slots: Vec<Slot> = Vec::new();
        let mut hierarchy = HierarchyBuilder::new();
        let mut tokens = DesignTokens::new();
        let mut instances = Vec::new();
        let mut diagnostics = Vec::new();

        let mut stack = vec![Pending {
            node: root,
            depth: 0,
            parent: None,
            frame_id: None,
        }];

        while let Some(pending) = stack.pop() {
            if self.cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(ExtractionError::Cancelled);
            }

            if slots.len() >= self.limits.max_nodes {
                tracing::warn!(
                    "Node limit {} reached under {}, keeping partial result",
                    self.limits.max_nodes,
                    root.id
                );
                diagnostics.push(Diagnostic::new(
                    ErrorKind::NodeLimit,
                    format!(
                        "Stopped after {} nodes; {} pending node(s) skipped",
                        self.limits.max_nodes,
                        stack.len() + 1
                    ),
                    Some(pending.node.id.clone()),
                ));
                break;
            }

            let node = pending.node;
            let leaf = self.is_leaf(node);

            let mut copy = shallow_copy(node);
            if leaf {
                copy.visual.effects.clear();
            }

            let token_names = extract_tokens(&copy, &mut tokens);
            if let Some(component) = &node.component {
                instances.push(component.clone());
            }

            hierarchy.push(LayerInfo {
                id: node.id.clone(),
                name: node.name.clone(),
                node_type: node.node_type.clone(),
                position: node.geometry.position(),
                size: node.geometry.size(),
                depth: pending.depth,
                frame_id: pending.frame_id.clone(),
                component: node.component.clone(),
                tokens: token_names,
            });

            let index = slots.len();
            slots.push(Slot {
                node: Some(copy),
                parent: pending.parent,
            });

            if node.children.is_empty() || leaf {
                continue;
            }

            if pending.depth >= self.limits.max_depth {
                if self.limits.warn_on_truncate {
                    diagnostics.push(Diagnostic::new(
                        ErrorKind::DepthExceeded,
                        format!(
                            "{} child node(s) of '{}' truncated at depth {}",
                            node.children.len(),
                            node.name,
                            pending.depth
                        ),
                        Some(node.id.clone()),
                    ));
                }
                continue;
            }

            let child_frame = if node.node_type.is_frame_like() {
                Some(node.id.clone())
            } else {
                pending.frame_id.clone()
            };

            // Reverse push keeps document order on pop
            for child in node.children.iter().rev().filter(|c| self.keeps(c)) {
                stack.push(Pending {
                    node: child,
                    depth: pending.depth + 1,
                    parent: Some(index),
                    frame_id: child_frame.clone(),
                });
            }
        }

        let nodes_visited = slots.len();
        let tree = assemble(slots).ok_or_else(|| {
            ExtractionError::invalid_source(format!("Traversal of {} produced no nodes", root.id))
        })?;

        Ok(TraversalOutput {
            tree,
            hierarchy: hierarchy.build(),
            tokens,
            instances,
            diagnostics,
            nodes_visited,
        })
    }
}

/// Node without its children
fn shallow_copy(node: &DesignNode) -> DesignNode {
    DesignNode {
        id: node.id.clone(),
        name: node.name.clone(),
        node_type: node.node_type.clone(),
        geometry: node.geometry,
        visual: node.visual.clone(),
        text: node.text.clone(),
        layout: node.layout,
        visible: node.visible,
        component: node.component.clone(),
        children: Vec::new(),
    }
}

/// Rebuild the owned tree from pre-order slots
///
/// Children always sit at higher indices than their parent, so walking the
/// slots backwards attaches every subtree before its parent is moved.
fn assemble(mut slots: Vec<Slot>) -> Option<DesignNode> {
    for index in (1..slots.len()).rev() {
        let Some(mut node) = slots[index].node.take() else {
            continue;
        };
        node.children.reverse();

        if let Some(parent) = slots[index].parent {
            if let Some(parent_node) = slots[parent].node.as_mut() {
                parent_node.children.push(node);
            }
        }
    }

    let mut root = slots.first_mut()?.node.take()?;
    root.children.reverse();
    Some(root)
}
