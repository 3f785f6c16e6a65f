//! Hierarchy view: flat, ordered layer summary of a traversal

use crate::shared::models::{ComponentInstanceRef, NodeType, Position, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub position: Position,
    pub size: Size,
    /// Depth below the traversal root (root = 0)
    pub depth: usize,
    /// Nearest frame-like ancestor (frame, component, component set, section)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentInstanceRef>,
    /// Names of tokens extracted from this layer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
}

/// Read-only once built; see `HierarchyBuilder`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HierarchyView {
    layers: Vec<LayerInfo>,
    total_depth: usize,
    component_count: usize,
    text_layer_count: usize,
}

impl HierarchyView {
    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    /// Deepest layer depth reached (root = 0)
    pub fn total_depth(&self) -> usize {
        self.total_depth
    }

    /// Instances plus component definitions
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn text_layer_count(&self) -> usize {
        self.text_layer_count
    }

    pub fn layer(&self, id: &str) -> Option<&LayerInfo> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layers_in_frame<'a>(&'a self, frame_id: &'a str) -> impl Iterator<Item = &'a LayerInfo> {
        self.layers
            .iter()
            .filter(move |layer| layer.frame_id.as_deref() == Some(frame_id))
    }

    /// Concatenate views in order (one per traversal root)
    pub fn combine(views: impl IntoIterator<Item = HierarchyView>) -> Self {
        let mut builder = HierarchyBuilder::new();
        for view in views {
            for layer in view.layers {
                builder.push(layer);
            }
        }
        builder.build()
    }
}

/// Accumulates layers during a traversal
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    view: HierarchyView,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, layer: LayerInfo) {
        let view = &mut self.view;
        view.total_depth = view.total_depth.max(layer.depth);
        if layer.node_type.is_component_like() {
            view.component_count += 1;
        }
        if layer.node_type == NodeType::Text {
            view.text_layer_count += 1;
        }
        view.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.view.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.layers.is_empty()
    }

    pub fn build(self) -> HierarchyView {
        self.view
    }
}
