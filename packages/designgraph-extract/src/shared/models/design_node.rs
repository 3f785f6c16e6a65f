//! Design node tree model
//!
//! A `DesignNode` owns its children exclusively; the tree is acyclic with a
//! single root. Instances point at their master component through a plain id
//! (`ComponentInstanceRef::master_component_id`), never through ownership.

use super::geometry::Geometry;
use super::visual::{AutoLayout, Paint, Rgba, TextData, TextStyle, VisualProps};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node type discriminant (closed set + raw fallback)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Vector,
    BooleanOperation,
    Rectangle,
    Ellipse,
    Line,
    Star,
    Polygon,
    Text,
    Component,
    ComponentSet,
    Instance,
    Slice,
    /// Type string the extractor does not know about
    Unknown(String),
}

impl NodeType {
    /// Map the design tool's upper-case type string
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "DOCUMENT" => Self::Document,
            "CANVAS" | "PAGE" => Self::Canvas,
            "FRAME" => Self::Frame,
            "GROUP" => Self::Group,
            "SECTION" => Self::Section,
            "VECTOR" => Self::Vector,
            "BOOLEAN_OPERATION" => Self::BooleanOperation,
            "RECTANGLE" => Self::Rectangle,
            "ELLIPSE" => Self::Ellipse,
            "LINE" => Self::Line,
            "STAR" => Self::Star,
            "REGULAR_POLYGON" | "POLYGON" => Self::Polygon,
            "TEXT" => Self::Text,
            "COMPONENT" => Self::Component,
            "COMPONENT_SET" => Self::ComponentSet,
            "INSTANCE" => Self::Instance,
            "SLICE" => Self::Slice,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "document",
            Self::Canvas => "canvas",
            Self::Frame => "frame",
            Self::Group => "group",
            Self::Section => "section",
            Self::Vector => "vector",
            Self::BooleanOperation => "boolean_operation",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Star => "star",
            Self::Polygon => "polygon",
            Self::Text => "text",
            Self::Component => "component",
            Self::ComponentSet => "component_set",
            Self::Instance => "instance",
            Self::Slice => "slice",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Nodes that open a new frame scope in the hierarchy view
    pub fn is_frame_like(&self) -> bool {
        matches!(
            self,
            Self::Frame | Self::Component | Self::ComponentSet | Self::Section
        )
    }

    /// Path-based shapes (children are geometry detail, not layers)
    pub fn is_vector_like(&self) -> bool {
        matches!(
            self,
            Self::Vector | Self::BooleanOperation | Self::Star | Self::Polygon | Self::Line
        )
    }

    /// Component definitions and instances
    pub fn is_component_like(&self) -> bool {
        matches!(self, Self::Component | Self::Instance)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weak reference from an instance to its master component
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentInstanceRef {
    pub instance_id: String,
    pub master_component_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variant_properties: BTreeMap<String, String>,
}

impl ComponentInstanceRef {
    pub fn new(instance_id: impl Into<String>, master_component_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            master_component_id: master_component_id.into(),
            overrides: Vec::new(),
            variant_properties: BTreeMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// One node of the design tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignNode {
    /// Stable id (empty when the source omitted it)
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "VisualProps::is_empty")]
    pub visual: VisualProps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<AutoLayout>,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Present on instances only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentInstanceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            geometry: Geometry::zero(),
            visual: VisualProps::default(),
            text: None,
            layout: None,
            visible: true,
            component: None,
            children: Vec::new(),
        }
    }

    pub fn frame(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeType::Frame)
    }

    /// Text node with optional style
    pub fn text(
        id: impl Into<String>,
        name: impl Into<String>,
        characters: impl Into<String>,
        style: Option<TextStyle>,
    ) -> Self {
        let mut node = Self::new(id, name, NodeType::Text);
        node.text = Some(TextData {
            characters: characters.into(),
            style,
        });
        node
    }

    /// Instance node pointing at `master_component_id`
    pub fn instance(
        id: impl Into<String>,
        name: impl Into<String>,
        master_component_id: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let mut node = Self::new(id.clone(), name, NodeType::Instance);
        node.component = Some(ComponentInstanceRef::new(id, master_component_id));
        node
    }

    pub fn with_child(mut self, child: DesignNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = DesignNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_geometry(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.geometry = Geometry::new(x, y, width, height);
        self
    }

    pub fn with_fill(mut self, color: Rgba) -> Self {
        self.visual.fills.push(Paint::solid(color));
        self
    }

    pub fn with_stroke(mut self, color: Rgba) -> Self {
        self.visual.strokes.push(Paint::solid(color));
        self
    }

    pub fn with_layout(mut self, layout: AutoLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        self.text.as_ref().and_then(|t| t.style.as_ref())
    }

    /// Pre-order iterator yielding `(depth, node)`, root at depth 0
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![(0, self)],
        }
    }

    /// Deepest depth in this subtree (root = 0)
    pub fn max_depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Find a descendant (or self) by id
    pub fn find(&self, id: &str) -> Option<&DesignNode> {
        self.iter().map(|(_, node)| node).find(|node| node.id == id)
    }
}

/// Explicit-stack pre-order traversal
pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a DesignNode)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a DesignNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Reverse push keeps document order on pop
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
