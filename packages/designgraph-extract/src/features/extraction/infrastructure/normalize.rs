//! Raw document normalizer
//!
//! Converts the design tool's loosely typed JSON node tree into `DesignNode`.
//! Only a root that is not an object is fatal; anything wrong below the root
//! drops that branch (or field) and leaves a `MALFORMED_BRANCH` diagnostic.

use crate::errors::ErrorKind;
use crate::features::extraction::domain::Diagnostic;
use crate::shared::models::{
    AutoLayout, ComponentInstanceRef, DesignNode, Effect, EffectKind, Geometry, GradientStop,
    NodeType, Paint, Rgba, TextData, TextStyle, Transform, VisualProps,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Document root is not a JSON object (found {0})")]
    NotAnObject(&'static str),
}

/// Normalized tree plus downgraded problems
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    pub root: DesignNode,
    pub diagnostics: Vec<Diagnostic>,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn normalize_str(json: &str) -> Result<NormalizedDocument, NormalizeError> {
    let value: Value = serde_json::from_str(json)?;
    normalize_document(&value)
}

/// Accepts a bare node or a `{ "document": node }` envelope
pub fn normalize_document(value: &Value) -> Result<NormalizedDocument, NormalizeError> {
    let root = match value.get("document") {
        Some(document) if document.is_object() => document,
        _ => value,
    };
    let Some(root_obj) = root.as_object() else {
        return Err(NormalizeError::NotAnObject(kind_of(root)));
    };

    let mut diagnostics = Vec::new();
    let root = Normalizer {
        diagnostics: &mut diagnostics,
    }
    .tree(root_obj);

    for diagnostic in &diagnostics {
        tracing::warn!(
            "Malformed branch under {}: {}",
            diagnostic.node_id.as_deref().unwrap_or("<root>"),
            diagnostic.message
        );
    }

    Ok(NormalizedDocument { root, diagnostics })
}

struct Normalizer<'d> {
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl Normalizer<'_> {
    fn malformed(&mut self, parent_id: &str, message: String) {
        self.diagnostics.push(Diagnostic::new(
            ErrorKind::MalformedBranch,
            message,
            Some(parent_id.to_string()),
        ));
    }

    /// Iterative build: (raw object, parent slot) in pre-order, then assemble
    fn tree(&mut self, root: &Map<String, Value>) -> DesignNode {
        let mut nodes: Vec<(DesignNode, Option<usize>)> = Vec::new();
        let mut stack: Vec<(&Map<String, Value>, Option<usize>)> = vec![(root, None)];

        while let Some((raw, parent)) = stack.pop() {
            let node = self.node(raw);
            let index = nodes.len();
            let node_id = node.id.clone();
            nodes.push((node, parent));

            match raw.get("children") {
                None | Some(Value::Null) => {}
                Some(Value::Array(children)) => {
                    for (i, child) in children.iter().enumerate().rev() {
                        match child.as_object() {
                            Some(obj) => stack.push((obj, Some(index))),
                            None => self.malformed(
                                &node_id,
                                format!("children[{}] is a {}, not a node", i, kind_of(child)),
                            ),
                        }
                    }
                }
                Some(other) => self.malformed(
                    &node_id,
                    format!("children is a {}, not an array", kind_of(other)),
                ),
            }
        }

        // Pre-order: children sit after their parent
        let mut slots: Vec<Option<(DesignNode, Option<usize>)>> =
            nodes.into_iter().map(Some).collect();
        for index in (1..slots.len()).rev() {
            if let Some((mut node, Some(parent))) = slots[index].take() {
                node.children.reverse();
                if let Some((parent_node, _)) = slots[parent].as_mut() {
                    parent_node.children.push(node);
                }
            }
        }

        match slots.first_mut().and_then(Option::take) {
            Some((mut root, _)) => {
                root.children.reverse();
                root
            }
            None => DesignNode::new("", "", NodeType::Unknown(String::new())),
        }
    }

    fn node(&mut self, raw: &Map<String, Value>) -> DesignNode {
        let id = str_field(raw, "id").unwrap_or_default().to_string();
        let name = str_field(raw, "name").unwrap_or_default().to_string();
        let node_type = NodeType::from_raw(str_field(raw, "type").unwrap_or_default());

        let mut node = DesignNode::new(id, name, node_type);
        node.visible = raw.get("visible").and_then(Value::as_bool).unwrap_or(true);
        node.geometry = geometry(raw);
        node.visual = self.visual(raw, &node.id);
        node.layout = layout(raw);

        if node.node_type == NodeType::Text || raw.contains_key("characters") {
            node.text = Some(TextData {
                characters: str_field(raw, "characters").unwrap_or_default().to_string(),
                style: raw.get("style").and_then(text_style),
            });
        }

        if node.node_type == NodeType::Instance || raw.contains_key("componentId") {
            node.component = Some(component_ref(raw, &node.id));
        }

        node
    }

    fn visual(&mut self, raw: &Map<String, Value>, node_id: &str) -> VisualProps {
        VisualProps {
            fills: self.paints(raw, "fills", node_id),
            strokes: self.paints(raw, "strokes", node_id),
            stroke_weight: num_field(raw, "strokeWeight"),
            corner_radius: num_field(raw, "cornerRadius"),
            effects: self.effects(raw, node_id),
            opacity: num_field(raw, "opacity"),
        }
    }

    fn paints(&mut self, raw: &Map<String, Value>, field: &str, node_id: &str) -> Vec<Paint> {
        let Some(items) = self.array_field(raw, field, node_id) else {
            return Vec::new();
        };
        items.iter().filter_map(Value::as_object).map(paint).collect()
    }

    fn effects(&mut self, raw: &Map<String, Value>, node_id: &str) -> Vec<Effect> {
        let Some(items) = self.array_field(raw, "effects", node_id) else {
            return Vec::new();
        };
        items.iter().filter_map(Value::as_object).filter_map(effect).collect()
    }

    /// Optional array field; a present non-array is reported and ignored
    fn array_field<'v>(
        &mut self,
        raw: &'v Map<String, Value>,
        field: &str,
        node_id: &str,
    ) -> Option<&'v Vec<Value>> {
        match raw.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                self.malformed(
                    node_id,
                    format!("{} is a {}, not an array", field, kind_of(other)),
                );
                None
            }
        }
    }
}

fn str_field<'v>(raw: &'v Map<String, Value>, field: &str) -> Option<&'v str> {
    raw.get(field).and_then(Value::as_str)
}

fn num_field(raw: &Map<String, Value>, field: &str) -> Option<f64> {
    raw.get(field).and_then(Value::as_f64)
}

fn geometry(raw: &Map<String, Value>) -> Geometry {
    let bbox = raw
        .get("absoluteBoundingBox")
        .and_then(Value::as_object)
        .unwrap_or(raw);

    let mut geometry = Geometry::new(
        num_field(bbox, "x").unwrap_or(0.0),
        num_field(bbox, "y").unwrap_or(0.0),
        num_field(bbox, "width").unwrap_or(0.0),
        num_field(bbox, "height").unwrap_or(0.0),
    );
    geometry.rotation = num_field(raw, "rotation");
    geometry.transform = raw.get("relativeTransform").and_then(transform);
    geometry
}

fn transform(value: &Value) -> Option<Transform> {
    let rows = value.as_array()?;
    if rows.len() != 2 {
        return None;
    }

    let mut out = [[0.0; 3]; 2];
    for (r, row) in rows.iter().enumerate() {
        let cols = row.as_array()?;
        if cols.len() != 3 {
            return None;
        }
        for (c, col) in cols.iter().enumerate() {
            out[r][c] = col.as_f64()?;
        }
    }
    Some(out)
}

fn color(value: &Value) -> Option<Rgba> {
    if let Some(hex) = value.as_str() {
        return Rgba::from_hex(hex);
    }
    let obj = value.as_object()?;
    Some(Rgba::new(
        num_field(obj, "r")?,
        num_field(obj, "g")?,
        num_field(obj, "b")?,
        num_field(obj, "a").unwrap_or(1.0),
    ))
}

fn paint(raw: &Map<String, Value>) -> Paint {
    let raw_type = str_field(raw, "type").unwrap_or_default();
    let visible = raw.get("visible").and_then(Value::as_bool).unwrap_or(true);

    match raw_type {
        "SOLID" => match raw.get("color").and_then(color) {
            Some(color) => Paint::Solid {
                color,
                opacity: num_field(raw, "opacity").unwrap_or(1.0),
                visible,
            },
            None => Paint::Unknown {
                raw_type: raw_type.to_string(),
            },
        },
        t if t.starts_with("GRADIENT_") => {
            let stops = raw
                .get("gradientStops")
                .and_then(Value::as_array)
                .map(|stops| {
                    stops
                        .iter()
                        .filter_map(|stop| {
                            Some(GradientStop {
                                position: stop.get("position")?.as_f64()?,
                                color: color(stop.get("color")?)?,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            Paint::Gradient {
                kind: t.trim_start_matches("GRADIENT_").to_ascii_lowercase(),
                stops,
                visible,
            }
        }
        "IMAGE" => Paint::Image {
            image_ref: str_field(raw, "imageRef").map(str::to_string),
            visible,
        },
        other => Paint::Unknown {
            raw_type: other.to_string(),
        },
    }
}

fn effect(raw: &Map<String, Value>) -> Option<Effect> {
    let kind = EffectKind::from_raw(str_field(raw, "type")?)?;
    let offset = raw
        .get("offset")
        .and_then(Value::as_object)
        .map(|o| (num_field(o, "x").unwrap_or(0.0), num_field(o, "y").unwrap_or(0.0)));

    Some(Effect {
        kind,
        radius: num_field(raw, "radius").unwrap_or(0.0),
        offset,
        color: raw.get("color").and_then(color),
        visible: raw.get("visible").and_then(Value::as_bool).unwrap_or(true),
    })
}

fn text_style(value: &Value) -> Option<TextStyle> {
    let raw = value.as_object()?;
    let family = str_field(raw, "fontFamily")?;
    let size = num_field(raw, "fontSize")?;
    let weight = num_field(raw, "fontWeight").unwrap_or(400.0);

    let mut style = TextStyle::new(family, size, weight.round().clamp(1.0, 1000.0) as u32);
    style.line_height = num_field(raw, "lineHeightPx");
    style.letter_spacing = num_field(raw, "letterSpacing");
    Some(style)
}

fn layout(raw: &Map<String, Value>) -> Option<AutoLayout> {
    const FIELDS: [&str; 5] = [
        "paddingTop",
        "paddingRight",
        "paddingBottom",
        "paddingLeft",
        "itemSpacing",
    ];
    let has_layout = raw.get("layoutMode").and_then(Value::as_str).is_some_and(|m| m != "NONE")
        || FIELDS.iter().any(|f| raw.contains_key(*f));
    if !has_layout {
        return None;
    }

    Some(AutoLayout {
        padding_top: num_field(raw, "paddingTop").unwrap_or(0.0),
        padding_right: num_field(raw, "paddingRight").unwrap_or(0.0),
        padding_bottom: num_field(raw, "paddingBottom").unwrap_or(0.0),
        padding_left: num_field(raw, "paddingLeft").unwrap_or(0.0),
        item_spacing: num_field(raw, "itemSpacing"),
    })
}

fn component_ref(raw: &Map<String, Value>, node_id: &str) -> ComponentInstanceRef {
    let mut component = ComponentInstanceRef::new(
        node_id,
        str_field(raw, "componentId").unwrap_or_default(),
    );

    if let Some(overrides) = raw.get("overrides").and_then(Value::as_array) {
        component.overrides = overrides
            .iter()
            .filter_map(|o| o.as_str().or_else(|| o.get("id").and_then(Value::as_str)))
            .map(str::to_string)
            .collect();
    }

    let mut variants = BTreeMap::new();
    if let Some(props) = raw.get("variantProperties").and_then(Value::as_object) {
        for (key, value) in props {
            if let Some(value) = value.as_str() {
                variants.insert(key.clone(), value.to_string());
            }
        }
    }
    if let Some(props) = raw.get("componentProperties").and_then(Value::as_object) {
        for (key, prop) in props {
            let value = prop.get("value").unwrap_or(prop);
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            variants.insert(key.clone(), rendered);
        }
    }
    component.variant_properties = variants;
    component
}
