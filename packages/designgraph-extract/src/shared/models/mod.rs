//! Shared models
//!
//! The design-node tree and its visual payloads. Everything here is plain
//! serde data with no behavior beyond construction and read-only queries.

mod design_node;
mod geometry;
mod visual;

pub use design_node::{ComponentInstanceRef, DesignNode, NodeType, PreOrder};
pub use geometry::{Geometry, Position, Size, Transform};
pub use visual::{
    AutoLayout, Effect, EffectKind, GradientStop, Paint, Rgba, TextData, TextStyle, VisualProps,
};
