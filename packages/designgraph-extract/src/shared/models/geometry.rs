//! Geometry types
//!
//! Bounding boxes and transforms as reported by the design tool.

use serde::{Deserialize, Serialize};

/// 2x3 affine transform (`[[a, c, tx], [b, d, ty]]`)
pub type Transform = [[f64; 3]; 2];

/// Absolute bounding box + optional transform of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: None,
            transform: None,
        }
    }

    /// Create a zero-sized box at the origin
    pub fn zero() -> Self {
        Self::default()
    }

    /// All numeric fields are finite
    pub fn is_finite(&self) -> bool {
        let base = [self.x, self.y, self.width, self.height];
        let rotation_ok = self.rotation.map_or(true, f64::is_finite);
        let transform_ok = self
            .transform
            .map_or(true, |t| t.iter().flatten().all(|v| v.is_finite()));

        base.iter().all(|v| v.is_finite()) && rotation_ok && transform_ok
    }

    /// Width and height are finite and not negative
    pub fn has_valid_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}
