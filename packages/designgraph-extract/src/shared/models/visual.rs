//! Visual property types (paints, effects, text style, auto-layout)

use serde::{Deserialize, Serialize};

fn default_one() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// RGBA color with channels in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_one")]
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return None;
        }

        let channel = |i: usize| -> Option<f64> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f64 / 255.0)
        };

        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    fn byte(channel: f64) -> u8 {
        (channel.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// CSS representation with the paint opacity folded into alpha.
    ///
    /// Opaque colors render as `#RRGGBB`, translucent ones as `rgba(r, g, b, a)`.
    pub fn to_css(&self, opacity: f64) -> String {
        let alpha = (self.a * opacity).clamp(0.0, 1.0);
        let (r, g, b) = (Self::byte(self.r), Self::byte(self.g), Self::byte(self.b));

        if alpha >= 0.995 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {:.2})", r, g, b, alpha)
        }
    }
}

/// Gradient color stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: Rgba,
}

/// Fill or stroke paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    Solid {
        color: Rgba,
        #[serde(default = "default_one")]
        opacity: f64,
        #[serde(default = "default_true")]
        visible: bool,
    },
    Gradient {
        kind: String,
        stops: Vec<GradientStop>,
        #[serde(default = "default_true")]
        visible: bool,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_ref: Option<String>,
        #[serde(default = "default_true")]
        visible: bool,
    },
    Unknown {
        raw_type: String,
    },
}

impl Paint {
    pub fn solid(color: Rgba) -> Self {
        Paint::Solid {
            color,
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Paint::Solid { visible, .. }
            | Paint::Gradient { visible, .. }
            | Paint::Image { visible, .. } => *visible,
            Paint::Unknown { .. } => false,
        }
    }

    /// CSS color of a visible solid paint
    pub fn css_color(&self) -> Option<String> {
        match self {
            Paint::Solid {
                color,
                opacity,
                visible: true,
            } => Some(color.to_css(*opacity)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
}

impl EffectKind {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "DROP_SHADOW" => Some(Self::DropShadow),
            "INNER_SHADOW" => Some(Self::InnerShadow),
            "LAYER_BLUR" => Some(Self::LayerBlur),
            "BACKGROUND_BLUR" => Some(Self::BackgroundBlur),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    #[serde(default)]
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// Fills, strokes, corner radius, effects and opacity (all optional)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualProps {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl VisualProps {
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
            && self.strokes.is_empty()
            && self.stroke_weight.is_none()
            && self.corner_radius.is_none()
            && self.effects.is_empty()
            && self.opacity.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
}

impl TextStyle {
    pub fn new(font_family: impl Into<String>, font_size: f64, font_weight: u32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            font_weight,
            line_height: None,
            letter_spacing: None,
        }
    }
}

/// Text payload carried by text nodes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextData {
    #[serde(default)]
    pub characters: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
}

/// Auto-layout padding and gap
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AutoLayout {
    #[serde(default)]
    pub padding_top: f64,
    #[serde(default)]
    pub padding_right: f64,
    #[serde(default)]
    pub padding_bottom: f64,
    #[serde(default)]
    pub padding_left: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
}
