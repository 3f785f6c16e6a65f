//! Design tokens
//!
//! Token names are unique per map. On collision the later write wins, in
//! traversal order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographyToken {
    pub family: String,
    pub size: f64,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignTokens {
    /// Name → `#RRGGBB` or `rgba(r, g, b, a)`
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub typography: BTreeMap<String, TypographyToken>,
    #[serde(default)]
    pub spacing: BTreeMap<String, f64>,
}

impl DesignTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.typography.is_empty() && self.spacing.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len() + self.typography.len() + self.spacing.len()
    }

    /// Fold `other` in; its entries win on collision
    pub fn merge(&mut self, other: DesignTokens) {
        self.colors.extend(other.colors);
        self.typography.extend(other.typography);
        self.spacing.extend(other.spacing);
    }

    /// Any color token has exactly this value (case-insensitive)
    pub fn contains_color(&self, value: &str) -> bool {
        self.colors.values().any(|c| c.eq_ignore_ascii_case(value))
    }
}
