//! Type-directed token extraction
//!
//! - visible solid fills → `colors["<slug>-fill"]`, `colors["<slug>-fill-<i>"]`
//! - visible solid strokes → `colors["<slug>-stroke"]`, `colors["<slug>-stroke-<i>"]`
//! - text style → `typography["<slug>"]`
//! - auto-layout → `spacing["<slug>-padding-<side>"]`, `spacing["<slug>-gap"]`
//! - corner radius → `spacing["<slug>-radius"]`

use crate::features::extraction::domain::{DesignTokens, TypographyToken};
use crate::shared::models::{DesignNode, Paint};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").ok());

/// Lower-case, non-alphanumeric runs collapsed to `-`, trimmed
fn slugify(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let collapsed = match NON_ALNUM.as_ref() {
        Some(re) => re.replace_all(&lower, "-").into_owned(),
        None => lower,
    };
    collapsed.trim_matches('-').to_string()
}

/// Token name prefix for a node (name, then id, then `node`)
pub fn node_slug(node: &DesignNode) -> String {
    let from_name = slugify(&node.name);
    if !from_name.is_empty() {
        return from_name;
    }
    let from_id = slugify(&node.id);
    if !from_id.is_empty() {
        return from_id;
    }
    "node".to_string()
}

fn indexed(slug: &str, role: &str, index: usize) -> String {
    if index == 0 {
        format!("{}-{}", slug, role)
    } else {
        format!("{}-{}-{}", slug, role, index)
    }
}

fn solid_colors(paints: &[Paint]) -> Vec<String> {
    paints.iter().filter_map(Paint::css_color).collect()
}

/// Write this node's tokens into `tokens`, returning the names written
pub fn extract_tokens(node: &DesignNode, tokens: &mut DesignTokens) -> Vec<String> {
    let slug = node_slug(node);
    let mut names = Vec::new();

    for (i, color) in solid_colors(&node.visual.fills).into_iter().enumerate() {
        let name = indexed(&slug, "fill", i);
        tokens.colors.insert(name.clone(), color);
        names.push(name);
    }

    for (i, color) in solid_colors(&node.visual.strokes).into_iter().enumerate() {
        let name = indexed(&slug, "stroke", i);
        tokens.colors.insert(name.clone(), color);
        names.push(name);
    }

    if let Some(style) = node.text_style() {
        tokens.typography.insert(
            slug.clone(),
            TypographyToken {
                family: style.font_family.clone(),
                size: style.font_size,
                weight: style.font_weight,
                line_height: style.line_height,
                letter_spacing: style.letter_spacing,
            },
        );
        names.push(slug.clone());
    }

    if let Some(layout) = &node.layout {
        let sides = [
            ("padding-top", layout.padding_top),
            ("padding-right", layout.padding_right),
            ("padding-bottom", layout.padding_bottom),
            ("padding-left", layout.padding_left),
        ];
        for (side, value) in sides {
            let name = format!("{}-{}", slug, side);
            tokens.spacing.insert(name.clone(), value);
            names.push(name);
        }
        if let Some(gap) = layout.item_spacing {
            let name = format!("{}-gap", slug);
            tokens.spacing.insert(name.clone(), gap);
            names.push(name);
        }
    }

    if let Some(radius) = node.visual.corner_radius {
        let name = format!("{}-radius", slug);
        tokens.spacing.insert(name.clone(), radius);
        names.push(name);
    }

    names
}
