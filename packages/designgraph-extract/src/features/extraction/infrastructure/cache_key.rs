//! Deterministic cache keys for traversal results

use crate::features::extraction::domain::ExtractionOptions;

pub const CACHE_KEY_PREFIX: &str = "extract:";

fn update_part(hasher: &mut blake3::Hasher, part: &[u8]) {
    // Length prefix keeps ("ab", "c") distinct from ("a", "bc")
    hasher.update(&(part.len() as u64).to_le_bytes());
    hasher.update(part);
}

/// Key for one traversal root of a call
///
/// `blake3(source_ref ‖ sorted(selectors) ‖ canonical_json(options) ‖ root)`,
/// where `root` is the selector being traversed (empty for the document root).
pub fn traversal_cache_key(
    source_ref: &str,
    sorted_selectors: &[String],
    options: &ExtractionOptions,
    root: &str,
) -> String {
    let mut hasher = blake3::Hasher::new();
    update_part(&mut hasher, source_ref.as_bytes());

    hasher.update(&(sorted_selectors.len() as u64).to_le_bytes());
    for selector in sorted_selectors {
        update_part(&mut hasher, selector.as_bytes());
    }

    update_part(&mut hasher, options.canonical_json().as_bytes());
    update_part(&mut hasher, root.as_bytes());

    format!("{}{}", CACHE_KEY_PREFIX, hasher.finalize().to_hex())
}
