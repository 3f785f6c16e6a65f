//! Extraction infrastructure: walker, token rules, normalizer, adapters

pub mod cache_key;
pub mod normalize;
pub mod source_providers;
pub mod token_extractor;
pub mod traversal;

pub use cache_key::traversal_cache_key;
pub use normalize::{normalize_document, normalize_str, NormalizeError, NormalizedDocument};
pub use source_providers::{FileSourceProvider, StaticSourceProvider};
pub use token_extractor::{extract_tokens, node_slug};
pub use traversal::{TraversalOutput, TreeWalker, WalkLimits};
