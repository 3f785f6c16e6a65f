//! Extraction domain types

mod cancellation;
mod hierarchy;
mod options;
mod result;
mod tokens;

pub use cancellation::CancellationToken;
pub use hierarchy::{HierarchyBuilder, HierarchyView, LayerInfo};
pub use options::{ExtractionOptions, OptimizationLevel, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};
pub use result::{Diagnostic, ExtractionResult, RESULT_VERSION};
pub use tokens::{DesignTokens, TypographyToken};
