/*
 * DesignGraph Extract - design document tree extraction
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (DesignNode, Geometry, Paint)
 * - features/    : Vertical slices (extraction, cache, validation, performance)
 * - config/      : Presets + YAML config files
 *
 * Performance:
 * - Iterative bounded walk (no recursion on document depth)
 * - Rayon parallel traversal per selector
 * - DashMap result cache with tier promotion
 */

// Crate-level lint configuration
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules (extraction, cache, validation, performance)
pub mod features;

/// Configuration system (presets, YAML v1)
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, ExtractionConfigFile, Preset, Validatable};
pub use errors::{EngineResult, ErrorKind, ExtractionError};
pub use features::cache::{Cache, CacheConfig, CacheFactory, CachingStrategy};
pub use features::extraction::{
    CancellationToken, DesignTokens, Diagnostic, ExtractionEngine, ExtractionOptions,
    ExtractionResult, FileSourceProvider, HierarchyView, LayerInfo, OptimizationLevel,
    SourceProvider, StaticSourceProvider,
};
pub use features::performance::{PerformanceMetrics, PerformanceMonitor};
pub use features::validation::{ValidationLevel, ValidationResult, Validator};
pub use shared::models::{DesignNode, NodeType};

// ═══════════════════════════════════════════════════════════════════════════
// Rayon Thread Pool
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the global Rayon pool (75% of cores unless `threads` is given)
///
/// Only the first call has an effect; later calls are ignored.
pub fn init_thread_pool(threads: Option<usize>) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let threads = threads.unwrap_or_else(|| std::cmp::max(1, (cores * 3) / 4));

        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            Ok(()) => tracing::debug!("Rayon pool: {} threads ({} cores)", threads, cores),
            Err(e) => tracing::warn!("Rayon pool already initialized: {}", e),
        }
    });
}
