//! Configuration
//!
//! Three levels, from simplest to most explicit:
//! - Preset: `Preset::Balanced.options()`
//! - Builder overrides: `Preset::Fast.options().with_max_depth(4)`
//! - YAML v1 file: `ExtractionConfigFile::from_yaml_file("extract.yaml")?.resolve()?`
//!
//! Everything that leaves this module has passed `Validatable` range checks.

pub mod error;
pub mod io;
pub mod preset;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::{CacheSection, ExtractionConfigFile, OptionOverrides, ResolvedConfig};
pub use preset::Preset;
pub use validation::{Validatable, MAX_DEPTH_LIMIT, MAX_NODES_LIMIT};
