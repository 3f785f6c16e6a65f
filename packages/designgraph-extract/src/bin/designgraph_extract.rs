//! DesignGraph Extract CLI
//!
//! # Usage
//!
//! ```bash
//! # Extract the whole document in ./designs/login.json
//! designgraph-extract extract --source-dir designs --source login --pretty
//!
//! # Two frames, thorough preset, depth override
//! designgraph-extract extract --source-dir designs --source login \
//!     --select 1:2 --select 1:7 --preset thorough --max-depth 8
//!
//! # Options from a YAML v1 config file
//! designgraph-extract extract --source-dir designs --source login --config extract.yaml
//!
//! # List presets
//! designgraph-extract presets
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `designgraph_extract=info`); the
//! result JSON goes to stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use designgraph_extract::config::{ExtractionConfigFile, Preset, ResolvedConfig};
use designgraph_extract::features::cache::{CacheConfig, CacheFactory, CachingStrategy};
use designgraph_extract::{
    init_thread_pool, ExtractionEngine, ExtractionError, FileSourceProvider, ValidationLevel,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "designgraph-extract")]
#[command(about = "Extract hierarchy, components and design tokens from design documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one extraction and print the result JSON
    Extract {
        /// Directory holding `<source>.json` documents
        #[arg(long)]
        source_dir: PathBuf,

        /// Document name (file stem under --source-dir)
        #[arg(short, long)]
        source: String,

        /// Node id to use as a traversal root (repeatable; default: document root)
        #[arg(long = "select")]
        selectors: Vec<String>,

        /// YAML v1 config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preset (fast, balanced, thorough); replaces the config file's preset
        #[arg(short, long)]
        preset: Option<Preset>,

        /// Override max_depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Override validation level (none, basic, standard, strict)
        #[arg(long)]
        validation: Option<ValidationLevel>,

        /// Override caching strategy (none, memory, disk, hybrid)
        #[arg(long)]
        caching: Option<CachingStrategy>,

        /// Rayon worker threads (default: 75% of cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List presets and the options they produce
    Presets,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("designgraph_extract=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            source_dir,
            source,
            selectors,
            config,
            preset,
            max_depth,
            validation,
            caching,
            threads,
            pretty,
        } => {
            init_thread_pool(threads);

            let mut file = match &config {
                Some(path) => ExtractionConfigFile::from_yaml_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => ExtractionConfigFile::new(Preset::default()),
            };
            if let Some(preset) = preset {
                file.preset = preset;
            }

            let ResolvedConfig {
                mut options,
                cache,
            } = file.resolve().context("Invalid configuration")?;

            if let Some(depth) = max_depth {
                options.max_depth = depth;
            }
            if let Some(level) = validation {
                options.validation_level = level;
            }
            if let Some(strategy) = caching {
                options.caching_strategy = strategy;
            }

            let engine = build_engine(source_dir, cache);
            let result = match engine.extract(&source, &selectors, &options) {
                Ok(result) => result,
                Err(ExtractionError::ValidationFailed(validation)) => {
                    eprintln!("{}", serde_json::to_string_pretty(&validation)?);
                    anyhow::bail!(
                        "Strict validation failed with {} error(s)",
                        validation.errors.len()
                    );
                }
                Err(e) => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("Extraction of '{}' failed", source)))
                }
            };

            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", json);
        }

        Commands::Presets => {
            println!(
                "{:<10} {:>9} {:<12} {:<10} DESCRIPTION",
                "PRESET", "MAX_DEPTH", "OPTIMIZE", "VALIDATE"
            );
            for preset in Preset::ALL {
                let options = preset.options();
                println!(
                    "{:<10} {:>9} {:<12} {:<10} {}",
                    preset.as_str(),
                    options.max_depth,
                    options.optimization_level.as_str(),
                    options.validation_level.as_str(),
                    preset.description()
                );
            }
        }
    }

    Ok(())
}

fn build_engine(source_dir: PathBuf, cache: CacheConfig) -> ExtractionEngine {
    let provider = FileSourceProvider::new(source_dir);
    ExtractionEngine::new(Arc::new(provider)).with_cache_factory(CacheFactory::new(cache))
}
