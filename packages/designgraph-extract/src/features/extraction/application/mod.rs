//! Extraction application layer

mod engine;

pub use engine::ExtractionEngine;
