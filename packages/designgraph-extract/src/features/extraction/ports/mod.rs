//! Extraction ports

mod source_provider;

pub use source_provider::{SourceDocument, SourceProvider};
