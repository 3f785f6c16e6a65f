//! Design tree extraction
//!
//! - `domain`: options, results, hierarchy view, tokens
//! - `ports`: `SourceProvider`
//! - `infrastructure`: walker, token rules, normalizer, provider adapters
//! - `application`: `ExtractionEngine`

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::ExtractionEngine;
pub use domain::*;
pub use infrastructure::{
    normalize_document, normalize_str, FileSourceProvider, NormalizeError, NormalizedDocument,
    StaticSourceProvider,
};
pub use ports::{SourceDocument, SourceProvider};
