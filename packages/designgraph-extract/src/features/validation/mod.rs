//! Result validation
//!
//! Levels are cumulative: `basic` checks structure, `standard` adds type
//! consistency and traversal warnings, `strict` turns consistency issues into
//! errors and adds cross-reference and geometry checks.

mod domain;
mod validator;

pub use domain::*;
pub use validator::{Validator, VALIDATOR_VERSION};
