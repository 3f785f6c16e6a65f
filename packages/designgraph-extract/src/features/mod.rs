//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains (where it needs them):
//! - domain/     - Pure types and rules
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - Adapters and algorithms

// Result cache: Ephemeral / Tiered / NoOp behind one trait
pub mod cache;

// Bounded tree walk, token extraction, engine
pub mod extraction;

// Named timers and metric aggregation
pub mod performance;

// Level-based checks over extraction results
pub mod validation;
