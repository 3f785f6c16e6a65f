//! Performance instrumentation

mod metrics;
mod monitor;

pub use metrics::{MetricRecord, MetricUnit, PerformanceMetrics};
pub use monitor::{PerformanceMonitor, TimerId};
