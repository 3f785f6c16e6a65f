//! Performance monitor: named timers + metric samples
//!
//! Never fails the caller. Unknown timer ids and non-finite samples are
//! logged and dropped.

use super::metrics::{MetricRecord, MetricUnit, PerformanceMetrics};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

const DURATION_SUFFIX: &str = "_duration";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(Uuid);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct RunningTimer {
    name: String,
    started: Instant,
}

#[derive(Default)]
pub struct PerformanceMonitor {
    timers: Mutex<HashMap<TimerId, RunningTimer>>,
    records: Mutex<Vec<MetricRecord>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_timer(&self, name: impl Into<String>) -> TimerId {
        let id = TimerId(Uuid::new_v4());
        self.timers.lock().insert(
            id,
            RunningTimer {
                name: name.into(),
                started: Instant::now(),
            },
        );
        id
    }

    /// Stop a timer, record `<name>_duration` and return the elapsed ms
    pub fn end_timer(&self, id: TimerId) -> Option<f64> {
        let Some(timer) = self.timers.lock().remove(&id) else {
            tracing::warn!("end_timer called with unknown timer {}", id);
            return None;
        };

        let elapsed_ms = timer.started.elapsed().as_secs_f64() * 1000.0;
        self.record_metric(
            format!("{}{}", timer.name, DURATION_SUFFIX),
            elapsed_ms,
            MetricUnit::Milliseconds,
        );
        Some(elapsed_ms)
    }

    pub fn record_metric(&self, name: impl Into<String>, value: f64, unit: MetricUnit) {
        let name = name.into();
        if !value.is_finite() {
            tracing::warn!("Dropping non-finite metric {} = {}", name, value);
            return;
        }

        self.records.lock().push(MetricRecord {
            name,
            value,
            unit,
            recorded_at: Utc::now(),
        });
    }

    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.lock().clone()
    }

    pub fn running_timers(&self) -> usize {
        self.timers.lock().len()
    }

    /// Aggregate everything recorded so far
    pub fn get_metrics(&self) -> PerformanceMetrics {
        let mut metrics = PerformanceMetrics {
            memory_usage_bytes: resident_memory_bytes(),
            ..PerformanceMetrics::default()
        };

        for record in self.records.lock().iter() {
            let lower = record.name.to_ascii_lowercase();
            if lower.ends_with(DURATION_SUFFIX) {
                if lower.contains("load") || lower.contains("fetch") {
                    metrics.load_time_ms += record.value;
                    continue;
                }
                if lower.contains("render") || lower.contains("process") {
                    metrics.render_time_ms += record.value;
                    continue;
                }
            }
            metrics.custom.insert(record.name.clone(), record.value);
        }

        metrics
    }

    pub fn reset(&self) {
        self.timers.lock().clear();
        self.records.lock().clear();
    }
}

/// Resident set size from `VmRSS` in `/proc/self/status` (Linux only)
///
/// The kernel reports it in kB, so the page size does not matter.
fn resident_memory_bytes() -> Option<u64> {
    match std::fs::read_to_string("/proc/self/status") {
        Ok(status) => parse_vm_rss(&status),
        Err(e) => {
            tracing::debug!("Memory usage unavailable: {}", e);
            None
        }
    }
}

fn parse_vm_rss(status: &str) -> Option<u64> {
    let rss = status.lines().find_map(|line| line.strip_prefix("VmRSS:"))?;
    let mut fields = rss.split_whitespace();
    let value = fields.next()?.parse::<u64>().ok()?;
    match fields.next() {
        Some("kB") => Some(value * 1024),
        other => {
            tracing::debug!("Unexpected VmRSS unit {:?}", other);
            None
        }
    }
}
