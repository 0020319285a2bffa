//! Run statistics accumulated once per step.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stepper::Progress;

/// Bytes attributed to each live stepper entry by the memory estimate.
pub const BYTES_PER_ENTRY: usize = 64;

/// Statistics for the current run. Zeroed only by a reset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Wall-clock time spent inside `step()`, summed.
    pub execution_time_ms: f64,
    pub nodes_explored: usize,
    pub total_nodes: usize,
    /// Illustrative estimate: `ceil(live_entries * 64 / 1024)`.
    pub memory_usage_kb: usize,
    pub step_count: u64,
    pub is_complete: bool,
}

impl PerformanceMetrics {
    /// Explored share of the total, 0.0 - 1.0.
    pub fn coverage(&self) -> f64 {
        if self.total_nodes == 0 {
            0.0
        } else {
            self.nodes_explored as f64 / self.total_nodes as f64
        }
    }
}

/// Folds each step's timing and progress into [`PerformanceMetrics`].
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: PerformanceMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current totals.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        self.metrics = PerformanceMetrics::default();
    }

    /// Account for one `step()` that took `elapsed`.
    pub fn record(&mut self, elapsed: Duration, progress: Progress) {
        let m = &mut self.metrics;
        m.execution_time_ms += elapsed.as_secs_f64() * 1000.0;
        m.step_count += 1;
        m.nodes_explored = progress.explored;
        m.total_nodes = progress.total;
        m.memory_usage_kb = estimate_kb(progress.live_entries);
        m.is_complete = progress.finished;
    }
}

fn estimate_kb(live_entries: usize) -> usize {
    (live_entries * BYTES_PER_ENTRY).div_ceil(1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(explored: usize, live_entries: usize, finished: bool) -> Progress {
        Progress {
            explored,
            total: 10,
            live_entries,
            finished,
        }
    }

    #[test]
    fn record_accumulates_time_and_steps() {
        let mut collector = MetricsCollector::new();
        collector.record(Duration::from_micros(1500), progress(1, 16, false));
        collector.record(Duration::from_micros(500), progress(2, 17, true));

        let m = collector.metrics();
        assert!((m.execution_time_ms - 2.0).abs() < 1e-9);
        assert_eq!(m.step_count, 2);
        assert_eq!(m.nodes_explored, 2);
        assert_eq!(m.total_nodes, 10);
        assert_eq!(m.memory_usage_kb, 2);
        assert!(m.is_complete);
        assert!((m.coverage() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn memory_estimate_rounds_up() {
        assert_eq!(estimate_kb(0), 0);
        assert_eq!(estimate_kb(1), 1);
        assert_eq!(estimate_kb(16), 1);
        assert_eq!(estimate_kb(17), 2);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut collector = MetricsCollector::new();
        collector.record(Duration::from_millis(3), progress(4, 100, true));
        collector.reset();
        assert_eq!(collector.metrics(), PerformanceMetrics::default());
        assert_eq!(collector.metrics().coverage(), 0.0);
    }
}
