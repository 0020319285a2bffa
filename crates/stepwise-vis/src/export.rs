//! Session export of the current run's metrics as JSON or CSV.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::PerformanceMetrics;

const SESSION_ID_LEN: usize = 9;
const SESSION_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A point-in-time export of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub timestamp_ms: u64,
    pub session_id: String,
    pub metrics: PerformanceMetrics,
}

impl SessionExport {
    /// Stamp `metrics` with the current time and a fresh session id.
    pub fn new(metrics: PerformanceMetrics) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        Self::with_rng(metrics, timestamp_ms, &mut rand::thread_rng())
    }

    pub fn with_rng(metrics: PerformanceMetrics, timestamp_ms: u64, rng: &mut impl Rng) -> Self {
        Self {
            timestamp_ms,
            session_id: session_id(rng),
            metrics,
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Nine random lowercase alphanumerics.
pub fn session_id(rng: &mut impl Rng) -> String {
    (0..SESSION_ID_LEN)
        .map(|_| SESSION_ID_ALPHABET[rng.gen_range(0..SESSION_ID_ALPHABET.len())] as char)
        .collect()
}

/// `Metric,Value` table of the metrics.
pub fn metrics_csv(metrics: &PerformanceMetrics) -> Result<String> {
    let completion = if metrics.is_complete { "Complete" } else { "In Progress" };
    let rows = [
        ("Execution Time (ms)", format!("{:.2}", metrics.execution_time_ms)),
        ("Nodes Explored", metrics.nodes_explored.to_string()),
        ("Total Nodes", metrics.total_nodes.to_string()),
        ("Memory Usage (KB)", metrics.memory_usage_kb.to_string()),
        ("Step Count", metrics.step_count.to_string()),
        ("Completion Status", completion.to_owned()),
    ];

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Metric", "Value"])?;
    for (name, value) in &rows {
        writer.write_record([*name, value.as_str()])?;
    }
    let bytes = writer.into_inner().map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}
