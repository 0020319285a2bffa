//! Error types for stepwise-vis.

use thiserror::Error;

/// Result type for stepwise-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Graph stepper initialization failed.
    #[error("graph configuration error: {0}")]
    Graph(#[from] stepwise_graph::Error),

    /// Sort selection failed.
    #[error("sort configuration error: {0}")]
    Sort(#[from] stepwise_sort::Error),

    /// No valid run is configured; a corrected configuration is required.
    #[error("no run configured")]
    NotConfigured,

    /// Timer interval of zero.
    #[error("invalid speed: {0} ms")]
    InvalidSpeed(u64),

    /// Input exceeds the size a run can replay.
    #[error("{what} too large: {len} exceeds {max}")]
    InputTooLarge {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// Environment configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Export produced unusable output.
    #[error("export error: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
