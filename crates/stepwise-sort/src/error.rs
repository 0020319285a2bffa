//! Error types for stepwise-sort.

use thiserror::Error;

/// Result type for stepwise-sort operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while selecting a sort.
#[derive(Debug, Error)]
pub enum Error {
    /// The algorithm id is not one of the sorting algorithms.
    #[error("unknown sorting algorithm: {0}")]
    UnknownAlgorithm(String),
}
