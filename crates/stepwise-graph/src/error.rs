//! Error types for stepwise-graph.

use thiserror::Error;

use crate::NodeId;

/// Result type for stepwise-graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while initializing a graph stepper.
///
/// Every variant is terminal for the run: nothing is retried, the caller
/// must supply a corrected configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// The start or target node is not part of the graph.
    #[error("{role} node {id} is not present in the graph")]
    UnknownNode {
        role: &'static str,
        id: NodeId,
    },

    /// The algorithm id is not one of the graph algorithms.
    #[error("unknown graph algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The graph has no nodes at all.
    #[error("graph has no nodes")]
    EmptyGraph,
}
