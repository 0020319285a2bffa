//! Stepwise Graph Algorithms
//!
//! Graph-search steppers that advance one unit of work per `step()` call and
//! expose an immutable [`GraphSnapshot`] after every visit.
//!
//! # Steppers
//!
//! - [`Traversal`]: depth-first / breadth-first search from a start node to a
//!   target node over an undirected view of the graph, one frontier pop per
//!   step with lazy filtering of already-visited entries.
//! - [`GameTree`]: minimax / alpha-beta over the outgoing-edge tree rooted at
//!   the start node, one node visit per step, leaf utilities supplied by an
//!   injectable [`Evaluator`].
//!
//! Both are deterministic: equal inputs (and equal evaluator seeds) replay an
//! identical snapshot sequence.

mod error;
mod evaluator;
mod game_tree;
mod graph;
mod snapshot;
mod traversal;

use std::fmt;
use std::str::FromStr;

pub use error::{Error, Result};
pub use evaluator::{Evaluator, EvaluatorKind, NodeValue, SeededRandom};
pub use game_tree::{GameTree, SearchMode, SearchStatus};
pub use graph::{Adjacency, Edge, EdgeKey, Graph, Node, NodeId};
pub use snapshot::{Decision, ExplorationRecord, GraphSnapshot};
pub use traversal::{Traversal, TraversalMode, TraversalStatus};

/// Signal returned by every `step()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More work remains.
    Continue,
    /// The stepper reached a terminal state.
    Halt,
}

/// Graph algorithm ids accepted from the editor layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GraphAlgorithm {
    Dfs,
    Bfs,
    Minimax,
    AlphaBeta,
}

impl GraphAlgorithm {
    /// All graph algorithms.
    pub const ALL: [GraphAlgorithm; 4] = [Self::Dfs, Self::Bfs, Self::Minimax, Self::AlphaBeta];

    /// Wire id.
    pub fn id(&self) -> &'static str {
        match self {
            GraphAlgorithm::Dfs => "dfs",
            GraphAlgorithm::Bfs => "bfs",
            GraphAlgorithm::Minimax => "minimax",
            GraphAlgorithm::AlphaBeta => "alphabeta",
        }
    }
}

impl fmt::Display for GraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GraphAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.id() == lowered)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_ids_round_trip() {
        for algorithm in GraphAlgorithm::ALL {
            assert_eq!(algorithm.id().parse::<GraphAlgorithm>().unwrap(), algorithm);
        }
        assert_eq!("AlphaBeta".parse::<GraphAlgorithm>().unwrap(), GraphAlgorithm::AlphaBeta);
        assert!(matches!("dijkstra".parse::<GraphAlgorithm>(), Err(Error::UnknownAlgorithm(_))));
    }
}
