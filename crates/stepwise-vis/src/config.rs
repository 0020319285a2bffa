//! Server settings and per-run configuration.

use serde::{Deserialize, Serialize};
use stepwise_graph::{EvaluatorKind, Graph, GraphAlgorithm, NodeId};
use stepwise_sort::SortAlgorithm;
use tracing::warn;

use crate::error::{Error, Result};

/// Recommended timer interval range for graph runs, in milliseconds.
pub const GRAPH_SPEED_RANGE_MS: (u64, u64) = (100, 2000);

/// Recommended timer interval range for sorting runs, in milliseconds.
pub const SORT_SPEED_RANGE_MS: (u64, u64) = (10, 500);

/// Largest array a sorting run accepts. Timelines hold one array copy per
/// step, so memory grows with the cube of the length.
pub const MAX_SORT_LEN: usize = 100;

/// Largest graph a graph run accepts.
pub const MAX_GRAPH_NODES: usize = 100;

/// Settings for the visualization server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisConfig {
    /// HTTP listen port
    pub port: u16,

    /// Default tick interval for graph runs
    pub graph_speed_ms: u64,

    /// Default tick interval for sorting runs
    pub sort_speed_ms: u64,

    /// Seed for the demo session's random evaluator
    pub seed: u64,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            graph_speed_ms: 500,
            sort_speed_ms: 50,
            seed: 42,
        }
    }
}

impl VisConfig {
    /// Read settings from `STEPWISE_*` environment variables, falling back to
    /// the defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a variable is set but does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`VisConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            port: parse_var(&lookup, "STEPWISE_PORT", defaults.port)?,
            graph_speed_ms: parse_var(&lookup, "STEPWISE_GRAPH_SPEED_MS", defaults.graph_speed_ms)?,
            sort_speed_ms: parse_var(&lookup, "STEPWISE_SORT_SPEED_MS", defaults.sort_speed_ms)?,
            seed: parse_var(&lookup, "STEPWISE_SEED", defaults.seed)?,
        };
        check_range("graph", config.graph_speed_ms, GRAPH_SPEED_RANGE_MS);
        check_range("sort", config.sort_speed_ms, SORT_SPEED_RANGE_MS);
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid {key}: {raw:?}"))),
        None => Ok(default),
    }
}

/// Warn when `speed_ms` falls outside the recommended range. The range is a
/// UI convention and never rejects a run.
fn check_size(what: &'static str, len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(Error::InputTooLarge { what, len, max });
    }
    Ok(())
}

pub(crate) fn check_range(mode: &str, speed_ms: u64, (low, high): (u64, u64)) -> bool {
    let inside = (low..=high).contains(&speed_ms);
    if !inside {
        warn!(mode, speed_ms, low, high, "speed outside recommended range");
    }
    inside
}

/// Input and algorithm for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunInput {
    Graph {
        graph: Graph,
        start_node: NodeId,
        target_node: NodeId,
        algorithm: GraphAlgorithm,
        /// Leaf utilities for minimax / alpha-beta; ignored by DFS/BFS.
        #[serde(default)]
        evaluator: EvaluatorKind,
    },
    Sort {
        array: Vec<i64>,
        algorithm: SortAlgorithm,
    },
}

impl RunInput {
    /// Algorithm id as shown to the user.
    pub fn algorithm_id(&self) -> &'static str {
        match self {
            RunInput::Graph { algorithm, .. } => algorithm.id(),
            RunInput::Sort { algorithm, .. } => algorithm.id(),
        }
    }

    fn speed_range(&self) -> (u64, u64) {
        match self {
            RunInput::Graph { .. } => GRAPH_SPEED_RANGE_MS,
            RunInput::Sort { .. } => SORT_SPEED_RANGE_MS,
        }
    }
}

/// A complete run request: what to run and how fast to tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub input: RunInput,
    pub speed_ms: u64,
}

impl RunConfig {
    pub fn graph(
        graph: Graph,
        start: impl Into<NodeId>,
        target: impl Into<NodeId>,
        algorithm: GraphAlgorithm,
        speed_ms: u64,
    ) -> Self {
        Self {
            input: RunInput::Graph {
                graph,
                start_node: start.into(),
                target_node: target.into(),
                algorithm,
                evaluator: EvaluatorKind::default(),
            },
            speed_ms,
        }
    }

    pub fn sort(array: Vec<i64>, algorithm: SortAlgorithm, speed_ms: u64) -> Self {
        Self {
            input: RunInput::Sort { array, algorithm },
            speed_ms,
        }
    }

    /// Replace the game-tree evaluator. No effect on sorting runs.
    pub fn with_evaluator(mut self, kind: EvaluatorKind) -> Self {
        if let RunInput::Graph { evaluator, .. } = &mut self.input {
            *evaluator = kind;
        }
        self
    }

    /// Reject a zero interval; warn outside the recommended range.
    pub fn validate(&self) -> Result<()> {
        if self.speed_ms == 0 {
            return Err(Error::InvalidSpeed(self.speed_ms));
        }
        let mode = match &self.input {
            RunInput::Graph { graph, .. } => {
                check_size("graph", graph.node_count(), MAX_GRAPH_NODES)?;
                "graph"
            }
            RunInput::Sort { array, .. } => {
                check_size("array", array.len(), MAX_SORT_LEN)?;
                "sort"
            }
        };
        check_range(mode, self.speed_ms, self.input.speed_range());
        Ok(())
    }
}
