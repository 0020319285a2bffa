//! The seam between the playback controller and the algorithm crates.
//!
//! Every stepper advances one unit of work per [`Stepper::step`] and hands out
//! owned snapshot copies, so a consumer holding a [`Snapshot`] never observes
//! a later step.

use serde::{Deserialize, Serialize};
use stepwise_graph::{
    GameTree, GraphAlgorithm, GraphSnapshot, SearchMode, SearchStatus, StepOutcome, Traversal,
    TraversalMode, TraversalStatus,
};
use stepwise_sort::{SortSnapshot, Timeline};
use tracing::info;

use crate::config::RunInput;
use crate::error::Result;

/// Snapshot of either algorithm family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Snapshot {
    Graph(GraphSnapshot),
    Sort(SortSnapshot),
}

/// Counters a stepper reports to the metrics collector after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Nodes visited, or indices settled for sorting.
    pub explored: usize,
    /// Nodes in the graph, or the array length.
    pub total: usize,
    /// Entries held by the stepper's live structures.
    pub live_entries: usize,
    /// Whether the stepper reached a terminal state.
    pub finished: bool,
}

/// One algorithm run, advanced a unit at a time.
pub trait Stepper: Send + Sync {
    /// Advance once.
    fn step(&mut self) -> StepOutcome;

    /// Copy of the latest snapshot, or the initial view before any step.
    fn snapshot(&self) -> Option<Snapshot>;

    fn progress(&self) -> Progress;

    /// One-line description of the latest step.
    fn explanation(&self) -> Option<String>;
}

impl Stepper for Traversal {
    fn step(&mut self) -> StepOutcome {
        Traversal::step(self)
    }

    fn snapshot(&self) -> Option<Snapshot> {
        Traversal::snapshot(self).cloned().map(Snapshot::Graph)
    }

    fn progress(&self) -> Progress {
        Progress {
            explored: self.explored_count(),
            total: self.total_nodes(),
            live_entries: self.live_entries(),
            finished: self.status() != TraversalStatus::Searching,
        }
    }

    fn explanation(&self) -> Option<String> {
        self.log().last().map(describe_record)
    }
}

impl Stepper for GameTree {
    fn step(&mut self) -> StepOutcome {
        GameTree::step(self)
    }

    fn snapshot(&self) -> Option<Snapshot> {
        GameTree::snapshot(self).cloned().map(Snapshot::Graph)
    }

    fn progress(&self) -> Progress {
        Progress {
            explored: self.explored_count(),
            total: self.total_nodes(),
            live_entries: self.live_entries(),
            finished: matches!(self.status(), SearchStatus::Solved { .. }),
        }
    }

    fn explanation(&self) -> Option<String> {
        self.log().last().map(describe_record)
    }
}

impl Stepper for Timeline {
    fn step(&mut self) -> StepOutcome {
        match self.advance() {
            Some(snapshot) if snapshot.complete => StepOutcome::Halt,
            Some(_) => StepOutcome::Continue,
            None => StepOutcome::Halt,
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        let snapshot = match self.current() {
            Some(current) => current.clone(),
            None => SortSnapshot {
                array: self.initial().to_vec(),
                ..SortSnapshot::default()
            },
        };
        Some(Snapshot::Sort(snapshot))
    }

    fn progress(&self) -> Progress {
        Progress {
            explored: self.current().map_or(0, |s| s.sorted.len()),
            total: self.initial().len(),
            live_entries: self.total_frames() * self.initial().len().max(1),
            finished: self.is_finished(),
        }
    }

    fn explanation(&self) -> Option<String> {
        self.current().map(describe_sort)
    }
}

fn describe_record(record: &stepwise_graph::ExplorationRecord) -> String {
    match &record.current {
        Some(node) => format!("step {}: {}: {}", record.step, node, record.decision),
        None => format!("step {}: {}", record.step, record.decision),
    }
}

fn describe_sort(snapshot: &SortSnapshot) -> String {
    let join = |set: &std::collections::BTreeSet<usize>| {
        set.iter()
            .map(|i| format!("[{i}]={}", snapshot.array[*i]))
            .collect::<Vec<_>>()
            .join(" and ")
    };
    if snapshot.complete {
        "array sorted".to_owned()
    } else if !snapshot.swapping.is_empty() {
        format!("swap {}", join(&snapshot.swapping))
    } else if snapshot.comparing.len() == 1 {
        format!("select {}", join(&snapshot.comparing))
    } else if !snapshot.comparing.is_empty() {
        format!("compare {}", join(&snapshot.comparing))
    } else {
        format!("{} of {} settled", snapshot.sorted.len(), snapshot.array.len())
    }
}

/// Build the stepper for `input`.
///
/// # Errors
///
/// Fails if the start or target node is missing from the graph. Sorting
/// input is always accepted.
pub fn build(input: &RunInput) -> Result<Box<dyn Stepper>> {
    match input {
        RunInput::Graph {
            graph,
            start_node,
            target_node,
            algorithm,
            evaluator,
        } => {
            graph.require("start", start_node)?;
            graph.require("target", target_node)?;
            info!(%algorithm, nodes = graph.node_count(), edges = graph.edges.len(), "graph run initialized");
            let stepper: Box<dyn Stepper> = match algorithm {
                GraphAlgorithm::Dfs => Box::new(Traversal::new(graph, start_node, target_node, TraversalMode::DepthFirst)?),
                GraphAlgorithm::Bfs => Box::new(Traversal::new(graph, start_node, target_node, TraversalMode::BreadthFirst)?),
                GraphAlgorithm::Minimax => {
                    Box::new(GameTree::new(graph, start_node, SearchMode::Minimax, evaluator.build())?)
                }
                GraphAlgorithm::AlphaBeta => {
                    Box::new(GameTree::new(graph, start_node, SearchMode::AlphaBeta, evaluator.build())?)
                }
            };
            Ok(stepper)
        }
        RunInput::Sort { array, algorithm } => {
            let timeline = Timeline::new(array.clone(), *algorithm);
            info!(%algorithm, len = array.len(), frames = timeline.total_frames(), "sort run initialized");
            Ok(Box::new(timeline))
        }
    }
}
