//! Depth-first and breadth-first traversal, one frontier pop per step.
//!
//! The frontier is a single `VecDeque` used as a stack (DFS, pop from the
//! back) or a queue (BFS, pop from the front). Duplicate entries are allowed
//! on insertion and filtered lazily when popped.

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::error::Result;
use crate::graph::{Adjacency, EdgeKey, Graph, NodeId};
use crate::snapshot::{Decision, ExplorationRecord, GraphSnapshot};
use crate::StepOutcome;

/// Frontier discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraversalMode {
    /// LIFO stack; neighbors pushed in reverse so the first listed pops next.
    DepthFirst,
    /// FIFO queue; neighbors enqueued in listed order.
    BreadthFirst,
}

/// Where a traversal stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraversalStatus {
    Searching,
    /// Terminal success: the target was popped.
    Found,
    /// Terminal failure: the frontier emptied first.
    Exhausted,
}

/// A frontier entry remembers the node that queued it, so visiting it can
/// mark the discovering edge as explored.
#[derive(Debug, Clone)]
struct Entry {
    node: NodeId,
    via: Option<NodeId>,
}

/// Stepper for DFS/BFS between a start and a target node.
#[derive(Debug, Clone)]
pub struct Traversal {
    mode: TraversalMode,
    adjacency: Adjacency,
    target: NodeId,
    frontier: VecDeque<Entry>,
    visited: BTreeSet<NodeId>,
    path: Vec<NodeId>,
    explored_edges: BTreeSet<EdgeKey>,
    status: TraversalStatus,
    steps: u64,
    latest: Option<GraphSnapshot>,
    log: Vec<ExplorationRecord>,
}

impl Traversal {
    /// Build the adjacency view and seed the frontier with `start`.
    ///
    /// # Errors
    ///
    /// Fails if the graph is empty or either endpoint is not a node.
    pub fn new(graph: &Graph, start: &NodeId, target: &NodeId, mode: TraversalMode) -> Result<Self> {
        graph.require("start", start)?;
        graph.require("target", target)?;

        let mut frontier = VecDeque::new();
        frontier.push_back(Entry {
            node: start.clone(),
            via: None,
        });

        Ok(Self {
            mode,
            adjacency: Adjacency::undirected(graph),
            target: target.clone(),
            frontier,
            visited: BTreeSet::new(),
            path: Vec::new(),
            explored_edges: BTreeSet::new(),
            status: TraversalStatus::Searching,
            steps: 0,
            latest: None,
            log: Vec::new(),
        })
    }

    /// Pop one frontier entry and act on it.
    ///
    /// Returns [`StepOutcome::Halt`] once the target is found or the frontier
    /// is exhausted, and on every call after that.
    pub fn step(&mut self) -> StepOutcome {
        if self.status != TraversalStatus::Searching {
            return StepOutcome::Halt;
        }
        self.steps += 1;

        let popped = match self.mode {
            TraversalMode::DepthFirst => self.frontier.pop_back(),
            TraversalMode::BreadthFirst => self.frontier.pop_front(),
        };

        let Some(Entry { node, via }) = popped else {
            debug!(step = self.steps, "frontier exhausted");
            self.status = TraversalStatus::Exhausted;
            self.record(None, Decision::Exhausted);
            return StepOutcome::Halt;
        };

        if self.visited.contains(&node) {
            self.record(Some(node), Decision::Skipped);
            return StepOutcome::Continue;
        }

        self.visited.insert(node.clone());
        self.path.push(node.clone());
        if let Some(via) = via {
            self.explored_edges.insert(EdgeKey::between(&via, &node));
        }
        self.latest = Some(self.capture(&node));

        if node == self.target {
            debug!(step = self.steps, node = %node, "target found");
            self.status = TraversalStatus::Found;
            self.record(Some(node), Decision::Found);
            return StepOutcome::Halt;
        }

        let queued: Vec<NodeId> = self
            .adjacency
            .neighbors(&node)
            .iter()
            .filter(|n| !self.visited.contains(*n))
            .cloned()
            .collect();

        let push = |frontier: &mut VecDeque<Entry>, next: &NodeId| {
            frontier.push_back(Entry {
                node: next.clone(),
                via: Some(node.clone()),
            });
        };
        match self.mode {
            TraversalMode::DepthFirst => queued.iter().rev().for_each(|n| push(&mut self.frontier, n)),
            TraversalMode::BreadthFirst => queued.iter().for_each(|n| push(&mut self.frontier, n)),
        }

        debug!(step = self.steps, node = %node, queued = queued.len(), "visited");
        self.record(Some(node.clone()), Decision::Visited { queued });
        StepOutcome::Continue
    }

    fn capture(&self, current: &NodeId) -> GraphSnapshot {
        GraphSnapshot {
            current_node: Some(current.clone()),
            explored_nodes: self.visited.clone(),
            explored_edges: self.explored_edges.clone(),
            current_path: self.path.clone(),
            frontier: self.frontier_ids(),
            ..GraphSnapshot::default()
        }
    }

    fn record(&mut self, current: Option<NodeId>, decision: Decision) {
        let frontier = self.frontier_ids();
        self.log.push(ExplorationRecord {
            step: self.steps,
            current,
            frontier,
            decision,
        });
    }

    fn frontier_ids(&self) -> Vec<NodeId> {
        self.frontier.iter().map(|e| e.node.clone()).collect()
    }

    /// Snapshot from the most recent visit, if any node has been visited.
    pub fn snapshot(&self) -> Option<&GraphSnapshot> {
        self.latest.as_ref()
    }

    /// Current status.
    pub fn status(&self) -> TraversalStatus {
        self.status
    }

    /// Frontier discipline in use.
    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// Nodes visited so far.
    pub fn explored_count(&self) -> usize {
        self.visited.len()
    }

    /// Nodes in the adjacency view.
    pub fn total_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Visit order so far.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Every step taken, in order.
    pub fn log(&self) -> &[ExplorationRecord] {
        &self.log
    }

    /// Count of live entries across frontier, visited set, path and adjacency.
    pub fn live_entries(&self) -> usize {
        self.frontier.len() + self.visited.len() + self.path.len() + self.adjacency.entry_count()
    }
}
