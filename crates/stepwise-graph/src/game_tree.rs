//! Minimax and alpha-beta search, one node visit per step.
//!
//! The tree is the graph's outgoing-edge view rooted at the start node. The
//! recursion is unrolled onto an explicit frame stack so the search can stop
//! after every node visit. Each step does exactly one of:
//!
//! - evaluate a leaf and hand its value to the parent
//! - fold a finished child's value into its parent, then descend into the
//!   next child, prune the rest, or return upward
//! - descend from a freshly entered node into its first child, recording
//!   the evaluator's static estimate as its provisional value
//!
//! Every step therefore writes exactly one entry of `node_values`: the value
//! of the node it visited.
//!
//! Children already on the current path are ignored so cyclic graphs still
//! terminate. The root maximizes and players alternate by depth.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::graph::{Adjacency, EdgeKey, Graph, Node, NodeId};
use crate::snapshot::{Decision, ExplorationRecord, GraphSnapshot};
use crate::StepOutcome;

/// Whether cutoffs are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMode {
    Minimax,
    AlphaBeta,
}

/// Where a search stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Searching,
    Solved { value: i64 },
}

#[derive(Debug, Clone)]
struct Frame {
    node: NodeId,
    maximizing: bool,
    alpha: i64,
    beta: i64,
    best: Option<i64>,
    children: Vec<NodeId>,
    next_child: usize,
    pending: Option<i64>,
}

impl Frame {
    fn fold(&mut self, value: i64) -> i64 {
        let best = match (self.best, self.maximizing) {
            (None, _) => value,
            (Some(b), true) => b.max(value),
            (Some(b), false) => b.min(value),
        };
        self.best = Some(best);
        if self.maximizing {
            self.alpha = self.alpha.max(best);
        } else {
            self.beta = self.beta.min(best);
        }
        best
    }
}

/// Stepper for the game-tree search.
pub struct GameTree {
    mode: SearchMode,
    tree: Adjacency,
    nodes: HashMap<NodeId, Node>,
    evaluator: Box<dyn Evaluator>,
    stack: Vec<Frame>,
    node_values: BTreeMap<NodeId, i64>,
    pruned: BTreeSet<NodeId>,
    explored: BTreeSet<NodeId>,
    explored_edges: BTreeSet<EdgeKey>,
    status: SearchStatus,
    steps: u64,
    latest: Option<GraphSnapshot>,
    log: Vec<ExplorationRecord>,
}

impl GameTree {
    /// Root a search at `root`.
    ///
    /// # Errors
    ///
    /// Fails if the graph is empty or `root` is not a node.
    pub fn new(graph: &Graph, root: &NodeId, mode: SearchMode, evaluator: Box<dyn Evaluator>) -> Result<Self> {
        graph.require("start", root)?;

        let mut search = Self {
            mode,
            tree: Adjacency::directed(graph),
            nodes: graph.nodes.iter().map(|n| (n.id.clone(), n.clone())).collect(),
            evaluator,
            stack: Vec::new(),
            node_values: BTreeMap::new(),
            pruned: BTreeSet::new(),
            explored: BTreeSet::new(),
            explored_edges: BTreeSet::new(),
            status: SearchStatus::Searching,
            steps: 0,
            latest: None,
            log: Vec::new(),
        };
        let frame = search.enter(root.clone(), true, i64::MIN, i64::MAX);
        search.stack.push(frame);
        Ok(search)
    }

    fn enter(&self, node: NodeId, maximizing: bool, alpha: i64, beta: i64) -> Frame {
        let children = self
            .tree
            .neighbors(&node)
            .iter()
            .filter(|c| **c != node && !self.stack.iter().any(|f| &f.node == *c))
            .cloned()
            .collect();
        Frame {
            node,
            maximizing,
            alpha,
            beta,
            best: None,
            children,
            next_child: 0,
            pending: None,
        }
    }

    /// Visit one node.
    pub fn step(&mut self) -> StepOutcome {
        if matches!(self.status, SearchStatus::Solved { .. }) {
            return StepOutcome::Halt;
        }
        let Some(top) = self.stack.last_mut() else {
            return StepOutcome::Halt;
        };
        self.steps += 1;
        let node = top.node.clone();
        self.explored.insert(node.clone());

        if let Some(child_value) = top.pending.take() {
            let best = top.fold(child_value);
            self.node_values.insert(node.clone(), best);

            let remaining = top.next_child < top.children.len();
            if self.mode == SearchMode::AlphaBeta && remaining && top.alpha >= top.beta {
                let cut = top.children[top.next_child..].to_vec();
                self.pruned.extend(cut.iter().cloned());
                debug!(node = %node, pruned = cut.len(), "cutoff");
                return self.finish(node, best, Decision::Pruned { cut });
            }
            if remaining {
                return self.descend(node);
            }
            return self.finish(node, best, Decision::Returned { value: best });
        }

        let is_leaf = top.children.is_empty();
        let value = self.estimate(&node);
        self.node_values.insert(node.clone(), value);
        if is_leaf {
            return self.finish(node, value, Decision::Evaluated { value });
        }

        // static estimate stands until the first child reports back
        self.descend(node)
    }

    fn estimate(&mut self, node: &NodeId) -> i64 {
        match self.nodes.get(node) {
            Some(n) => self.evaluator.evaluate(n),
            None => 0,
        }
    }

    fn descend(&mut self, node: NodeId) -> StepOutcome {
        let Some(top) = self.stack.last_mut() else {
            return StepOutcome::Halt;
        };
        let child = top.children[top.next_child].clone();
        top.next_child += 1;
        let (maximizing, alpha, beta) = (!top.maximizing, top.alpha, top.beta);

        self.explored_edges.insert(EdgeKey::between(&node, &child));
        let frame = self.enter(child.clone(), maximizing, alpha, beta);
        self.stack.push(frame);

        self.latest = Some(self.capture(&node));
        self.record(node, Decision::Descended { child });
        StepOutcome::Continue
    }

    fn finish(&mut self, node: NodeId, value: i64, decision: Decision) -> StepOutcome {
        self.latest = Some(self.capture(&node));
        self.stack.pop();
        self.record(node, decision);

        match self.stack.last_mut() {
            Some(parent) => {
                parent.pending = Some(value);
                StepOutcome::Continue
            }
            None => {
                debug!(value, steps = self.steps, "search solved");
                self.status = SearchStatus::Solved { value };
                StepOutcome::Halt
            }
        }
    }

    fn capture(&self, current: &NodeId) -> GraphSnapshot {
        GraphSnapshot {
            current_node: Some(current.clone()),
            explored_nodes: self.explored.clone(),
            explored_edges: self.explored_edges.clone(),
            current_path: self.stack.iter().map(|f| f.node.clone()).collect(),
            pruned_nodes: self.pruned.clone(),
            node_values: self.node_values.clone(),
            frontier: self.pending_children(),
        }
    }

    fn pending_children(&self) -> Vec<NodeId> {
        self.stack
            .last()
            .map(|f| f.children[f.next_child..].to_vec())
            .unwrap_or_default()
    }

    fn record(&mut self, current: NodeId, decision: Decision) {
        let frontier = self.pending_children();
        self.log.push(ExplorationRecord {
            step: self.steps,
            current: Some(current),
            frontier,
            decision,
        });
    }

    /// Snapshot from the most recent step.
    pub fn snapshot(&self) -> Option<&GraphSnapshot> {
        self.latest.as_ref()
    }

    /// Current status.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Search mode.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Nodes visited at least once.
    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }

    /// Nodes in the graph.
    pub fn total_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Every step taken, in order.
    pub fn log(&self) -> &[ExplorationRecord] {
        &self.log
    }

    /// Count of live entries across the frame stack, value map and tree.
    pub fn live_entries(&self) -> usize {
        let frames: usize = self.stack.iter().map(|f| 1 + f.children.len()).sum();
        frames + self.node_values.len() + self.pruned.len() + self.tree.entry_count()
    }
}
