//! Immutable per-step records produced by the graph steppers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::graph::{EdgeKey, NodeId};

/// State of a graph-family stepper at one step.
///
/// Snapshots are owned copies; later steps never mutate one that has been
/// handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSnapshot {
    pub current_node: Option<NodeId>,
    pub explored_nodes: BTreeSet<NodeId>,
    pub explored_edges: BTreeSet<EdgeKey>,
    pub current_path: Vec<NodeId>,
    pub pruned_nodes: BTreeSet<NodeId>,
    pub node_values: BTreeMap<NodeId, i64>,
    /// Stack (bottom to top) or queue (front to back) contents.
    pub frontier: Vec<NodeId>,
}

/// What a single step did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Decision {
    /// A new node was visited and its unvisited neighbors queued.
    Visited { queued: Vec<NodeId> },
    /// The popped node had already been visited.
    Skipped,
    /// The popped node is the target.
    Found,
    /// The frontier ran dry before the target was reached.
    Exhausted,
    /// A leaf received its utility.
    Evaluated { value: i64 },
    /// Search moved into a child.
    Descended { child: NodeId },
    /// A finished subtree handed its value to the parent.
    Returned { value: i64 },
    /// A cutoff skipped the remaining children.
    Pruned { cut: Vec<NodeId> },
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Visited { queued } if queued.is_empty() => {
                f.write_str("visit node, no unvisited neighbors")
            }
            Decision::Visited { queued } => {
                write!(f, "visit node, add {} to frontier", join(queued))
            }
            Decision::Skipped => f.write_str("already visited, skip"),
            Decision::Found => f.write_str("target found"),
            Decision::Exhausted => f.write_str("frontier empty, target unreachable"),
            Decision::Evaluated { value } => write!(f, "evaluate leaf = {value}"),
            Decision::Descended { child } => write!(f, "descend into {child}"),
            Decision::Returned { value } => write!(f, "subtree resolved = {value}"),
            Decision::Pruned { cut } => write!(f, "alpha >= beta, prune {}", join(cut)),
        }
    }
}

fn join(ids: &[NodeId]) -> String {
    let parts: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
    format!("[{}]", parts.join(", "))
}

/// One row of the exploration log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplorationRecord {
    /// 1-based step number.
    pub step: u64,
    pub current: Option<NodeId>,
    pub frontier: Vec<NodeId>,
    pub decision: Decision,
}
