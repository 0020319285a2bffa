//! Graph data model and the adjacency views built from it.
//!
//! Graphs arrive as plain node and edge lists from the editor layer. Steppers
//! never walk those lists directly; they build an [`Adjacency`] once at
//! initialization time:
//!
//! - [`Adjacency::undirected`] inserts every edge in both directions (DFS/BFS)
//! - [`Adjacency::directed`] keeps only outgoing edges (game trees)
//!
//! Edges that reference a node id missing from the node list are skipped and
//! logged rather than failing the run.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::error::{Error, Result};

/// Identifier of a node, unique within a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A graph node. `x`/`y` are layout hints only and never read by steppers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: f64,
    /// Utility used by the game-tree evaluator.
    pub value: i64,
}

impl Node {
    /// Create a node at the layout origin.
    pub fn new(id: impl Into<NodeId>, value: i64) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            value,
        }
    }
}

/// An edge between two nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[cfg_attr(feature = "serde", serde(default = "unit_weight"))]
    pub weight: f64,
}

impl Edge {
    /// Create an edge with unit weight.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: 1.0,
        }
    }
}

#[cfg(feature = "serde")]
fn unit_weight() -> f64 {
    1.0
}

/// Key of an explored edge, normalized so `a <= b` since traversal treats
/// edges as undirected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeKey {
    pub a: NodeId,
    pub b: NodeId,
}

impl EdgeKey {
    /// Build a key from two endpoints in either order.
    pub fn between(x: &NodeId, y: &NodeId) -> Self {
        if x <= y {
            Self { a: x.clone(), b: y.clone() }
        } else {
            Self { a: y.clone(), b: x.clone() }
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

/// Node and edge lists as supplied by the editor.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, builder style.
    pub fn with_node(mut self, id: impl Into<NodeId>, value: i64) -> Self {
        self.nodes.push(Node::new(id, value));
        self
    }

    /// Add a unit-weight edge, builder style.
    pub fn with_edge(mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        self.edges.push(Edge::new(from, to));
        self
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Fail with [`Error::UnknownNode`] unless `id` is present.
    pub fn require(&self, role: &'static str, id: &NodeId) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }
        if !self.contains(id) {
            return Err(Error::UnknownNode { role, id: id.clone() });
        }
        Ok(())
    }
}

/// Neighbor lists keyed by node id. List order follows edge order.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    lists: HashMap<NodeId, Vec<NodeId>>,
    skipped_edges: usize,
}

impl Adjacency {
    /// Build an undirected view: every edge is inserted in both directions.
    pub fn undirected(graph: &Graph) -> Self {
        Self::build(graph, true)
    }

    /// Build a directed view: only `from -> to` is inserted.
    pub fn directed(graph: &Graph) -> Self {
        Self::build(graph, false)
    }

    fn build(graph: &Graph, symmetric: bool) -> Self {
        let mut lists: HashMap<NodeId, Vec<NodeId>> = graph
            .nodes
            .iter()
            .map(|n| (n.id.clone(), Vec::new()))
            .collect();
        let mut skipped_edges = 0;

        for edge in &graph.edges {
            if !lists.contains_key(&edge.from) || !lists.contains_key(&edge.to) {
                warn!(from = %edge.from, to = %edge.to, "skipping edge with unknown endpoint");
                skipped_edges += 1;
                continue;
            }
            if let Some(list) = lists.get_mut(&edge.from) {
                list.push(edge.to.clone());
            }
            if symmetric {
                if let Some(list) = lists.get_mut(&edge.to) {
                    list.push(edge.from.clone());
                }
            }
        }

        Self { lists, skipped_edges }
    }

    /// Neighbors of `id` in insertion order; empty for unknown ids.
    pub fn neighbors(&self, id: &NodeId) -> &[NodeId] {
        self.lists.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of nodes in the view.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether the view holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of adjacency entries across all lists.
    pub fn entry_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Edges dropped because an endpoint was unknown.
    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        Graph::new()
            .with_node("A", 0)
            .with_node("B", 0)
            .with_node("C", 0)
            .with_node("D", 0)
            .with_edge("A", "B")
            .with_edge("A", "C")
            .with_edge("B", "D")
            .with_edge("C", "D")
    }

    #[test]
    fn undirected_inserts_both_directions() {
        let adj = Adjacency::undirected(&diamond());
        assert_eq!(adj.neighbors(&"A".into()), &[NodeId::from("B"), NodeId::from("C")]);
        assert_eq!(adj.neighbors(&"D".into()), &[NodeId::from("B"), NodeId::from("C")]);
        assert_eq!(adj.entry_count(), 8);
    }

    #[test]
    fn directed_keeps_outgoing_only() {
        let adj = Adjacency::directed(&diamond());
        assert_eq!(adj.neighbors(&"A".into()).len(), 2);
        assert!(adj.neighbors(&"D".into()).is_empty());
    }

    #[test]
    fn edges_to_unknown_nodes_are_skipped() {
        let graph = diamond().with_edge("A", "Z").with_edge("Q", "B");
        let adj = Adjacency::undirected(&graph);
        assert_eq!(adj.skipped_edges(), 2);
        assert_eq!(adj.neighbors(&"A".into()).len(), 2);
        assert!(adj.neighbors(&"Z".into()).is_empty());
    }

    #[test]
    fn require_rejects_missing_nodes() {
        let graph = diamond();
        assert!(graph.require("start", &"A".into()).is_ok());
        assert!(matches!(
            graph.require("target", &"X".into()),
            Err(Error::UnknownNode { role: "target", .. })
        ));
        assert!(matches!(
            Graph::new().require("start", &"A".into()),
            Err(Error::EmptyGraph)
        ));
    }

    #[test]
    fn edge_keys_are_order_independent() {
        let ab = EdgeKey::between(&"B".into(), &"A".into());
        assert_eq!(ab, EdgeKey::between(&"A".into(), &"B".into()));
        assert_eq!(ab.to_string(), "A-B");
    }
}
