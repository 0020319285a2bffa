//! Leaf utility sources for the game-tree search.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::Node;

/// Assigns a utility to a leaf node.
pub trait Evaluator: Send + Sync {
    fn evaluate(&mut self, node: &Node) -> i64;
}

/// Uses the node's own `value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeValue;

impl Evaluator for NodeValue {
    fn evaluate(&mut self, node: &Node) -> i64 {
        node.value
    }
}

/// Draws utilities in `[-10, 10)` from a seeded RNG, so equal seeds replay
/// equal searches.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Evaluator for SeededRandom {
    fn evaluate(&mut self, _node: &Node) -> i64 {
        self.rng.gen_range(-10..10)
    }
}

/// Serializable choice of evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum EvaluatorKind {
    #[default]
    NodeValue,
    SeededRandom { seed: u64 },
}

impl EvaluatorKind {
    /// Instantiate the evaluator.
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::NodeValue => Box::new(NodeValue),
            EvaluatorKind::SeededRandom { seed } => Box::new(SeededRandom::new(seed)),
        }
    }
}
