//! Weighting Strategies
//!
//! A weight function tells the engine which ordered pairs of nodes are
//! related and how far apart related nodes would like to be.

use std::collections::HashMap;

use super::node::{Node, NodeId};
use super::node_set::NodeSet;
use crate::error::Result;

/// Capability contract between the engine and the caller's data model.
///
/// The engine calls `has_weight` and `weight` up to O(n²) times per tick on
/// its scheduler thread while it holds the node set, so implementations must
/// be cheap, side-effect free, and must not call back into the node set.
/// Answers must stay consistent for the duration of a tick. Symmetry is not
/// required.
pub trait WeightFunction: Send + Sync {
    /// The nodes to lay out.
    fn nodes(&self) -> &NodeSet;

    /// Whether `a` is pulled toward (or pushed from) `b`.
    fn has_weight(&self, a: &Node, b: &Node) -> bool;

    /// Rest length of the relation from `a` to `b`. Only called when
    /// `has_weight(a, b)` is true.
    fn weight(&self, a: &Node, b: &Node) -> f64;

    /// Global factor applied to every node's displacement each tick.
    fn spring_constant(&self) -> f64;
}

/// Weight function backed by an explicit list of relations.
#[derive(Debug)]
pub struct EdgeWeights {
    nodes: NodeSet,
    edges: HashMap<(NodeId, NodeId), f64>,
    spring_constant: f64,
}

impl EdgeWeights {
    /// Create a strategy with no nodes and no relations.
    pub fn new() -> Self {
        Self::with_nodes(NodeSet::new())
    }

    /// Create a strategy over an existing node set.
    pub fn with_nodes(nodes: NodeSet) -> Self {
        Self {
            nodes,
            edges: HashMap::new(),
            spring_constant: 1.0,
        }
    }

    /// Set the global spring constant.
    pub fn with_spring_constant(mut self, spring_constant: f64) -> Self {
        self.spring_constant = spring_constant;
        self
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        self.nodes.insert(node)
    }

    /// Relate `a` and `b` in both directions.
    pub fn connect(&mut self, a: NodeId, b: NodeId, rest_length: f64) {
        self.connect_directed(a, b, rest_length);
        self.connect_directed(b, a, rest_length);
    }

    /// Relate `from` to `to` only.
    pub fn connect_directed(&mut self, from: NodeId, to: NodeId, rest_length: f64) {
        self.edges.insert((from, to), rest_length);
    }

    /// Remove the relation from `from` to `to`. Returns the old rest length.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> Option<f64> {
        self.edges.remove(&(from, to))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl Default for EdgeWeights {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightFunction for EdgeWeights {
    fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    fn has_weight(&self, a: &Node, b: &Node) -> bool {
        self.edges.contains_key(&(a.id(), b.id()))
    }

    fn weight(&self, a: &Node, b: &Node) -> f64 {
        self.edges.get(&(a.id(), b.id())).copied().unwrap_or(f64::NAN)
    }

    fn spring_constant(&self) -> f64 {
        self.spring_constant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Point;

    fn node(id: u64) -> Node {
        Node::new(NodeId::new(id), Point::ZERO)
    }

    #[test]
    fn connect_is_symmetric() {
        let mut weights = EdgeWeights::new();
        weights.connect(NodeId::new(1), NodeId::new(2), 12.0);

        assert!(weights.has_weight(&node(1), &node(2)));
        assert!(weights.has_weight(&node(2), &node(1)));
        assert_eq!(weights.weight(&node(2), &node(1)), 12.0);
        assert_eq!(weights.edge_count(), 2);
    }

    #[test]
    fn directed_relations_are_one_way() {
        let mut weights = EdgeWeights::new();
        weights.connect_directed(NodeId::new(1), NodeId::new(2), 3.0);

        assert!(weights.has_weight(&node(1), &node(2)));
        assert!(!weights.has_weight(&node(2), &node(1)));
    }

    #[test]
    fn disconnect_removes_relation() {
        let mut weights = EdgeWeights::new();
        weights.connect(NodeId::new(1), NodeId::new(2), 3.0);

        assert_eq!(weights.disconnect(NodeId::new(1), NodeId::new(2)), Some(3.0));
        assert!(!weights.has_weight(&node(1), &node(2)));
        assert!(weights.has_weight(&node(2), &node(1)));
    }

    #[test]
    fn default_spring_constant_is_one() {
        assert_eq!(EdgeWeights::new().spring_constant(), 1.0);
        assert_eq!(
            EdgeWeights::new().with_spring_constant(0.9).spring_constant(),
            0.9
        );
    }
}
