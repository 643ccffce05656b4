//! Published layout snapshots.
//!
//! At the end of every committed tick the engine copies the node positions
//! into a fresh, immutable [`LayoutSnapshot`] and swaps it in behind an
//! `Arc`. Readers clone the `Arc` and can hold on to it for as long as they
//! like without blocking the scheduler.

use serde::Serialize;

use crate::graph::{Node, NodeId, Point, Rect};

/// Immutable view of the layout after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    tick: u64,
    nodes: Vec<Node>,
}

impl LayoutSnapshot {
    pub(crate) fn new(tick: u64, nodes: Vec<Node>) -> Self {
        Self { tick, nodes }
    }

    /// Number of ticks committed before this snapshot was taken.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Nodes in node-set order. Pending displacements are always zero.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Position of a node, if it is part of the snapshot.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.get(id).map(Node::position)
    }

    /// Mean position of all nodes; the origin for an empty layout.
    pub fn centroid(&self) -> Point {
        if self.nodes.is_empty() {
            return Point::ZERO;
        }
        let sum = self
            .nodes
            .iter()
            .fold(Point::ZERO, |acc, node| acc + node.position());
        let count = self.nodes.len() as f64;
        Point::new(sum.x / count, sum.y / count)
    }

    /// Smallest rectangle covering every node.
    pub fn bounds(&self) -> Option<Rect> {
        let mut nodes = self.nodes.iter();
        let first = nodes.next()?.position();
        let mut bounds = Rect::new(first, first);
        for node in nodes {
            bounds.include(node.position());
        }
        Some(bounds)
    }

    /// Serialize the snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
