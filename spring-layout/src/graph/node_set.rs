//! Node Set
//!
//! The collection of nodes being laid out. It belongs to the caller's data
//! model and is handed to the engine through [`WeightFunction::nodes`].
//!
//! # Synchronization
//!
//! The set is guarded by a single mutex. The engine holds it for the whole
//! compute/commit window of a tick, so a concurrent `snapshot` or `place`
//! either sees the layout before the tick or after it, never in between.
//!
//! [`WeightFunction::nodes`]: super::WeightFunction::nodes

use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};

use super::geometry::Point;
use super::node::{Node, NodeId};
use crate::error::{LayoutError, Result};

/// Insertion-ordered, thread-safe collection of nodes.
#[derive(Debug, Default)]
pub struct NodeSet {
    nodes: Mutex<IndexMap<NodeId, Node>>,
}

impl NodeSet {
    /// Create an empty node set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node set from nodes, keeping their order.
    pub fn from_nodes<I>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Node>,
    {
        let set = Self::new();
        for node in nodes {
            set.insert(node)?;
        }
        Ok(set)
    }

    /// Add a node to the end of the set.
    pub fn insert(&self, node: Node) -> Result<()> {
        let mut nodes = self.nodes.lock();
        if nodes.contains_key(&node.id()) {
            return Err(LayoutError::DuplicateNode(node.id()));
        }
        nodes.insert(node.id(), node);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.lock().is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.lock().contains_key(&id)
    }

    /// Node ids in insertion order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.lock().keys().copied().collect()
    }

    /// Committed position of a node.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.nodes.lock().get(&id).map(Node::position)
    }

    /// Copy of every node in insertion order.
    pub fn snapshot(&self) -> Vec<Node> {
        self.nodes.lock().values().copied().collect()
    }

    /// Move a node from outside the simulation, e.g. when a user drags it.
    ///
    /// Serialized with ticks: the move lands either before or after a tick,
    /// never during one.
    pub fn place(&self, id: NodeId, position: Point) -> Result<()> {
        if !position.is_finite() {
            return Err(LayoutError::NonFinitePosition {
                id,
                x: position.x,
                y: position.y,
            });
        }

        let mut nodes = self.nodes.lock();
        let node = nodes.get_mut(&id).ok_or(LayoutError::UnknownNode(id))?;
        node.set_position(position);
        Ok(())
    }

    /// Exclusive access for the compute/commit window of a tick.
    pub(crate) fn lock(&self) -> MutexGuard<'_, IndexMap<NodeId, Node>> {
        self.nodes.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, x: f64, y: f64) -> Node {
        Node::new(NodeId::new(id), Point::new(x, y))
    }

    #[test]
    fn keeps_insertion_order() {
        let set = NodeSet::from_nodes([node(3, 0.0, 0.0), node(1, 1.0, 1.0), node(2, 2.0, 2.0)])
            .unwrap();

        assert_eq!(
            set.ids(),
            vec![NodeId::new(3), NodeId::new(1), NodeId::new(2)]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let set = NodeSet::new();
        set.insert(node(1, 0.0, 0.0)).unwrap();

        let err = set.insert(node(1, 5.0, 5.0)).unwrap_err();

        assert_eq!(err, LayoutError::DuplicateNode(NodeId::new(1)));
        assert_eq!(set.position(NodeId::new(1)), Some(Point::ZERO));
    }

    #[test]
    fn place_moves_known_nodes_only() {
        let set = NodeSet::from_nodes([node(1, 0.0, 0.0)]).unwrap();

        set.place(NodeId::new(1), Point::new(4.0, 2.0)).unwrap();
        assert_eq!(set.position(NodeId::new(1)), Some(Point::new(4.0, 2.0)));

        assert_eq!(
            set.place(NodeId::new(9), Point::ZERO),
            Err(LayoutError::UnknownNode(NodeId::new(9)))
        );
    }

    #[test]
    fn place_rejects_non_finite_points() {
        let set = NodeSet::from_nodes([node(1, 0.0, 0.0)]).unwrap();

        let result = set.place(NodeId::new(1), Point::new(f64::NAN, 0.0));

        assert!(matches!(result, Err(LayoutError::NonFinitePosition { .. })));
        assert_eq!(set.position(NodeId::new(1)), Some(Point::ZERO));
    }

    #[test]
    fn empty_set() {
        let set = NodeSet::new();
        assert!(set.is_empty());
        assert!(set.snapshot().is_empty());
        assert_eq!(set.position(NodeId::new(1)), None);
    }
}
