//! Layout Nodes
//!
//! A node is a particle in the simulation. Besides its position it carries a
//! pending displacement: the motion accumulated during the compute phase of a
//! tick that has not been applied yet.
//!
//! # Lifecycle Within a Tick
//!
//! 1. `compute_forces` adds the spring pull of every related node into the
//!    pending displacement.
//! 2. The engine adds the centroid correction with `nudge`.
//! 3. `commit` moves the node and clears the pending displacement.
//!
//! Outside that window the pending displacement is always zero.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::weight::WeightFunction;
use crate::error::{LayoutError, Result};

/// Stable node identifier.
///
/// Assigned by the caller's data model. Besides identifying the node it seeds
/// the jitter tie-break, so it must not be derived from memory addresses or
/// anything else that changes between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u64> for NodeId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Deterministic standard-normal vector for breaking positional ties.
///
/// The generator is seeded from the node id alone, so the same node always
/// receives the same nudge.
pub fn jitter(id: NodeId) -> Point {
    let mut rng = StdRng::seed_from_u64(id.raw());
    let x: f64 = rng.sample(StandardNormal);
    let y: f64 = rng.sample(StandardNormal);
    Point::new(x, y)
}

/// A particle in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,

    /// Current committed position.
    position: Point,

    /// Displacement accumulated this tick, not yet applied.
    #[serde(skip)]
    pending: Point,
}

impl Node {
    pub fn new(id: NodeId, position: Point) -> Self {
        Self {
            id,
            position,
            pending: Point::ZERO,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Displacement waiting for the next `commit`.
    pub fn pending(&self) -> Point {
        self.pending
    }

    /// Accumulate the spring forces exerted on this node by `layout`.
    ///
    /// Every node in `layout` other than this one (matched by id) that
    /// `weights` relates to this node pulls it toward the rest length of that
    /// relation. Positions are read from `layout`, not from `self`, apart from
    /// this node's own position.
    ///
    /// If every related node sits exactly on top of this one, the pull
    /// cancels out and the node receives its jitter vector instead.
    ///
    /// On error the pending displacement is left as it was.
    pub fn compute_forces(&mut self, layout: &[Node], weights: &dyn WeightFunction) -> Result<()> {
        let mut displacement = Point::ZERO;
        let mut coincident = false;

        for other in layout {
            if other.id == self.id || !weights.has_weight(self, other) {
                continue;
            }

            let rest_length = weights.weight(self, other);
            if !rest_length.is_finite() {
                return Err(LayoutError::InvalidWeight {
                    from: self.id,
                    to: other.id,
                    weight: rest_length,
                });
            }

            let delta = other.position - self.position;
            if delta.is_zero() {
                coincident = true;
                continue;
            }

            let distance = delta.length();
            displacement += (delta - delta.scale(rest_length / distance)).scale(0.5);
        }

        if coincident && displacement.is_zero() {
            displacement = jitter(self.id);
        }

        let spring_constant = weights.spring_constant();
        if !spring_constant.is_finite() {
            return Err(LayoutError::InvalidSpringConstant(spring_constant));
        }

        self.pending += displacement.scale(spring_constant);
        Ok(())
    }

    /// Add an extra displacement to be applied at the next commit.
    pub fn nudge(&mut self, delta: Point) {
        self.pending += delta;
    }

    /// Apply the pending displacement and clear it.
    ///
    /// Returns the displacement that was applied.
    pub fn commit(&mut self) -> Point {
        let applied = self.pending;
        self.position += applied;
        self.pending = Point::ZERO;
        applied
    }

    /// Drop the pending displacement without moving.
    pub fn discard(&mut self) {
        self.pending = Point::ZERO;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeWeights, NodeSet};

    fn pair(a: Point, b: Point, rest_length: f64) -> EdgeWeights {
        let nodes = NodeSet::from_nodes([
            Node::new(NodeId::new(1), a),
            Node::new(NodeId::new(2), b),
        ])
        .unwrap();
        let mut weights = EdgeWeights::with_nodes(nodes);
        weights.connect(NodeId::new(1), NodeId::new(2), rest_length);
        weights
    }

    #[test]
    fn stretched_spring_pulls_toward_neighbor() {
        let weights = pair(Point::new(0.0, 0.0), Point::new(20.0, 0.0), 10.0);
        let layout = weights.nodes().snapshot();
        let mut node = layout[0];

        node.compute_forces(&layout, &weights).unwrap();

        // 0.5 * (20 - 20/20 * 10) = 5
        assert_eq!(node.pending(), Point::new(5.0, 0.0));
        assert_eq!(node.position(), Point::ZERO);
    }

    #[test]
    fn compressed_spring_pushes_away() {
        let weights = pair(Point::new(0.0, 0.0), Point::new(0.0, 4.0), 10.0);
        let layout = weights.nodes().snapshot();
        let mut node = layout[0];

        node.compute_forces(&layout, &weights).unwrap();

        assert_eq!(node.pending(), Point::new(0.0, -3.0));
    }

    #[test]
    fn spring_constant_scales_displacement() {
        let weights = pair(Point::new(0.0, 0.0), Point::new(20.0, 0.0), 10.0)
            .with_spring_constant(0.5);
        let layout = weights.nodes().snapshot();
        let mut node = layout[0];

        node.compute_forces(&layout, &weights).unwrap();

        assert_eq!(node.pending(), Point::new(2.5, 0.0));
    }

    #[test]
    fn coincident_nodes_receive_jitter() {
        let weights = pair(Point::ZERO, Point::ZERO, 10.0);
        let layout = weights.nodes().snapshot();
        let mut a = layout[0];
        let mut b = layout[1];

        a.compute_forces(&layout, &weights).unwrap();
        b.compute_forces(&layout, &weights).unwrap();

        assert_eq!(a.pending(), jitter(NodeId::new(1)));
        assert_eq!(b.pending(), jitter(NodeId::new(2)));
        assert_ne!(a.pending(), b.pending());
    }

    #[test]
    fn jitter_is_reproducible() {
        let id = NodeId::new(42);
        assert_eq!(jitter(id), jitter(id));
        assert!(jitter(id).is_finite());
        assert!(!jitter(id).is_zero());
    }

    #[test]
    fn unrelated_node_gets_no_force() {
        let nodes = NodeSet::from_nodes([
            Node::new(NodeId::new(1), Point::ZERO),
            Node::new(NodeId::new(2), Point::new(7.0, 7.0)),
        ])
        .unwrap();
        let weights = EdgeWeights::with_nodes(nodes);
        let layout = weights.nodes().snapshot();
        let mut node = layout[0];

        node.compute_forces(&layout, &weights).unwrap();

        assert!(node.pending().is_zero());
    }

    #[test]
    fn non_finite_weight_is_rejected() {
        let weights = pair(Point::ZERO, Point::new(1.0, 0.0), f64::NAN);
        let layout = weights.nodes().snapshot();
        let mut node = layout[0];

        let err = node.compute_forces(&layout, &weights).unwrap_err();

        assert!(matches!(err, LayoutError::InvalidWeight { .. }));
        assert!(node.pending().is_zero());
    }

    #[test]
    fn non_finite_spring_constant_is_rejected() {
        let weights = pair(Point::ZERO, Point::new(1.0, 0.0), 1.0)
            .with_spring_constant(f64::INFINITY);
        let layout = weights.nodes().snapshot();
        let mut node = layout[0];

        let err = node.compute_forces(&layout, &weights).unwrap_err();

        assert!(matches!(err, LayoutError::InvalidSpringConstant(_)));
        assert!(node.pending().is_zero());
    }

    #[test]
    fn commit_applies_then_clears() {
        let mut node = Node::new(NodeId::new(1), Point::new(1.0, 1.0));
        node.nudge(Point::new(2.0, -1.0));

        assert_eq!(node.commit(), Point::new(2.0, -1.0));
        assert_eq!(node.position(), Point::new(3.0, 0.0));
        assert!(node.pending().is_zero());

        // Second commit without new forces is a no-op
        assert_eq!(node.commit(), Point::ZERO);
        assert_eq!(node.position(), Point::new(3.0, 0.0));
    }

    #[test]
    fn discard_drops_pending() {
        let mut node = Node::new(NodeId::new(1), Point::ZERO);
        node.nudge(Point::new(5.0, 5.0));
        node.discard();
        node.commit();
        assert_eq!(node.position(), Point::ZERO);
    }
}
