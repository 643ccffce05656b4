//! Property tests for the tick protocol.

use proptest::prelude::*;

use spring_layout::engine::centroid_correction;
use spring_layout::graph::{EdgeWeights, Node, NodeId, NodeSet, Point, WeightFunction};

fn coordinate() -> impl Strategy<Value = f64> {
    -500.0..500.0f64
}

fn layout() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((coordinate(), coordinate()), 1..12)
}

fn relations(len: usize) -> impl Strategy<Value = Vec<(usize, usize, f64)>> {
    prop::collection::vec((0..len, 0..len, 1.0..100.0f64), 0..24)
}

fn build(positions: &[(f64, f64)], edges: &[(usize, usize, f64)], spring_constant: f64) -> EdgeWeights {
    let nodes = NodeSet::from_nodes(
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Node::new(NodeId::new(i as u64), Point::new(x, y))),
    )
    .unwrap();
    let mut weights = EdgeWeights::with_nodes(nodes).with_spring_constant(spring_constant);
    for &(from, to, rest_length) in edges {
        weights.connect_directed(NodeId::new(from as u64), NodeId::new(to as u64), rest_length);
    }
    weights
}

proptest! {
    /// After the correction is applied the mean pending displacement is zero.
    #[test]
    fn corrected_displacements_have_zero_mean(
        (positions, edges) in layout().prop_flat_map(|p| {
            let len = p.len();
            (Just(p), relations(len))
        }),
        spring_constant in 0.1..1.0f64,
    ) {
        let weights = build(&positions, &edges, spring_constant);
        let layout = weights.nodes().snapshot();
        let mut nodes = layout.clone();
        for node in &mut nodes {
            node.compute_forces(&layout, &weights).unwrap();
        }

        let correction = centroid_correction(&nodes);
        for node in &mut nodes {
            node.nudge(correction);
        }

        let count = nodes.len() as f64;
        let mean = nodes.iter().fold(Point::ZERO, |acc, n| acc + n.pending());
        let scale = nodes.iter().map(|n| n.pending().length()).fold(1.0, f64::max);
        prop_assert!(mean.x.abs() / count <= 1e-9 * scale);
        prop_assert!(mean.y.abs() / count <= 1e-9 * scale);
    }

    /// Committing twice without new forces leaves the node where it was.
    #[test]
    fn second_commit_is_a_no_op(
        x in coordinate(),
        y in coordinate(),
        dx in coordinate(),
        dy in coordinate(),
    ) {
        let mut node = Node::new(NodeId::new(1), Point::new(x, y));
        node.nudge(Point::new(dx, dy));
        node.commit();
        let position = node.position();

        prop_assert_eq!(node.commit(), Point::ZERO);
        prop_assert_eq!(node.position(), position);
    }
}
