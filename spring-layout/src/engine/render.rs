//! Renderer contract.
//!
//! The engine never draws anything itself. After each committed tick it asks
//! the renderer to draw every node of the new snapshot, and on a click it asks
//! the renderer where each node can be hit.

use crate::graph::{HitRegion, Node, Point};

/// Capability contract for drawing nodes and reacting to clicks.
///
/// Called from the scheduler thread (`draw`) and from whichever thread calls
/// `click` (`hit_region`, `clicked`).
pub trait Renderer: Send + Sync {
    /// Draw a node at its committed position.
    fn draw(&self, node: &Node);

    /// The region in which a click hits `node`.
    fn hit_region(&self, node: &Node) -> Box<dyn HitRegion + '_>;

    /// Called once for every node hit by a click.
    fn clicked(&self, node: &Node);
}

/// Renderer that draws nothing and can never be hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

struct Nowhere;

impl HitRegion for Nowhere {
    fn contains(&self, _point: Point) -> bool {
        false
    }
}

impl Renderer for NullRenderer {
    fn draw(&self, _node: &Node) {}

    fn hit_region(&self, _node: &Node) -> Box<dyn HitRegion + '_> {
        Box::new(Nowhere)
    }

    fn clicked(&self, _node: &Node) {}
}
