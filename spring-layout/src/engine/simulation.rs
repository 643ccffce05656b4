//! Tick Protocol
//!
//! A [`Simulation`] advances the layout one tick at a time. It is what the
//! background scheduler calls, and it can also be driven synchronously, which
//! makes runs bit-reproducible.
//!
//! # Algorithm
//!
//! Each tick:
//!
//! 1. Lock the node set and copy the tick-start layout.
//! 2. Compute the spring forces of every node against that copy. If the
//!    weighting strategy hands back a non-finite value, every pending
//!    displacement is discarded and the tick is rejected without moving
//!    anything.
//! 3. Compute the centroid correction, the negated mean pending
//!    displacement, so the layout as a whole does not drift.
//! 4. Add the correction to every node and commit.
//! 5. Publish a new snapshot, draw it, and notify observers.
//!
//! Steps 1 to 4 happen under the node set lock. Step 5 runs after it has been
//! released and only touches the immutable snapshot.
//!
//! If a collaborator panics during step 2 the pending displacements are
//! discarded while the panic unwinds, so no half-computed motion leaks into
//! the next tick. A panicking `draw` is caught and counted like a panicking
//! observer.
//!
//! Forces for different nodes are independent, so step 2 could be split
//! across threads. The commit must still wait for all of them.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, error};

use super::observer::ObserverRegistry;
use super::render::Renderer;
use super::snapshot::LayoutSnapshot;
use crate::error::Result;
use crate::graph::{Node, NodeId, Point, WeightFunction};

/// Outcome of a committed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,

    /// Number of nodes laid out.
    pub nodes: usize,

    /// Length of the largest displacement applied this tick.
    pub max_displacement: f64,

    /// Nodes whose `draw` call panicked.
    pub render_failures: usize,

    /// Observers that panicked while being notified.
    pub observer_failures: usize,
}

/// The compute/commit window of a tick.
///
/// Until `committed` is set, dropping the window (early return or unwind)
/// clears every pending displacement.
struct PendingWindow<'a> {
    nodes: &'a mut IndexMap<NodeId, Node>,
    committed: bool,
}

impl Drop for PendingWindow<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.nodes.values_mut().for_each(Node::discard);
        }
    }
}

/// Uniform displacement that cancels the mean pending displacement of `nodes`.
///
/// Zero for an empty slice.
pub fn centroid_correction<'a, I>(nodes: I) -> Point
where
    I: IntoIterator<Item = &'a Node>,
{
    let (sum, count) = nodes
        .into_iter()
        .fold((Point::ZERO, 0usize), |(sum, count), node| {
            (sum + node.pending(), count + 1)
        });

    if count == 0 {
        return Point::ZERO;
    }
    let count = count as f64;
    Point::new(-sum.x / count, -sum.y / count)
}

/// Synchronous driver for the layout.
pub struct Simulation {
    weights: Arc<dyn WeightFunction>,
    renderer: Arc<dyn Renderer>,
    observers: ObserverRegistry,

    /// Latest published snapshot.
    snapshot: RwLock<Arc<LayoutSnapshot>>,

    /// Number of committed ticks.
    ticks: AtomicU64,
}

impl Simulation {
    /// Create a simulation over the nodes supplied by `weights`.
    ///
    /// The initial snapshot (tick 0) reflects the current node positions.
    pub fn new(weights: Arc<dyn WeightFunction>, renderer: Arc<dyn Renderer>) -> Self {
        let initial = LayoutSnapshot::new(0, weights.nodes().snapshot());
        Self {
            weights,
            renderer,
            observers: ObserverRegistry::new(),
            snapshot: RwLock::new(Arc::new(initial)),
            ticks: AtomicU64::new(0),
        }
    }

    /// Run one tick.
    pub fn step(&self) -> Result<TickReport> {
        let (snapshot, max_displacement) = {
            let mut guard = self.weights.nodes().lock();
            let mut window = PendingWindow {
                nodes: &mut *guard,
                committed: false,
            };
            let layout: Vec<Node> = window.nodes.values().copied().collect();

            window
                .nodes
                .values_mut()
                .try_for_each(|node| node.compute_forces(&layout, self.weights.as_ref()))?;

            let correction = centroid_correction(window.nodes.values());
            let mut max_displacement: f64 = 0.0;
            for node in window.nodes.values_mut() {
                node.nudge(correction);
                max_displacement = max_displacement.max(node.commit().length());
            }
            window.committed = true;

            let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
            let snapshot = Arc::new(LayoutSnapshot::new(
                tick,
                window.nodes.values().copied().collect(),
            ));
            *self.snapshot.write() = Arc::clone(&snapshot);
            (snapshot, max_displacement)
        };

        let mut render_failures = 0;
        for node in snapshot.nodes() {
            if panic::catch_unwind(AssertUnwindSafe(|| self.renderer.draw(node))).is_err() {
                render_failures += 1;
                error!(node = %node.id(), tick = snapshot.tick(), "renderer panicked while drawing");
            }
        }
        let observer_failures = self.observers.notify(&snapshot);

        debug!(
            tick = snapshot.tick(),
            nodes = snapshot.len(),
            max_displacement,
            "tick committed"
        );

        Ok(TickReport {
            tick: snapshot.tick(),
            nodes: snapshot.len(),
            max_displacement,
            render_failures,
            observer_failures,
        })
    }

    /// Run up to `ticks` ticks, stopping at the first rejected one.
    pub fn run(&self, ticks: usize) -> Result<Option<TickReport>> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step()?);
        }
        Ok(last)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<LayoutSnapshot> {
        self.snapshot.read().clone()
    }

    /// Number of committed ticks.
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn weights(&self) -> &Arc<dyn WeightFunction> {
        &self.weights
    }

    /// Hit-test `point` against every node of the latest snapshot.
    ///
    /// Every node whose region contains the point gets a `clicked` callback,
    /// overlapping ones included. Returns whether any node was hit.
    pub fn click(&self, point: Point) -> bool {
        let snapshot = self.snapshot();
        snapshot.nodes().iter().fold(false, |hit, node| {
            let inside = self.renderer.hit_region(node).contains(point);
            if inside {
                self.renderer.clicked(node);
            }
            hit || inside
        })
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick_count", &self.tick_count())
            .field("observers", &self.observers)
            .finish()
    }
}
