//! Layout Engine
//!
//! The engine ties a [`Simulation`] to a background [`Scheduler`] and exposes
//! the lifecycle the rest of an application sees: subscribe to refreshes,
//! forward clicks, and dispose.
//!
//! # States
//!
//! ```text
//! Created ──(scheduler started)──> Running ──dispose()──> Disposed
//! ```
//!
//! `Created` only exists while the constructor runs. `Disposed` is terminal.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::observer::ObserverId;
use super::render::Renderer;
use super::scheduler::Scheduler;
use super::simulation::Simulation;
use super::snapshot::LayoutSnapshot;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::{Point, WeightFunction};

/// Lifecycle state of a [`LayoutEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, scheduler not started yet.
    Created,

    /// The scheduler is ticking.
    Running,

    /// The scheduler has stopped and observers were released.
    Disposed,
}

/// A continuously running force-directed layout.
///
/// # Example
///
/// ```rust,ignore
/// let engine = LayoutEngine::new(weights, renderer)?;
///
/// engine.subscribe(|snapshot| canvas.request_repaint());
/// engine.click(Point::new(120.0, 48.0));
///
/// engine.dispose();
/// ```
pub struct LayoutEngine {
    simulation: Arc<Simulation>,
    scheduler: Scheduler,
    state: Mutex<EngineState>,
    config: EngineConfig,
}

impl LayoutEngine {
    /// Create an engine with the default configuration and start ticking.
    pub fn new(weights: Arc<dyn WeightFunction>, renderer: Arc<dyn Renderer>) -> Result<Self> {
        Self::with_config(weights, renderer, EngineConfig::default())
    }

    /// Create an engine and start ticking.
    pub fn with_config(
        weights: Arc<dyn WeightFunction>,
        renderer: Arc<dyn Renderer>,
        config: EngineConfig,
    ) -> Result<Self> {
        let state = Mutex::new(EngineState::Created);
        let simulation = Arc::new(Simulation::new(weights, renderer));
        let scheduler = Scheduler::spawn(Arc::clone(&simulation), &config)?;
        *state.lock() = EngineState::Running;

        info!(
            nodes = simulation.snapshot().len(),
            tick_rate_hz = config.tick_rate_hz,
            "layout engine running"
        );

        Ok(Self {
            simulation,
            scheduler,
            state,
            config,
        })
    }

    pub fn state(&self) -> EngineState {
        *self.state.lock()
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == EngineState::Disposed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a refresh callback, run once per tick with the new snapshot.
    ///
    /// After disposal the callback is dropped immediately and never runs.
    pub fn subscribe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&LayoutSnapshot) + Send + Sync + 'static,
    {
        let state = self.state.lock();
        if *state == EngineState::Disposed {
            debug!("subscribe after dispose ignored");
            return ObserverId::new();
        }
        self.simulation.observers().subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.simulation.observers().unsubscribe(id)
    }

    /// Forward a click to every node whose hit region contains `point`.
    ///
    /// Returns whether at least one node was hit.
    pub fn click(&self, point: Point) -> bool {
        self.simulation.click(point)
    }

    /// Latest published layout.
    pub fn snapshot(&self) -> Arc<LayoutSnapshot> {
        self.simulation.snapshot()
    }

    /// Number of committed ticks so far.
    pub fn tick_count(&self) -> u64 {
        self.simulation.tick_count()
    }

    /// Stop the scheduler and release every observer.
    ///
    /// Once this returns no further tick runs and no observer is notified,
    /// including the rest of a notification in flight when an observer
    /// disposes the engine. Calling it again does nothing.
    pub fn dispose(&self) {
        {
            let mut state = self.state.lock();
            if *state == EngineState::Disposed {
                return;
            }
            *state = EngineState::Disposed;
        }

        self.simulation.observers().close();
        self.scheduler.stop();

        info!(ticks = self.tick_count(), "layout engine disposed");
    }
}

impl Drop for LayoutEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("state", &self.state())
            .field("simulation", &self.simulation)
            .field("config", &self.config)
            .finish()
    }
}
