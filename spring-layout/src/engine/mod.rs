//! Layout Engine
//!
//! This module drives the layout: it runs the per-tick physics protocol,
//! schedules ticks on a background thread, and fans results out to renderers
//! and observers.
//!
//! # Overview
//!
//! - [`Simulation`] runs a single tick synchronously. It is deterministic for
//!   a fixed node order, fixed weights and a fixed starting layout.
//! - [`LayoutEngine`] owns a simulation and a background scheduler that calls
//!   it at a fixed rate until disposed.
//! - [`LayoutSnapshot`] is the immutable layout published after every tick.
//! - [`ObserverRegistry`] holds the refresh callbacks notified per tick.
//! - [`Renderer`] is the drawing and hit-testing contract supplied by the
//!   caller.
//!
//! # Synchronization Boundary
//!
//! Node positions only change inside the compute/commit window of a tick,
//! under the node set lock. Everything outside the scheduler (drawing,
//! hit-testing, observers) reads the published snapshot, so a half-committed
//! layout is never visible.

mod layout_engine;
mod observer;
mod render;
mod scheduler;
mod simulation;
mod snapshot;

pub use layout_engine::{EngineState, LayoutEngine};
pub use observer::{ObserverId, ObserverRegistry};
pub use render::{NullRenderer, Renderer};
pub use simulation::{centroid_correction, Simulation, TickReport};
pub use snapshot::LayoutSnapshot;
