//! Spring Layout
//!
//! This crate provides a continuously running force-directed layout engine
//! (a "spring embedder"). It implements:
//!
//! - Node physics with a two-phase compute/commit protocol
//! - A pluggable weighting strategy that decides which nodes attract or repel
//! - A background scheduler that advances the simulation at a fixed tick rate
//! - Immutable layout snapshots for renderers, hit-testing and observers
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Nodes, the node set, geometry and the weighting contract
//! - `engine`: The tick protocol, scheduler, observers and renderer contract
//! - `config`: Engine configuration
//! - `error`: The crate error type
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use spring_layout::engine::{LayoutEngine, NullRenderer};
//! use spring_layout::graph::{EdgeWeights, Node, NodeId, Point};
//!
//! let mut weights = EdgeWeights::new();
//! weights.add_node(Node::new(NodeId::new(1), Point::new(0.0, 0.0))).unwrap();
//! weights.add_node(Node::new(NodeId::new(2), Point::new(3.0, 4.0))).unwrap();
//! weights.connect(NodeId::new(1), NodeId::new(2), 10.0);
//!
//! let engine = LayoutEngine::new(Arc::new(weights), Arc::new(NullRenderer)).unwrap();
//! engine.subscribe(|snapshot| println!("tick {}", snapshot.tick()));
//!
//! // ... later
//! engine.dispose();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;

pub use config::EngineConfig;
pub use engine::{LayoutEngine, LayoutSnapshot, Renderer, Simulation};
pub use error::{LayoutError, Result};
pub use graph::{Node, NodeId, NodeSet, Point, WeightFunction};
