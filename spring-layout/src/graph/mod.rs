//! Layout Graph
//!
//! This module holds the physical side of the layout: the nodes being
//! positioned, the collection they live in, and the weighting strategy that
//! relates them.
//!
//! # Overview
//!
//! - A [`Node`] is a particle with a position and a pending displacement.
//! - A [`NodeSet`] is the caller-owned collection of nodes. The engine locks it
//!   for the compute/commit window of a tick; nothing else mutates positions
//!   during that window.
//! - A [`WeightFunction`] decides which ordered pairs of nodes are related and
//!   what their rest length is.
//!
//! # Two-Phase Update
//!
//! Forces for every node are computed against the same tick-start layout and
//! stored as a pending displacement. Only once every node has been computed
//! are the displacements committed. This keeps the result independent of the
//! order in which nodes are visited.

mod geometry;
mod node;
mod node_set;
mod weight;

pub use geometry::{Circle, HitRegion, Point, Rect};
pub use node::{jitter, Node, NodeId};
pub use node_set::NodeSet;
pub use weight::{EdgeWeights, WeightFunction};
