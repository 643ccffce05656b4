//! Error types for the layout engine.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors raised by the layout engine and its collaborators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// The weighting strategy returned a NaN or infinite rest length.
    #[error("invalid weight {weight} between {from} and {to}")]
    InvalidWeight {
        from: NodeId,
        to: NodeId,
        weight: f64,
    },

    /// The weighting strategy returned a NaN or infinite spring constant.
    #[error("invalid spring constant {0}")]
    InvalidSpringConstant(f64),

    #[error("{0} is already part of the node set")]
    DuplicateNode(NodeId),

    #[error("{0} is not part of the node set")]
    UnknownNode(NodeId),

    /// A caller tried to place a node at a non-finite coordinate.
    #[error("non-finite position ({x}, {y}) for {id}")]
    NonFinitePosition { id: NodeId, x: f64, y: f64 },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The background scheduler could not be started.
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;
