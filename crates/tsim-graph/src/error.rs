//! Graph-subsystem error type.

use thiserror::Error;

use tsim_core::VertexId;

/// Errors produced by `tsim-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {0} is not registered")]
    UnknownVertex(VertexId),

    #[error("edge {from}->{to} has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight { from: VertexId, to: VertexId, weight: f64 },

    #[error("no edge {from}->{to}")]
    NoSuchEdge { from: VertexId, to: VertexId },

    #[error("no route from {from} to {to}")]
    NoRoute { from: VertexId, to: VertexId },

    #[error("vertex ids must be below {limit} for this backing")]
    CapacityExceeded { limit: usize },

    #[error("malformed graph encoding: {0}")]
    Codec(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
