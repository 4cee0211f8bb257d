use thiserror::Error;

use tsim_core::{CoreError, EdgeId, VertexId};
use tsim_graph::GraphError;
use tsim_signal::SignalError;
use tsim_vehicle::VehicleError;

use crate::EngineState;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("operation not allowed while the engine is {0:?}")]
    InvalidState(EngineState),

    #[error("light at vertex {at} controls edge {edge}, which does not leave that vertex")]
    UnknownEdge { at: VertexId, edge: EdgeId },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("vehicle error: {0}")]
    Vehicle(#[from] VehicleError),

    #[error("malformed scenario: {0}")]
    Scenario(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
