use thiserror::Error;

use tsim_core::VehicleId;
use tsim_graph::GraphError;

#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("vehicle {0} has already finished its route")]
    RouteExhausted(VehicleId),

    #[error("route must visit at least 2 vertices, got {0}")]
    InvalidRoute(usize),

    #[error("invalid vehicle parameter: {0}")]
    InvalidParameter(String),

    #[error("route does not follow the graph: {0}")]
    Graph(#[from] GraphError),
}

pub type VehicleResult<T> = Result<T, VehicleError>;
