//! Network-subsystem error type.

use thiserror::Error;

use fleet_core::{CoreError, NodeId, RouteId};

/// Errors produced by `fleet-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("route {0} not found")]
    RouteNotFound(RouteId),

    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate route id {0}")]
    DuplicateRoute(RouteId),

    #[error("node {id}: {source}")]
    InvalidCoordinate { id: NodeId, source: CoreError },

    #[error("route {route} path references unknown node {node}")]
    UnknownPathNode { route: RouteId, node: NodeId },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
