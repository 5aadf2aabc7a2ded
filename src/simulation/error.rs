//! Error types for the traffic simulation.

use thiserror::Error;

use super::types::{CarId, HubId, LightId, NodeId};

/// A map document that cannot be loaded. Nothing from it is applied.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed map document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("road {id} has degenerate size {width}x{height}")]
    DegenerateRoad { id: u32, width: f32, height: f32 },

    #[error("{kind} {id}: invalid {field} ({value})")]
    InvalidValue {
        kind: &'static str,
        id: u32,
        field: &'static str,
        value: f32,
    },
}

pub type MapResult<T> = Result<T, MapError>;

/// No route between two graph nodes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("node {0} not found in road network")]
    UnknownNode(NodeId),

    #[error("no route from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },
}

/// A spawn request that was rejected. Never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error("hub {0} does not exist")]
    UnknownHub(HubId),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("route from {from} to {to} has fewer than two nodes")]
    DegeneratePath { from: NodeId, to: NodeId },
}

/// Broken simulation invariants. Nodes and lights are never removed during a
/// run, so a dangling reference is a logic error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("car {car} references node {node} which is not in the road network")]
    MissingNode { car: CarId, node: NodeId },

    #[error("car {car} holds light {light} which is not registered")]
    MissingLight { car: CarId, light: LightId },
}

pub type SimResult<T> = Result<T, SimError>;
