//! Read-only view of the simulation for renderers and observers

use super::traffic_light::LightState;
use super::types::{CarId, LightId, Position};

/// A car as seen from outside
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleView {
    pub id: CarId,
    pub position: Position,
    /// Speed driven during the last tick
    pub speed: f32,
    pub edge_index: usize,
    pub path_len: usize,
    pub reservation: Option<LightId>,
}

/// A light as seen from outside
#[derive(Debug, Clone, PartialEq)]
pub struct LightView {
    pub id: LightId,
    pub position: Position,
    /// Signal of the horizontal flow
    pub state: LightState,
    pub reserved_by: Option<CarId>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub time: f32,
    pub vehicles: Vec<VehicleView>,
    pub lights: Vec<LightView>,
}
