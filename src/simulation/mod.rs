//! Standalone traffic simulation module
//!
//! This module contains all the core traffic simulation logic. A renderer
//! can drive it through `SimWorld::tick` and read `SimWorld::snapshot`, and
//! it can be tested via console without any UI.

mod car;
mod car_manager;
mod config;
mod error;
mod intersection;
mod map;
mod road_network;
mod router;
mod snapshot;
mod traffic_light;
mod types;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use car::{CarUpdateResult, SimCar, TickContext};
#[allow(unused_imports)]
pub use car_manager::{congestion_map, despawn_finished, spawn_vehicle, update_cars};
#[allow(unused_imports)]
pub use config::{
    SimConfig, BASE_SPEED, CONGESTION_PENALTY, HARD_MIN_GAP, HUB_SNAP_DISTANCE, LANE_OFFSET,
    LEADER_DETECTION_RADIUS, LIGHT_APPROACH_RADIUS, RESERVATION_ACQUIRE_RADIUS,
    RESERVATION_BLOCK_RADIUS, RESERVATION_RELEASE_RADIUS, SLOW_ZONE_SPEED, SOFT_GAP, SPEED_JITTER,
    STITCH_DISTANCE, STOP_POINT_OFFSET, STOP_POINT_RADIUS, SYMBOL_RADIUS,
};
#[allow(unused_imports)]
pub use error::{MapError, MapResult, RouteError, SimError, SimResult, SpawnError};
#[allow(unused_imports)]
pub use intersection::ReservationRegistry;
#[allow(unused_imports)]
pub use map::{HubSpec, LightSpec, MapDocument, RoadSpec, SymbolKind, SymbolSpec};
#[allow(unused_imports)]
pub use road_network::SimRoadNetwork;
#[allow(unused_imports)]
pub use router::{find_path, CongestionMap, EdgeKey, Route};
#[allow(unused_imports)]
pub use snapshot::{LightView, Snapshot, VehicleView};
#[allow(unused_imports)]
pub use traffic_light::{LightState, SimTrafficLight};
#[allow(unused_imports)]
pub use types::{
    Anchor, CarId, HubId, LightId, NodeId, Orientation, Position, Rect, RoadCategory, RoadId,
    RoadNodeKey,
};
pub use world::{SimStats, SimWorld};
