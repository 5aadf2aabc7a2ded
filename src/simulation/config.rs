//! Tunable parameters for graph building, routing and car behaviour
//!
//! Distances are in map units (pixels of the authoring tool), speeds in map
//! units per second.

/// Hubs further than this from every road node stay unconnected
pub const HUB_SNAP_DISTANCE: f32 = 80.0;

/// Nodes closer than this are stitched together
pub const STITCH_DISTANCE: f32 = 40.0;

/// Extra routing cost per car already on an edge
pub const CONGESTION_PENALTY: f32 = 10.0;

/// Mean cruising speed of a freshly spawned car
pub const BASE_SPEED: f32 = 80.0;

/// Cruising speed is drawn uniformly from `BASE_SPEED ± SPEED_JITTER`
pub const SPEED_JITTER: f32 = 15.0;

/// Cars ahead within this radius are candidate leaders
pub const LEADER_DETECTION_RADIUS: f32 = 25.0;

/// Gap to the leader below which a car stops
pub const HARD_MIN_GAP: f32 = 18.0;

/// Gap to the leader below which a car halves its speed
pub const SOFT_GAP: f32 = 40.0;

/// Lights ahead within this radius are considered
pub const LIGHT_APPROACH_RADIUS: f32 = 80.0;

/// Distance from the light back to where cars wait on red
pub const STOP_POINT_OFFSET: f32 = 25.0;

/// A car this close to the stop point halts on red
pub const STOP_POINT_RADIUS: f32 = 35.0;

/// A car this close to a light reserved by someone else halts
pub const RESERVATION_BLOCK_RADIUS: f32 = 60.0;

/// A car this close to a green light reserves it
pub const RESERVATION_ACQUIRE_RADIUS: f32 = 40.0;

/// A car further than this from its reserved light releases it
pub const RESERVATION_RELEASE_RADIUS: f32 = 60.0;

/// Influence radius of hazard symbols
pub const SYMBOL_RADIUS: f32 = 50.0;

/// Speed cap near a `slow` symbol
pub const SLOW_ZONE_SPEED: f32 = 40.0;

/// Perpendicular offset applied on big roads
pub const LANE_OFFSET: f32 = 5.0;

/// Every knob of the simulation in one place
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub hub_snap_distance: f32,
    pub stitch_distance: f32,
    pub congestion_penalty: f32,
    /// Feed live per-edge car counts to the router when spawning
    pub congestion_aware_routing: bool,
    pub base_speed: f32,
    pub speed_jitter: f32,
    pub leader_detection_radius: f32,
    pub hard_min_gap: f32,
    pub soft_gap: f32,
    pub light_approach_radius: f32,
    pub stop_point_offset: f32,
    pub stop_point_radius: f32,
    pub reservation_block_radius: f32,
    pub reservation_acquire_radius: f32,
    pub reservation_release_radius: f32,
    pub symbol_radius: f32,
    pub slow_zone_speed: f32,
    pub lane_offset: f32,
    /// Let hubs spawn cars on their own according to their rate
    pub auto_spawn: bool,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hub_snap_distance: HUB_SNAP_DISTANCE,
            stitch_distance: STITCH_DISTANCE,
            congestion_penalty: CONGESTION_PENALTY,
            congestion_aware_routing: true,
            base_speed: BASE_SPEED,
            speed_jitter: SPEED_JITTER,
            leader_detection_radius: LEADER_DETECTION_RADIUS,
            hard_min_gap: HARD_MIN_GAP,
            soft_gap: SOFT_GAP,
            light_approach_radius: LIGHT_APPROACH_RADIUS,
            stop_point_offset: STOP_POINT_OFFSET,
            stop_point_radius: STOP_POINT_RADIUS,
            reservation_block_radius: RESERVATION_BLOCK_RADIUS,
            reservation_acquire_radius: RESERVATION_ACQUIRE_RADIUS,
            reservation_release_radius: RESERVATION_RELEASE_RADIUS,
            symbol_radius: SYMBOL_RADIUS,
            slow_zone_speed: SLOW_ZONE_SPEED,
            lane_offset: LANE_OFFSET,
            auto_spawn: true,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Default parameters with a fixed RNG seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Slowest cruising speed a car can be spawned with
    pub fn min_speed(&self) -> f32 {
        self.speed_range().0
    }

    /// Spawn speed bounds, never negative and never reversed
    ///
    /// The sign of the jitter is ignored.
    pub fn speed_range(&self) -> (f32, f32) {
        let jitter = self.speed_jitter.abs();
        let min = (self.base_speed - jitter).max(0.0);
        let max = (self.base_speed + jitter).max(min);
        (min, max)
    }
}
