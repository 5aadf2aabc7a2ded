//! Traffic Simulation Library
//!
//! Headless traffic simulation over rectangle maps: a road graph built from
//! axis-aligned road rectangles, congestion-aware routing between hubs,
//! cyclic traffic lights with intersection reservations and per-tick vehicle
//! kinematics.

pub mod simulation;
