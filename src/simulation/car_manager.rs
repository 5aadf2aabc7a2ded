//! Car spawning and management for the traffic simulation
//!
//! Free functions for creating, advancing and removing cars. They keep the
//! bookkeeping out of the world's tick.

use log::debug;

use super::car::{CarUpdateResult, SimCar, TickContext};
use super::config::SimConfig;
use super::error::{SimResult, SpawnError};
use super::intersection::ReservationRegistry;
use super::road_network::SimRoadNetwork;
use super::router::{find_path, CongestionMap, EdgeKey};
use super::types::{CarId, HubId, NodeId};

/// Route a new car from one hub to another
///
/// # Arguments
/// * `car_id` - The pre-generated car ID
/// * `from` - The hub the car starts at
/// * `to` - The destination hub
/// * `road_network` - The road network to use for pathfinding
/// * `congestion` - Cars per edge, penalised by the router when given
/// * `config` - Routing penalty
/// * `speed` - The cruising speed of the car
///
/// Returns the new car if a path of at least two nodes exists
pub fn spawn_vehicle(
    car_id: CarId,
    from: HubId,
    to: HubId,
    road_network: &SimRoadNetwork,
    congestion: Option<&CongestionMap>,
    config: &SimConfig,
    speed: f32,
) -> Result<SimCar, SpawnError> {
    let start = NodeId::Hub(from);
    let goal = NodeId::Hub(to);
    for (hub, node) in [(from, start), (to, goal)] {
        if !road_network.contains(&node) {
            return Err(SpawnError::UnknownHub(hub));
        }
    }

    let route = find_path(
        road_network,
        start,
        goal,
        congestion,
        config.congestion_penalty,
    )?;

    if route.nodes.len() < 2 {
        return Err(SpawnError::DegeneratePath {
            from: start,
            to: goal,
        });
    }

    // Both hubs were checked above, so the start has a position
    let position = road_network
        .position(&start)
        .ok_or(SpawnError::UnknownHub(from))?;

    debug!(
        "Car {} routed {} -> {} over {} nodes (cost {:.1})",
        car_id,
        start,
        goal,
        route.nodes.len(),
        route.cost
    );

    Ok(SimCar::new(car_id, route.nodes, position, speed))
}

/// Update all cars in insertion order
///
/// Each car sees the others as they are at that moment, so cars earlier in
/// the list have already moved this tick.
pub fn update_cars(
    delta_secs: f32,
    cars: &mut [SimCar],
    ctx: &TickContext<'_>,
    reservations: &mut ReservationRegistry,
) -> SimResult<Vec<(CarId, CarUpdateResult)>> {
    let mut results = Vec::with_capacity(cars.len());

    for index in 0..cars.len() {
        let (before, rest) = cars.split_at_mut(index);
        let Some((car, after)) = rest.split_first_mut() else {
            break;
        };
        let result = car.update(
            delta_secs,
            ctx,
            before.iter().chain(after.iter()),
            reservations,
        )?;
        results.push((car.id, result));
    }

    Ok(results)
}

/// Remove finished cars, freeing any intersection they still hold
///
/// Returns the IDs of the removed cars
pub fn despawn_finished(cars: &mut Vec<SimCar>, reservations: &mut ReservationRegistry) -> Vec<CarId> {
    let mut removed = Vec::new();
    cars.retain(|car| {
        if car.finished {
            reservations.release_all(car.id);
            removed.push(car.id);
            false
        } else {
            true
        }
    });
    removed
}

/// Count the cars currently driving each undirected edge
pub fn congestion_map(cars: &[SimCar]) -> CongestionMap {
    let mut congestion = CongestionMap::new();
    for (from, to) in cars
        .iter()
        .filter(|car| !car.finished)
        .filter_map(SimCar::current_edge)
    {
        *congestion.entry(EdgeKey::new(from, to)).or_default() += 1;
    }
    congestion
}
