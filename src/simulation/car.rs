//! Car movement logic for the traffic simulation
//!
//! Each tick a car picks a speed from the car ahead, the lights and
//! reservations around it and the hazard symbols nearby, then moves along its
//! current edge. Speed changes are instantaneous.

use super::config::SimConfig;
use super::error::{SimError, SimResult};
use super::intersection::ReservationRegistry;
use super::map::{SymbolKind, SymbolSpec};
use super::road_network::SimRoadNetwork;
use super::traffic_light::SimTrafficLight;
use super::types::{CarId, LightId, NodeId, Position, RoadCategory};

/// Result of a car update indicating what happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarUpdateResult {
    /// Car moved (possibly at speed zero)
    Continue,
    /// A no-entry symbol ahead kept the car from moving at all
    Halted,
    /// Car reached the end of its path
    Finished,
}

/// Read-only world state a car looks at while updating
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub network: &'a SimRoadNetwork,
    pub lights: &'a [SimTrafficLight],
    pub symbols: &'a [SymbolSpec],
    pub config: &'a SimConfig,
}

/// A car in the traffic simulation
#[derive(Debug, Clone)]
pub struct SimCar {
    pub id: CarId,
    /// Nodes to drive through, fixed at spawn time
    pub path: Vec<NodeId>,
    /// Index of the edge `path[edge_index] -> path[edge_index + 1]`
    pub edge_index: usize,
    /// Fraction of the current edge already driven, in `[0, 1)`
    pub progress: f32,
    pub position: Position,
    /// Unit direction of the edge being driven, zero before the first move
    pub heading: Position,
    /// Cruising speed
    pub speed: f32,
    /// Speed actually driven during the last update
    pub current_speed: f32,
    /// Light whose intersection this car has reserved
    pub reservation: Option<LightId>,
    pub finished: bool,
}

impl SimCar {
    pub fn new(id: CarId, path: Vec<NodeId>, position: Position, speed: f32) -> Self {
        Self {
            id,
            path,
            edge_index: 0,
            progress: 0.0,
            position,
            heading: Position::ZERO,
            speed,
            current_speed: 0.0,
            reservation: None,
            finished: false,
        }
    }

    /// The edge being driven, if any is left
    pub fn current_edge(&self) -> Option<(NodeId, NodeId)> {
        let from = *self.path.get(self.edge_index)?;
        let to = *self.path.get(self.edge_index + 1)?;
        Some((from, to))
    }

    fn node_position(&self, network: &SimRoadNetwork, node: NodeId) -> SimResult<Position> {
        network
            .position(&node)
            .ok_or(SimError::MissingNode { car: self.id, node })
    }

    /// Update car movement logic for one tick
    ///
    /// `others` are the remaining cars, in any order; finished ones are ignored.
    pub fn update<'b>(
        &mut self,
        delta_secs: f32,
        ctx: &TickContext<'_>,
        others: impl IntoIterator<Item = &'b SimCar>,
        reservations: &mut ReservationRegistry,
    ) -> SimResult<CarUpdateResult> {
        if self.finished {
            return Ok(CarUpdateResult::Finished);
        }

        let Some((from, to)) = self.current_edge() else {
            self.finished = true;
            self.current_speed = 0.0;
            return Ok(CarUpdateResult::Finished);
        };

        let start = self.node_position(ctx.network, from)?;
        let end = self.node_position(ctx.network, to)?;
        let edge_vec = end - start;
        let edge_len = edge_vec.length();

        // Hub sitting exactly on a road node: nothing to drive
        if edge_len <= f32::EPSILON {
            return self.advance_edge(ctx.network);
        }

        let direction = edge_vec.normalized();
        self.heading = direction;
        let category = ctx.network.category_between(&from, &to);
        let config = ctx.config;

        let gap = self
            .find_leader(&direction, others, config)
            .map(|(_, gap)| gap);
        // Stuck right behind another car, so it cannot clear an intersection
        let queued = gap.is_some_and(|gap| gap < config.hard_min_gap);
        let mut max_speed = match gap {
            Some(_) if queued => 0.0,
            Some(gap) if gap < config.soft_gap => self.speed * 0.5,
            _ => self.speed,
        };

        max_speed = self.obey_lights(&direction, max_speed, queued, ctx, reservations);
        self.release_held_reservation(queued, ctx, reservations)?;

        match self.obey_symbols(&direction, max_speed, ctx) {
            Some(speed) => max_speed = speed,
            None => {
                self.current_speed = 0.0;
                return Ok(CarUpdateResult::Halted);
            }
        }

        self.current_speed = max_speed;
        self.progress += max_speed * delta_secs / edge_len;
        if self.progress >= 1.0 {
            return self.advance_edge(ctx.network);
        }

        let mut position = start.lerp(&end, self.progress);
        if category == RoadCategory::Big {
            position = position + lane_offset(&direction, config.lane_offset);
        }
        self.position = position;

        Ok(CarUpdateResult::Continue)
    }

    /// Nearest unfinished car ahead within the detection radius, with its distance
    ///
    /// Only cars driving our way can lead. Oncoming and crossing cars are
    /// skipped once they have a heading.
    pub fn find_leader<'b>(
        &self,
        direction: &Position,
        others: impl IntoIterator<Item = &'b SimCar>,
        config: &SimConfig,
    ) -> Option<(CarId, f32)> {
        let mut leader: Option<(CarId, f32)> = None;
        for other in others {
            let other_way = other.heading != Position::ZERO && other.heading.dot(direction) <= 0.0;
            if other.id == self.id || other.finished || other_way {
                continue;
            }
            let relative = other.position - self.position;
            let distance = relative.length();
            if distance < config.leader_detection_radius
                && relative.dot(direction) > 0.0
                && leader.map_or(true, |(_, gap)| distance < gap)
            {
                leader = Some((other.id, distance));
            }
        }
        leader
    }

    /// Clamp speed for red lights and intersections held by others, and
    /// reserve green intersections close ahead unless queued
    fn obey_lights(
        &mut self,
        direction: &Position,
        mut max_speed: f32,
        queued: bool,
        ctx: &TickContext<'_>,
        reservations: &mut ReservationRegistry,
    ) -> f32 {
        let config = ctx.config;
        for light in ctx.lights {
            let to_light = light.position - self.position;
            let distance = to_light.length();
            if distance >= config.light_approach_radius || to_light.dot(direction) <= 0.0 {
                continue;
            }

            let green = light.is_green_for(direction);
            let stop_point = light.position - direction.scale(config.stop_point_offset);

            if !green && stop_point.distance(&self.position) < config.stop_point_radius {
                max_speed = 0.0;
            }

            // A reservation held by someone else wins over a green light
            if reservations.is_reserved_by_other(light.id, self.id)
                && distance < config.reservation_block_radius
            {
                max_speed = 0.0;
            }

            if green
                && !queued
                && distance < config.reservation_acquire_radius
                && reservations.acquire(light.id, self.id)
            {
                if let Some(previous) = self.reservation.replace(light.id) {
                    if previous != light.id {
                        reservations.release(previous, self.id);
                    }
                }
            }
        }
        max_speed
    }

    /// Give the intersection back once the car is far enough past it, or
    /// while it waits behind another car
    fn release_held_reservation(
        &mut self,
        queued: bool,
        ctx: &TickContext<'_>,
        reservations: &mut ReservationRegistry,
    ) -> SimResult<()> {
        let Some(held) = self.reservation else {
            return Ok(());
        };
        let light = ctx
            .lights
            .iter()
            .find(|light| light.id == held)
            .ok_or(SimError::MissingLight {
                car: self.id,
                light: held,
            })?;

        if queued
            || light.position.distance(&self.position) > ctx.config.reservation_release_radius
        {
            reservations.release(held, self.id);
            self.reservation = None;
        }
        Ok(())
    }

    /// Speed after hazard symbols, or `None` when a no-entry symbol blocks the way
    fn obey_symbols(
        &self,
        direction: &Position,
        mut max_speed: f32,
        ctx: &TickContext<'_>,
    ) -> Option<f32> {
        let radius = ctx.config.symbol_radius;
        for symbol in ctx.symbols {
            let to_symbol = symbol.position() - self.position;
            let distance = to_symbol.length();
            match symbol.kind {
                SymbolKind::Slow if distance < radius => {
                    max_speed = max_speed.min(ctx.config.slow_zone_speed);
                }
                SymbolKind::NoEntry if distance < radius && to_symbol.dot(direction) > 0.0 => {
                    return None;
                }
                _ => {}
            }
        }
        Some(max_speed)
    }

    /// Move on to the next edge, snapping to its start node
    fn advance_edge(&mut self, network: &SimRoadNetwork) -> SimResult<CarUpdateResult> {
        self.edge_index += 1;
        self.progress = 0.0;

        if self.edge_index + 1 >= self.path.len() {
            if let Some(&last) = self.path.last() {
                self.position = self.node_position(network, last)?;
            }
            self.finished = true;
            return Ok(CarUpdateResult::Finished);
        }

        self.position = self.node_position(network, self.path[self.edge_index])?;
        Ok(CarUpdateResult::Continue)
    }
}

/// Perpendicular nudge keeping opposite directions apart on big roads
///
/// The offset is taken from the dominant travel axis, so eastbound cars sit
/// on one side and westbound cars on the other.
fn lane_offset(direction: &Position, offset: f32) -> Position {
    let axis = if direction.x.abs() >= direction.y.abs() {
        Position::new(direction.x.signum(), 0.0)
    } else {
        Position::new(0.0, direction.y.signum())
    };
    axis.perpendicular().scale(offset)
}
