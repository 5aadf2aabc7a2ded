//! Main simulation world that ties everything together
//!
//! Owns the road network, lights, symbols, cars and the reservation registry.
//! A tick advances lights, then cars in insertion order, then drops finished
//! cars, then handles spawns.

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::path::Path;

use super::car::{CarUpdateResult, SimCar, TickContext};
use super::car_manager;
use super::config::SimConfig;
use super::error::{MapResult, RouteError, SimResult, SpawnError};
use super::intersection::ReservationRegistry;
use super::map::{HubSpec, MapDocument, RoadSpec, SymbolKind, SymbolSpec};
use super::road_network::SimRoadNetwork;
use super::router::{find_path, CongestionMap, Route};
use super::snapshot::{LightView, Snapshot, VehicleView};
use super::traffic_light::{LightState, SimTrafficLight};
use super::types::{CarId, HubId, NodeId, RoadCategory};

/// Running totals for a simulation session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    pub total_cars_spawned: u32,
    pub total_cars_completed: u32,
    /// Spawn attempts dropped for lack of a usable route
    pub rejected_spawns: u32,
    pub elapsed_time: f32,
}

impl SimStats {
    /// Share of spawned cars that reached their destination, in percent
    pub fn success_rate(&self) -> f32 {
        if self.total_cars_spawned > 0 {
            (self.total_cars_completed as f32 / self.total_cars_spawned as f32) * 100.0
        } else {
            0.0
        }
    }
}

/// The main simulation world
pub struct SimWorld {
    /// Road network for pathfinding and positions
    pub road_network: SimRoadNetwork,

    /// Roads as loaded, in document order
    pub roads: Vec<RoadSpec>,

    pub hubs: Vec<HubSpec>,

    pub lights: Vec<SimTrafficLight>,

    pub symbols: Vec<SymbolSpec>,

    /// Active cars in insertion order
    pub cars: Vec<SimCar>,

    pub reservations: ReservationRegistry,

    pub config: SimConfig,

    pub stats: SimStats,

    /// Spawn commands waiting for the next tick
    pending_spawns: VecDeque<(HubId, HubId)>,

    /// Next ID to assign
    next_car_id: usize,

    /// Simulation time
    pub time: f32,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    /// Build a world from a map document, validating it first
    pub fn load(document: MapDocument, config: SimConfig) -> MapResult<Self> {
        document.validate()?;

        let road_network = SimRoadNetwork::build(&document, &config);
        let lights = document
            .lights
            .iter()
            .map(SimTrafficLight::from_spec)
            .collect();
        let rng = config.seed.map(StdRng::seed_from_u64);

        info!(
            "Loaded map: {} roads, {} hubs, {} lights, {} symbols",
            document.roads.len(),
            document.hubs.len(),
            document.lights.len(),
            document.symbols.len()
        );

        Ok(Self {
            road_network,
            roads: document.roads,
            hubs: document.hubs,
            lights,
            symbols: document.symbols,
            cars: Vec::new(),
            reservations: ReservationRegistry::new(),
            config,
            stats: SimStats::default(),
            pending_spawns: VecDeque::new(),
            next_car_id: 0,
            time: 0.0,
            rng,
        })
    }

    pub fn from_json(text: &str, config: SimConfig) -> MapResult<Self> {
        Self::load(MapDocument::from_json(text)?, config)
    }

    pub fn from_path(path: impl AsRef<Path>, config: SimConfig) -> MapResult<Self> {
        Self::load(MapDocument::from_path(path)?, config)
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::RangeInclusive<f32>) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Roll a probability, using seeded RNG if available
    fn random_chance(&mut self, probability: f32) -> bool {
        let roll: f32 = match &mut self.rng {
            Some(rng) => rng.random(),
            None => rand::rng().random(),
        };
        roll < probability
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    /// Cars per undirected edge right now
    pub fn congestion(&self) -> CongestionMap {
        car_manager::congestion_map(&self.cars)
    }

    /// Cheapest path between two nodes under the current traffic
    pub fn route(&self, start: NodeId, goal: NodeId) -> Result<Route, RouteError> {
        let congestion = self
            .config
            .congestion_aware_routing
            .then(|| self.congestion());
        find_path(
            &self.road_network,
            start,
            goal,
            congestion.as_ref(),
            self.config.congestion_penalty,
        )
    }

    /// Spawn a car from one hub to another right away
    pub fn spawn(&mut self, from: HubId, to: HubId) -> Result<CarId, SpawnError> {
        let congestion = self
            .config
            .congestion_aware_routing
            .then(|| self.congestion());
        let (min_speed, max_speed) = self.config.speed_range();
        let speed = self.random_range(min_speed..=max_speed);
        let id = CarId(self.next_car_id);

        let result = car_manager::spawn_vehicle(
            id,
            from,
            to,
            &self.road_network,
            congestion.as_ref(),
            &self.config,
            speed,
        );

        match result {
            Ok(car) => {
                self.next_car_id += 1;
                self.cars.push(car);
                self.stats.total_cars_spawned += 1;
                Ok(id)
            }
            Err(err) => {
                self.stats.rejected_spawns += 1;
                Err(err)
            }
        }
    }

    /// Queue a spawn command for the next tick
    pub fn request_spawn(&mut self, from: HubId, to: HubId) {
        self.pending_spawns.push_back((from, to));
    }

    /// Main simulation tick
    pub fn tick(&mut self, delta_secs: f32) -> SimResult<()> {
        self.time += delta_secs;
        self.stats.elapsed_time = self.time;

        self.update_lights(delta_secs);

        let results = self.update_cars(delta_secs)?;
        let halted = results
            .iter()
            .filter(|(_, result)| *result == CarUpdateResult::Halted)
            .count();
        if halted > 0 {
            debug!("{} cars held back by no-entry symbols", halted);
        }

        let completed = car_manager::despawn_finished(&mut self.cars, &mut self.reservations);
        for car_id in &completed {
            debug!("Car {} reached its destination", car_id);
        }
        self.stats.total_cars_completed += completed.len() as u32;

        self.process_spawn_requests();
        if self.config.auto_spawn {
            self.spawn_from_hubs(delta_secs);
        }

        Ok(())
    }

    /// Update all traffic light timers
    fn update_lights(&mut self, delta_secs: f32) {
        for light in &mut self.lights {
            light.update(delta_secs);
        }
    }

    /// Update all cars in the simulation
    fn update_cars(&mut self, delta_secs: f32) -> SimResult<Vec<(CarId, CarUpdateResult)>> {
        let ctx = TickContext {
            network: &self.road_network,
            lights: &self.lights,
            symbols: &self.symbols,
            config: &self.config,
        };
        car_manager::update_cars(delta_secs, &mut self.cars, &ctx, &mut self.reservations)
            .inspect_err(|err| error!("Simulation invariant violated: {}", err))
    }

    /// Spawn explicitly requested cars
    fn process_spawn_requests(&mut self) {
        while let Some((from, to)) = self.pending_spawns.pop_front() {
            match self.spawn(from, to) {
                Ok(car_id) => info!("Spawned car {} from hub {} to hub {}", car_id, from, to),
                Err(err) => warn!("Spawn request {} -> {} rejected: {}", from, to, err),
            }
        }
    }

    /// Let every hub spawn with probability `rate / 60 * dt` towards a random other hub
    fn spawn_from_hubs(&mut self, delta_secs: f32) {
        let hub_ids: Vec<HubId> = self.hubs.iter().map(|hub| HubId(hub.id)).collect();

        for index in 0..self.hubs.len() {
            let probability = self.hubs[index].rate / 60.0 * delta_secs;
            if !self.random_chance(probability) {
                continue;
            }

            let from = hub_ids[index];
            let destinations: Vec<HubId> =
                hub_ids.iter().copied().filter(|hub| *hub != from).collect();
            let Some(&to) = self.choose_random(&destinations) else {
                continue;
            };

            if let Err(err) = self.spawn(from, to) {
                debug!("Hub {} could not spawn towards hub {}: {}", from, to, err);
            }
        }
    }

    /// Read-only view of cars and lights
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            vehicles: self
                .cars
                .iter()
                .map(|car| VehicleView {
                    id: car.id,
                    position: car.position,
                    speed: car.current_speed,
                    edge_index: car.edge_index,
                    path_len: car.path.len(),
                    reservation: car.reservation,
                })
                .collect(),
            lights: self
                .lights
                .iter()
                .map(|light| LightView {
                    id: light.id,
                    position: light.position,
                    state: light.state(),
                    reserved_by: self.reservations.owner(light.id),
                })
                .collect(),
        }
    }

    /// Get a car by ID
    pub fn car(&self, id: CarId) -> Option<&SimCar> {
        self.cars.iter().find(|car| car.id == id)
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Traffic Simulation Summary ===");
        println!("Time: {:.2}s", self.time);
        println!(
            "Nodes: {}, Edges: {}",
            self.road_network.node_count(),
            self.road_network.edge_count()
        );
        println!("Cars: {}", self.cars.len());
        println!(
            "Spawned: {}, Completed: {}, Rejected: {}",
            self.stats.total_cars_spawned,
            self.stats.total_cars_completed,
            self.stats.rejected_spawns
        );
        println!();

        println!("--- Lights ---");
        for light in &self.lights {
            println!(
                "  Light {}: horizontal={:?}, phase={:.1}/{:.1}, reserved_by={}",
                light.id,
                light.state(),
                light.phase(),
                light.cycle(),
                self.reservations
                    .owner(light.id)
                    .map_or_else(|| "-".to_string(), |car| car.to_string())
            );
        }

        if !self.cars.is_empty() {
            println!("--- Active Cars ---");
            for car in &self.cars {
                println!(
                    "  Car {}: speed={:.1}/{:.1}, position=({:.1}, {:.1}), edge={}/{}",
                    car.id,
                    car.current_speed,
                    car.speed,
                    car.position.x,
                    car.position.y,
                    car.edge_index + 1,
                    car.path.len().saturating_sub(1)
                );
            }
        }
    }

    /// Draw a visual map of the world in the terminal
    ///
    /// One character covers `cell` map units.
    pub fn draw_map(&self, cell: f32) {
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for (_, pos) in self.road_network.nodes() {
            min_x = min_x.min(pos.x);
            max_x = max_x.max(pos.x);
            min_y = min_y.min(pos.y);
            max_y = max_y.max(pos.y);
        }
        for road in &self.roads {
            min_x = min_x.min(road.x);
            max_x = max_x.max(road.x + road.width);
            min_y = min_y.min(road.y);
            max_y = max_y.max(road.y + road.height);
        }
        if !min_x.is_finite() || cell <= 0.0 {
            return;
        }

        let width = ((max_x - min_x) / cell) as usize + 1;
        let height = ((max_y - min_y) / cell) as usize + 1;
        let mut grid = vec![vec![' '; width]; height];

        // Helper to convert map coords to grid coords
        let to_grid = |x: f32, y: f32| -> (usize, usize) {
            let col = ((x - min_x) / cell).max(0.0) as usize;
            let row = ((y - min_y) / cell).max(0.0) as usize;
            (row.min(height - 1), col.min(width - 1))
        };

        for road in &self.roads {
            let fill = match road.category {
                RoadCategory::Big => '=',
                RoadCategory::Small => '-',
            };
            let (top, left) = to_grid(road.x, road.y);
            let (bottom, right) = to_grid(road.x + road.width, road.y + road.height);
            for row in grid.iter_mut().take(bottom + 1).skip(top) {
                for ch in row.iter_mut().take(right + 1).skip(left) {
                    *ch = fill;
                }
            }
        }

        for symbol in &self.symbols {
            let (row, col) = to_grid(symbol.x, symbol.y);
            grid[row][col] = match symbol.kind {
                SymbolKind::Slow => 's',
                SymbolKind::NoEntry => 'x',
            };
        }

        for light in &self.lights {
            let (row, col) = to_grid(light.position.x, light.position.y);
            grid[row][col] = match light.state() {
                LightState::Green => 'G',
                LightState::Red => 'R',
            };
        }

        for hub in &self.hubs {
            let (row, col) = to_grid(hub.x, hub.y);
            grid[row][col] = 'H';
        }

        for car in &self.cars {
            let (row, col) = to_grid(car.position.x, car.position.y);
            grid[row][col] = 'C';
        }

        println!("\n=== World Map ===");
        println!("Legend: H=Hub, C=Car, G/R=Light (horizontal green/red), s=Slow, x=No entry, ==Big road, -=Small road");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
