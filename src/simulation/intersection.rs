//! Intersection reservations
//!
//! A car about to cross a signalised intersection reserves its light. The
//! registry is the only owner of the light-to-car mapping; cars keep just the
//! `LightId` they hold.

use std::collections::HashMap;

use super::types::{CarId, LightId};

/// Which car currently occupies each signalised intersection
#[derive(Debug, Default, Clone)]
pub struct ReservationRegistry {
    occupied_by: HashMap<LightId, CarId>,
}

impl ReservationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the intersection at `light`
    ///
    /// Succeeds if it is free or already held by `car`. Never takes it away
    /// from another car.
    pub fn acquire(&mut self, light: LightId, car: CarId) -> bool {
        match self.occupied_by.get(&light) {
            None => {
                self.occupied_by.insert(light, car);
                true
            }
            Some(current_car) => *current_car == car,
        }
    }

    /// Release the intersection lock, only if `car` holds it
    pub fn release(&mut self, light: LightId, car: CarId) {
        if self.occupied_by.get(&light) == Some(&car) {
            self.occupied_by.remove(&light);
        }
    }

    /// Drop every lock held by `car`
    pub fn release_all(&mut self, car: CarId) {
        self.occupied_by.retain(|_, holder| *holder != car);
    }

    pub fn owner(&self, light: LightId) -> Option<CarId> {
        self.occupied_by.get(&light).copied()
    }

    pub fn is_held_by(&self, light: LightId, car: CarId) -> bool {
        self.owner(light) == Some(car)
    }

    /// Held, and not by `car`
    pub fn is_reserved_by_other(&self, light: LightId, car: CarId) -> bool {
        self.owner(light).is_some_and(|holder| holder != car)
    }

    pub fn len(&self) -> usize {
        self.occupied_by.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_by.is_empty()
    }
}
