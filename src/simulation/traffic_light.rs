//! Fixed-cycle traffic lights
//!
//! Each light alternates between a horizontal phase (the first `green`
//! seconds of its cycle) and a vertical phase (the remaining `red` seconds).
//! The two flows are never green at the same time.

use super::map::LightSpec;
use super::types::{LightId, Position};

/// Signal shown to the horizontal flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Green,
    Red,
}

/// A traffic light in the simulation
#[derive(Debug, Clone)]
pub struct SimTrafficLight {
    pub id: LightId,
    pub position: Position,
    /// Horizontal green time, in seconds
    pub green: f32,
    /// Horizontal red time, which is the vertical green time
    pub red: f32,
    /// Seconds since the start of the cycle, never wrapped
    pub elapsed: f32,
}

impl SimTrafficLight {
    pub fn new(id: LightId, position: Position, green: f32, red: f32, offset: f32) -> Self {
        Self {
            id,
            position,
            green,
            red,
            elapsed: offset,
        }
    }

    pub fn from_spec(spec: &LightSpec) -> Self {
        Self::new(
            LightId(spec.id),
            Position::new(spec.x, spec.y),
            spec.green,
            spec.red,
            spec.offset,
        )
    }

    /// Update the light timer
    pub fn update(&mut self, delta_secs: f32) {
        self.elapsed += delta_secs;
    }

    pub fn cycle(&self) -> f32 {
        self.green + self.red
    }

    /// Position within the current cycle
    pub fn phase(&self) -> f32 {
        self.elapsed.rem_euclid(self.cycle())
    }

    /// Whether traffic moving along `direction` may pass
    pub fn is_green_for(&self, direction: &Position) -> bool {
        let in_horizontal_phase = self.phase() < self.green;
        if direction.is_horizontal() {
            in_horizontal_phase
        } else {
            !in_horizontal_phase
        }
    }

    pub fn state(&self) -> LightState {
        if self.phase() < self.green {
            LightState::Green
        } else {
            LightState::Red
        }
    }
}
