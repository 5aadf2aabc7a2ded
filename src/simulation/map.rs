//! Map document produced by the map editor
//!
//! A JSON object with four ordered collections: `roads`, `hubs`, `lights` and
//! `symbols`. The document is validated as a whole before any of it is used.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{MapError, MapResult};
use super::types::{Orientation, Position, Rect, RoadCategory};

fn default_rate() -> f32 {
    1.0
}

fn default_phase() -> f32 {
    6.0
}

/// A road rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSpec {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    #[serde(alias = "w")]
    pub width: f32,
    #[serde(alias = "h")]
    pub height: f32,
    #[serde(rename = "type", default)]
    pub category: RoadCategory,
}

impl RoadSpec {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.width, self.height)
    }
}

/// A named spawn point and destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubSpec {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub name: String,
    /// Cars per minute
    #[serde(default = "default_rate")]
    pub rate: f32,
}

impl HubSpec {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A traffic light with its timing, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSpec {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_phase")]
    pub green: f32,
    #[serde(default = "default_phase")]
    pub red: f32,
    #[serde(default)]
    pub offset: f32,
}

/// Kind of a hazard symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Caps speed nearby
    Slow,
    /// Cars heading into it do not move
    NoEntry,
}

/// A static hazard symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
}

impl SymbolSpec {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// The whole map as written by the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub roads: Vec<RoadSpec>,
    #[serde(default)]
    pub hubs: Vec<HubSpec>,
    #[serde(default)]
    pub lights: Vec<LightSpec>,
    #[serde(default)]
    pub symbols: Vec<SymbolSpec>,
}

impl MapDocument {
    /// Parse and validate a document from JSON text
    pub fn from_json(text: &str) -> MapResult<Self> {
        let document: MapDocument = serde_json::from_str(text)?;
        document.validate()?;
        Ok(document)
    }

    /// Read, parse and validate a document from disk
    pub fn from_path(path: impl AsRef<Path>) -> MapResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check everything the graph builder and the simulation rely on
    pub fn validate(&self) -> MapResult<()> {
        let mut road_ids = HashSet::new();
        for road in &self.roads {
            check_id("road", road.id, &mut road_ids)?;
            check_finite("road", road.id, &[("x", road.x), ("y", road.y)])?;
            check_finite(
                "road",
                road.id,
                &[("width", road.width), ("height", road.height)],
            )?;
            if road.width <= 0.0 || road.height <= 0.0 {
                return Err(MapError::DegenerateRoad {
                    id: road.id,
                    width: road.width,
                    height: road.height,
                });
            }
        }

        let mut hub_ids = HashSet::new();
        for hub in &self.hubs {
            check_id("hub", hub.id, &mut hub_ids)?;
            check_finite("hub", hub.id, &[("x", hub.x), ("y", hub.y), ("rate", hub.rate)])?;
            check_at_least("hub", hub.id, "rate", hub.rate, 0.0)?;
        }

        let mut light_ids = HashSet::new();
        for light in &self.lights {
            check_id("light", light.id, &mut light_ids)?;
            check_finite(
                "light",
                light.id,
                &[
                    ("x", light.x),
                    ("y", light.y),
                    ("green", light.green),
                    ("red", light.red),
                    ("offset", light.offset),
                ],
            )?;
            check_positive("light", light.id, "green", light.green)?;
            check_positive("light", light.id, "red", light.red)?;
            check_at_least("light", light.id, "offset", light.offset, 0.0)?;
        }

        let mut symbol_ids = HashSet::new();
        for symbol in &self.symbols {
            check_id("symbol", symbol.id, &mut symbol_ids)?;
            check_finite("symbol", symbol.id, &[("x", symbol.x), ("y", symbol.y)])?;
        }

        Ok(())
    }
}

fn check_id(kind: &'static str, id: u32, seen: &mut HashSet<u32>) -> MapResult<()> {
    if id == 0 {
        return Err(MapError::InvalidValue {
            kind,
            id,
            field: "id",
            value: 0.0,
        });
    }
    if !seen.insert(id) {
        return Err(MapError::DuplicateId { kind, id });
    }
    Ok(())
}

fn check_finite(kind: &'static str, id: u32, fields: &[(&'static str, f32)]) -> MapResult<()> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some(&(field, value)) => Err(MapError::InvalidValue {
            kind,
            id,
            field,
            value,
        }),
        None => Ok(()),
    }
}

fn check_positive(kind: &'static str, id: u32, field: &'static str, value: f32) -> MapResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(MapError::InvalidValue {
            kind,
            id,
            field,
            value,
        })
    }
}

fn check_at_least(
    kind: &'static str,
    id: u32,
    field: &'static str,
    value: f32,
    min: f32,
) -> MapResult<()> {
    if value >= min {
        Ok(())
    } else {
        Err(MapError::InvalidValue {
            kind,
            id,
            field,
            value,
        })
    }
}
