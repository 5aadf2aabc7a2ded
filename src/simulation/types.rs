//! Core types for the traffic simulation
//!
//! Identifiers, the graph node key and 2D geometry shared by every component.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A wrapper type for road IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadId(pub u32);

/// A wrapper type for hub IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HubId(pub u32);

/// A wrapper type for traffic light IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(pub u32);

/// A wrapper type for car IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CarId(pub usize);

macro_rules! display_id {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

display_id!(RoadId, HubId, LightId, CarId);

/// Category of a road rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadCategory {
    /// Dual-direction road, cars keep to a lane offset
    Big,
    /// Single lane, no offset
    #[default]
    Small,
}

/// Orientation of a road, derived from its rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Ties count as horizontal.
    pub fn of(width: f32, height: f32) -> Self {
        if width >= height {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// Named point along a road's centerline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    Left,
    Top,
    Middle,
    Right,
    Bottom,
}

impl Anchor {
    /// Extremity, middle, extremity in creation order
    pub fn chain(orientation: Orientation) -> [Anchor; 3] {
        match orientation {
            Orientation::Horizontal => [Anchor::Left, Anchor::Middle, Anchor::Right],
            Orientation::Vertical => [Anchor::Top, Anchor::Middle, Anchor::Bottom],
        }
    }

    fn letter(self) -> char {
        match self {
            Anchor::Left => 'L',
            Anchor::Top => 'T',
            Anchor::Middle => 'M',
            Anchor::Right => 'R',
            Anchor::Bottom => 'B',
        }
    }
}

/// Key of a node derived from road geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoadNodeKey {
    /// One of the three centerline points of a single road
    Anchor { road: RoadId, anchor: Anchor },
    /// Centre of the overlap between two roads, `first` precedes `second` in the document
    Crossing { first: RoadId, second: RoadId },
}

/// Identifier of a graph node
///
/// Road-derived and hub nodes live in one map, each family keeping its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    Road(RoadNodeKey),
    Hub(HubId),
}

impl NodeId {
    pub fn anchor(road: RoadId, anchor: Anchor) -> Self {
        NodeId::Road(RoadNodeKey::Anchor { road, anchor })
    }

    pub fn crossing(first: RoadId, second: RoadId) -> Self {
        NodeId::Road(RoadNodeKey::Crossing { first, second })
    }

    pub fn hub(id: u32) -> Self {
        NodeId::Hub(HubId(id))
    }

    pub fn is_hub(&self) -> bool {
        matches!(self, NodeId::Hub(_))
    }

    /// The road this node is an anchor of, if any
    pub fn anchor_road(&self) -> Option<RoadId> {
        match self {
            NodeId::Road(RoadNodeKey::Anchor { road, .. }) => Some(*road),
            _ => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Road(RoadNodeKey::Anchor { road, anchor }) => {
                write!(f, "r{}_{}", road.0, anchor.letter())
            }
            NodeId::Road(RoadNodeKey::Crossing { first, second }) => {
                write!(f, "i{}_{}", first.0, second.0)
            }
            NodeId::Hub(hub) => write!(f, "hub{}", hub.0),
        }
    }
}

/// A 2D position in map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        (*other - *self).length()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Position) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn scale(&self, factor: f32) -> Position {
        Position::new(self.x * factor, self.y * factor)
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalized(&self) -> Position {
        let len = self.length();
        if len > 0.0 {
            self.scale(1.0 / len)
        } else {
            Position::ZERO
        }
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Rotated 90 degrees: (-y, x)
    pub fn perpendicular(&self) -> Position {
        Position::new(-self.y, self.x)
    }

    /// Horizontal when the x component strictly dominates
    pub fn is_horizontal(&self) -> bool {
        self.x.abs() > self.y.abs()
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Overlap with another rectangle, only when its area is positive
    pub fn overlap(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);
        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}
