//! Points in 3D space and the distance calculations between them

use serde::{Deserialize, Serialize};

/// A point in 3D space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(alias = "X")]
    pub x: f64,
    #[serde(alias = "Y")]
    pub y: f64,
    #[serde(alias = "Z")]
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Measures the distance between two positions.
///
/// Implementations must be symmetric and return zero for identical points.
pub trait Positioner: Send + Sync {
    fn linear_distance(&self, from: &Position, to: &Position) -> f64;
}

/// Straight-line (Euclidean) distance
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanPositioner;

impl EuclideanPositioner {
    pub fn new() -> Self {
        Self
    }
}

impl Positioner for EuclideanPositioner {
    fn linear_distance(&self, from: &Position, to: &Position) -> f64 {
        let dx = from.x - to.x;
        let dy = from.y - to.y;
        let dz = from.z - to.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
