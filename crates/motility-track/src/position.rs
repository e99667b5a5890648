//! Observed positions

use crate::geometry::Vector3;
use serde::Serialize;

/// A single observed location of an agent at time `t` (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// Spatial coordinates as a vector
    pub fn location(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Vector from this position to `other`
    pub fn displacement_to(&self, other: &Position) -> Vector3 {
        other.location() - self.location()
    }

    pub fn squared_distance_to(&self, other: &Position) -> f64 {
        self.displacement_to(other).norm_squared()
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        self.displacement_to(other).norm()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.t.is_finite()
    }

    /// Same spatial coordinates, ignoring time
    pub fn same_location(&self, other: &Position) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl From<(f64, f64, f64, f64)> for Position {
    fn from((x, y, z, t): (f64, f64, f64, f64)) -> Self {
        Self::new(x, y, z, t)
    }
}
