//! 3D vector helpers

use serde::Serialize;
use std::ops::{Add, Sub};

/// A displacement or direction in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Component along one axis
    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Unsigned angle between two vectors in [0, π]
    ///
    /// `atan2(|a×b|, a·b)` stays accurate for nearly parallel vectors, where
    /// `acos` of the normalized dot product loses precision. Returns `None`
    /// when either vector has zero length.
    pub fn angle_to(&self, other: &Vector3) -> Option<f64> {
        if self.norm_squared() == 0.0 || other.norm_squared() == 0.0 {
            return None;
        }
        Some(self.cross(other).norm().atan2(self.dot(other)))
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Spatial axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_cross_and_dot() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(x.dot(&y), 0.0);
        assert_eq!((x + y).norm_squared(), 2.0);
        assert_eq!((x - y).component(Axis::Y), -1.0);
    }

    #[test]
    fn test_angle_to() {
        let x = Vector3::new(2.0, 0.0, 0.0);
        assert_abs_diff_eq!(x.angle_to(&Vector3::new(0.0, 3.0, 0.0)).unwrap(), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(x.angle_to(&Vector3::new(-1.0, 0.0, 0.0)).unwrap(), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(x.angle_to(&Vector3::new(5.0, 0.0, 0.0)).unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(x.angle_to(&Vector3::default()), None);
    }
}
