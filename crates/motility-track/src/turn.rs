//! Turning-angle conventions

use crate::geometry::Vector3;
use serde::Serialize;

/// How the angle between consecutive displacements is reported
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum TurnConvention {
    /// Magnitude of the turn in [0, π]
    #[default]
    Unsigned,
    /// Turn in [-π, π]; negative when `(a×b)·reference < 0`
    ///
    /// Turning in 3D has no intrinsic handedness, so a reference axis (for
    /// example the imaging z axis) fixes the sign.
    Signed { reference: Vector3 },
}

impl TurnConvention {
    /// Angle from displacement `a` to displacement `b`, `None` if either is
    /// degenerate
    pub fn angle(&self, a: &Vector3, b: &Vector3) -> Option<f64> {
        let angle = a.angle_to(b)?;
        match self {
            Self::Unsigned => Some(angle),
            Self::Signed { reference } => {
                if a.cross(b).dot(reference) < 0.0 {
                    Some(-angle)
                } else {
                    Some(angle)
                }
            }
        }
    }

    /// Closed interval the reported angles lie in
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Unsigned => (0.0, std::f64::consts::PI),
            Self::Signed { .. } => (-std::f64::consts::PI, std::f64::consts::PI),
        }
    }
}
