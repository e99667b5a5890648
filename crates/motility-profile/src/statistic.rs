//! Named per-track statistics and how they are pooled

use motility_core::utils::{mean, median};
use motility_core::{Error, Result};
use motility_track::Track;
use serde::Serialize;
use std::fmt;

/// A per-track derived quantity that can be aggregated over a population
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Statistic {
    /// Per-step speed
    Speed,
    /// Per-step turning angle
    TurningAngle,
    /// Squared displacement over position pairs `lag` seconds apart
    MeanSquaredDisplacement { lag: f64 },
    /// Total distance travelled
    PathLength,
    /// Distance between first and last position
    NetDisplacement,
    /// Time between first and last observation
    Duration,
    /// Net displacement over path length
    MeanderingIndex,
}

impl Statistic {
    /// Short machine-friendly name
    pub fn name(&self) -> String {
        match self {
            Self::Speed => "speed".to_string(),
            Self::TurningAngle => "turning_angle".to_string(),
            Self::MeanSquaredDisplacement { lag } => format!("msd@{lag}s"),
            Self::PathLength => "path_length".to_string(),
            Self::NetDisplacement => "net_displacement".to_string(),
            Self::Duration => "duration".to_string(),
            Self::MeanderingIndex => "meandering_index".to_string(),
        }
    }

    /// Whether a track yields many samples (one per step or position pair)
    /// rather than a single value
    pub fn is_per_step(&self) -> bool {
        matches!(
            self,
            Self::Speed | Self::TurningAngle | Self::MeanSquaredDisplacement { .. }
        )
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Self::MeanSquaredDisplacement { lag } = self {
            if !(lag.is_finite() && *lag > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "MSD lag must be positive and finite, got {lag}"
                )));
            }
        }
        Ok(())
    }

    /// The samples one track contributes under `policy`
    pub fn contribution(&self, track: &Track, policy: AggregationPolicy) -> Contribution {
        let (values, missing) = match self {
            Self::Speed => (track.speeds().to_vec(), 0),
            Self::TurningAngle => {
                let angles = track.turning_angles();
                let defined = track.defined_turning_angles();
                let missing = angles.len() - defined.len();
                (defined, missing)
            }
            Self::MeanSquaredDisplacement { lag } => match policy {
                // per-track MSD is the mean of that track's squared displacements
                AggregationPolicy::PerTrack(Reducer::Mean) => (
                    track
                        .mean_squared_displacement(*lag)
                        .map(|msd| vec![msd])
                        .unwrap_or_default(),
                    0,
                ),
                _ => (
                    track.lag_squared_displacements(*lag).unwrap_or_default(),
                    0,
                ),
            },
            Self::PathLength => (vec![track.path_length()], 0),
            Self::NetDisplacement => (vec![track.net_displacement()], 0),
            Self::Duration => (vec![track.duration()], 0),
            Self::MeanderingIndex => (track.meandering_index().into_iter().collect(), 0),
        };

        let values = match policy {
            AggregationPolicy::PerTrack(reducer) if self.is_per_step() && values.len() > 1 => {
                vec![reducer.reduce(&values)]
            }
            _ => values,
        };
        Contribution { values, missing }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Reduction applied to one track's per-step samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reducer {
    Median,
    Mean,
}

impl Reducer {
    /// Reduce a non-empty slice
    pub fn reduce(&self, values: &[f64]) -> f64 {
        match self {
            Self::Median => median(values).unwrap_or(f64::NAN),
            Self::Mean => mean(values),
        }
    }
}

/// How per-track samples become one population sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AggregationPolicy {
    /// Pool every per-step sample from every track
    #[default]
    Pooled,
    /// Reduce each track to one value, then pool those values
    PerTrack(Reducer),
}

/// Samples contributed by one track; empty `values` means the track is
/// excluded from the aggregate
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contribution {
    pub values: Vec<f64>,
    /// Per-step values that were undefined (e.g. turns around a pause)
    pub missing: usize,
}

/// Closed time interval `[start, end]` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !(start.is_finite() && end.is_finite() && start <= end) {
            return Err(Error::InvalidParameter(format!(
                "time window [{start}, {end}] must be finite with start <= end"
            )));
        }
        Ok(Self { start, end })
    }
}
