//! Agent trajectories and their kinematic descriptors
//!
//! A [`Track`] is an immutable, time-ordered sequence of [`Position`]s for one
//! agent. Derived series (speeds, turning angles, the MSD curve, ...) are
//! computed on first access and cached inside the track instance, so repeated
//! calls return the identical values without recomputation.

use crate::geometry::{Axis, Vector3};
use crate::position::Position;
use crate::turn::TurnConvention;
use motility_core::utils::{iqr, median};
use motility_core::{AgentId, Error, Result};
use serde::Serialize;
use std::sync::OnceLock;

/// Time differences are matched at nanosecond resolution when grouping
/// position pairs by lag.
pub const LAG_RESOLUTION: f64 = 1e9;

/// Integer key identifying a time lag at [`LAG_RESOLUTION`]
pub fn lag_key(lag: f64) -> i64 {
    (lag * LAG_RESOLUTION).round() as i64
}

/// Mean squared displacement at one time lag
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MsdPoint {
    /// Time lag in seconds
    pub lag: f64,
    /// Mean of squared distances over all pairs at this lag
    pub msd: f64,
    /// Number of position pairs contributing
    pub pairs: usize,
}

/// Normalized displacement autocorrelation at a lag of `lag_steps` steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AutocorrelationPoint {
    pub lag_steps: usize,
    pub correlation: f64,
}

#[derive(Debug, Clone, Default)]
struct TrackCache {
    steps: OnceLock<Vec<Vector3>>,
    speeds: OnceLock<Vec<f64>>,
    turning_angles: OnceLock<Vec<Option<f64>>>,
    path_length: OnceLock<f64>,
    net_displacement: OnceLock<f64>,
    msd_curve: OnceLock<Vec<MsdPoint>>,
    autocorrelation: OnceLock<Vec<AutocorrelationPoint>>,
}

/// The recorded path of one agent
///
/// # Examples
///
/// ```rust
/// use motility_track::Track;
///
/// let track = Track::from_tuples(
///     "A",
///     &[(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 0.0, 1.0), (1.0, 1.0, 0.0, 2.0)],
/// )
/// .unwrap();
///
/// assert_eq!(track.speeds(), &[1.0, 1.0]);
/// assert_eq!(track.path_length(), 2.0);
/// assert!((track.net_displacement() - 2f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Track {
    agent: AgentId,
    positions: Vec<Position>,
    turn_convention: TurnConvention,
    cache: TrackCache,
}

impl Track {
    /// Build a track from time-ordered positions
    ///
    /// Fails with [`Error::InvalidTrack`] if fewer than two positions are
    /// supplied, if any coordinate or time is non-finite, or if timestamps are
    /// not strictly increasing.
    pub fn new(agent: impl Into<AgentId>, positions: Vec<Position>) -> Result<Self> {
        let agent = agent.into();
        if positions.len() < 2 {
            return Err(Error::invalid_track(
                &agent,
                format!(
                    "at least 2 positions are required, got {}",
                    positions.len()
                ),
            ));
        }
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(Error::invalid_track(
                &agent,
                format!("position {i} contains NaN or infinite values"),
            ));
        }
        if let Some(i) = positions.windows(2).position(|w| w[1].t <= w[0].t) {
            return Err(Error::invalid_track(
                &agent,
                format!(
                    "timestamps must be strictly increasing, but t[{}] = {} follows t[{}] = {}",
                    i + 1,
                    positions[i + 1].t,
                    i,
                    positions[i].t
                ),
            ));
        }

        Ok(Self {
            agent,
            positions,
            turn_convention: TurnConvention::default(),
            cache: TrackCache::default(),
        })
    }

    /// Build a track from `(x, y, z, t)` tuples
    pub fn from_tuples(agent: impl Into<AgentId>, points: &[(f64, f64, f64, f64)]) -> Result<Self> {
        Self::new(agent, points.iter().copied().map(Position::from).collect())
    }

    /// Report turning angles with a different convention
    ///
    /// Only the turning-angle cache is discarded; other derived values stay.
    pub fn with_turn_convention(mut self, convention: TurnConvention) -> Self {
        if convention != self.turn_convention {
            self.turn_convention = convention;
            self.cache.turning_angles = OnceLock::new();
        }
        self
    }

    pub fn agent(&self) -> &AgentId {
        &self.agent
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn turn_convention(&self) -> TurnConvention {
        self.turn_convention
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; a track holds at least two positions
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn first(&self) -> &Position {
        &self.positions[0]
    }

    pub fn last(&self) -> &Position {
        &self.positions[self.positions.len() - 1]
    }

    pub fn start_time(&self) -> f64 {
        self.first().t
    }

    pub fn end_time(&self) -> f64 {
        self.last().t
    }

    /// Time between first and last observation
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Displacement vectors between consecutive positions
    pub fn steps(&self) -> &[Vector3] {
        self.cache.steps.get_or_init(|| {
            self.positions
                .windows(2)
                .map(|w| w[0].displacement_to(&w[1]))
                .collect()
        })
    }

    /// Per-step speeds: displacement magnitude over elapsed time
    ///
    /// Length is `len() - 1`; every value is non-negative.
    pub fn speeds(&self) -> &[f64] {
        self.cache.speeds.get_or_init(|| {
            self.steps()
                .iter()
                .zip(self.positions.windows(2))
                .map(|(step, w)| step.norm() / (w[1].t - w[0].t))
                .collect()
        })
    }

    /// Angles between consecutive displacement vectors
    ///
    /// Length is `len() - 2`. An entry is `None` where either adjacent step
    /// has zero length and the turn is undefined.
    pub fn turning_angles(&self) -> &[Option<f64>] {
        self.cache.turning_angles.get_or_init(|| {
            self.steps()
                .windows(2)
                .map(|w| self.turn_convention.angle(&w[0], &w[1]))
                .collect()
        })
    }

    /// Turning angles that are defined
    pub fn defined_turning_angles(&self) -> Vec<f64> {
        self.turning_angles().iter().flatten().copied().collect()
    }

    /// Sum of step lengths
    pub fn path_length(&self) -> f64 {
        *self
            .cache
            .path_length
            .get_or_init(|| self.steps().iter().map(Vector3::norm).sum())
    }

    /// Straight-line distance between first and last position
    pub fn net_displacement(&self) -> f64 {
        *self
            .cache
            .net_displacement
            .get_or_init(|| self.first().distance_to(self.last()))
    }

    /// Net displacement over path length; `None` for a track that never moves
    pub fn meandering_index(&self) -> Option<f64> {
        let path = self.path_length();
        (path > 0.0).then(|| self.net_displacement() / path)
    }

    pub fn median_speed(&self) -> f64 {
        // speeds() is never empty
        median(self.speeds()).unwrap_or(0.0)
    }

    pub fn speed_iqr(&self) -> f64 {
        iqr(self.speeds()).unwrap_or(0.0)
    }

    /// Median of the defined turning angles
    pub fn median_turn(&self) -> Option<f64> {
        median(&self.defined_turning_angles())
    }

    pub fn turn_iqr(&self) -> Option<f64> {
        iqr(&self.defined_turning_angles())
    }

    /// Fraction of steps whose speed falls below `threshold`
    pub fn arrest_coefficient(&self, threshold: f64) -> f64 {
        let speeds = self.speeds();
        let arrested = speeds.iter().filter(|&&s| s < threshold).count();
        arrested as f64 / speeds.len() as f64
    }

    /// Mean squared displacement for every reachable time lag, ascending
    pub fn msd_curve(&self) -> &[MsdPoint] {
        self.cache.msd_curve.get_or_init(|| {
            let mut sums: std::collections::BTreeMap<i64, (f64, usize)> = Default::default();
            for (i, a) in self.positions.iter().enumerate() {
                for b in &self.positions[i + 1..] {
                    let entry = sums.entry(lag_key(b.t - a.t)).or_insert((0.0, 0));
                    entry.0 += a.squared_distance_to(b);
                    entry.1 += 1;
                }
            }
            sums.into_iter()
                .map(|(key, (sum, pairs))| MsdPoint {
                    lag: key as f64 / LAG_RESOLUTION,
                    msd: sum / pairs as f64,
                    pairs,
                })
                .collect()
        })
    }

    /// Mean squared displacement over all position pairs `lag` seconds apart
    ///
    /// Fails with [`Error::InsufficientData`] when no pair is separated by
    /// exactly that lag.
    pub fn mean_squared_displacement(&self, lag: f64) -> Result<f64> {
        Ok(self.msd_point(lag)?.msd)
    }

    /// The cached MSD entry at `lag`
    pub fn msd_point(&self, lag: f64) -> Result<MsdPoint> {
        validate_lag(lag)?;
        let key = lag_key(lag);
        let curve = self.msd_curve();
        let idx = curve.partition_point(|p| lag_key(p.lag) < key);
        curve
            .get(idx)
            .filter(|p| lag_key(p.lag) == key)
            .copied()
            .ok_or_else(|| self.no_pairs_at(lag))
    }

    /// Distances covered over every pair of positions `lag` seconds apart
    pub fn lag_displacements(&self, lag: f64) -> Result<Vec<f64>> {
        self.pairs_at(lag, |d| d.norm())
    }

    /// Squared distances over every pair of positions `lag` seconds apart
    pub fn lag_squared_displacements(&self, lag: f64) -> Result<Vec<f64>> {
        self.pairs_at(lag, Vector3::norm_squared)
    }

    /// Signed displacements along one axis over every pair `lag` seconds apart
    pub fn lag_axis_displacements(&self, lag: f64, axis: Axis) -> Result<Vec<f64>> {
        self.pairs_at(lag, |d| d.component(axis))
    }

    fn pairs_at(&self, lag: f64, f: impl Fn(&Vector3) -> f64) -> Result<Vec<f64>> {
        validate_lag(lag)?;
        let key = lag_key(lag);
        let values: Vec<f64> = self
            .positions
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                self.positions[i + 1..]
                    .iter()
                    .filter(move |b| lag_key(b.t - a.t) == key)
                    .map(move |b| a.displacement_to(b))
            })
            .map(|d| f(&d))
            .collect();
        if values.is_empty() {
            return Err(self.no_pairs_at(lag));
        }
        Ok(values)
    }

    fn no_pairs_at(&self, lag: f64) -> Error {
        Error::insufficient_for_agent(
            &self.agent,
            "mean squared displacement",
            format!("no position pairs are separated by a lag of {lag}s"),
        )
    }

    /// Autocorrelation of step displacements `k` steps apart
    ///
    /// For each `k`, the mean of `d[i]·d[i+k]` over all valid `i`, normalized by
    /// the `k = 0` mean (Banigan et al. 2015). Empty if the agent never moves.
    pub fn displacement_autocorrelation(&self) -> &[AutocorrelationPoint] {
        self.cache.autocorrelation.get_or_init(|| {
            let steps = self.steps();
            let mean_dot = |k: usize| -> f64 {
                let n = steps.len() - k;
                steps[..n]
                    .iter()
                    .zip(&steps[k..])
                    .map(|(a, b)| a.dot(b))
                    .sum::<f64>()
                    / n as f64
            };
            let base = mean_dot(0);
            if base <= 0.0 {
                return Vec::new();
            }
            (0..steps.len())
                .map(|k| AutocorrelationPoint {
                    lag_steps: k,
                    correlation: mean_dot(k) / base,
                })
                .collect()
        })
    }

    /// A new track restricted to positions with `start <= t <= end`
    pub fn window(&self, start: f64, end: f64) -> Result<Track> {
        let positions = self
            .positions
            .iter()
            .filter(|p| p.t >= start && p.t <= end)
            .copied()
            .collect();
        Ok(Track::new(self.agent.clone(), positions)?.with_turn_convention(self.turn_convention))
    }

    /// A new track keeping every `every`-th position, starting with the first
    pub fn subsample(&self, every: usize) -> Result<Track> {
        if every == 0 {
            return Err(Error::InvalidParameter(
                "subsampling interval must be positive".to_string(),
            ));
        }
        let positions = self.positions.iter().step_by(every).copied().collect();
        Ok(Track::new(self.agent.clone(), positions)?.with_turn_convention(self.turn_convention))
    }
}

fn validate_lag(lag: f64) -> Result<()> {
    if !(lag.is_finite() && lag > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "lag must be positive and finite, got {lag}"
        )));
    }
    Ok(())
}
