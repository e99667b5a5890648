//! Population mean squared displacement and lag-pooled samples
//!
//! These functions pool over every track of every supplied profile, which is
//! how replicate experiments of one condition are usually combined. Squared
//! displacements are pooled across all start times ("all-T"), so each lag is
//! backed by every position pair separated by it, not just pairs anchored at
//! the first observation.

use crate::profile::Profile;
use motility_core::{Error, Result};
use motility_track::{lag_key, Axis, MsdPoint, LAG_RESOLUTION};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Largest lag included in an MSD fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MsdCutoff {
    /// Fit every lag and report this fraction of the largest lag as the
    /// cutoff, without applying it
    Reported(f64),
    /// Fraction of the largest observed lag
    Fraction(f64),
    /// Absolute lag in seconds
    Seconds(f64),
    /// Use every lag
    None,
}

impl Default for MsdCutoff {
    /// Every lag is fitted; a quarter of the largest lag is reported
    fn default() -> Self {
        Self::Reported(0.25)
    }
}

impl MsdCutoff {
    /// `(reported cutoff, largest lag fitted)` in seconds
    fn resolve(&self, largest_lag: f64) -> Result<(f64, f64)> {
        match *self {
            Self::Reported(f) | Self::Fraction(f) if !(f > 0.0 && f <= 1.0) => {
                Err(Error::InvalidParameter(format!(
                    "MSD cutoff fraction must be in (0, 1], got {f}"
                )))
            }
            Self::Reported(f) => Ok((f * largest_lag, largest_lag)),
            Self::Fraction(f) => Ok((f * largest_lag, f * largest_lag)),
            Self::Seconds(s) if s.is_finite() && s > 0.0 => Ok((s, s)),
            Self::Seconds(s) => Err(Error::InvalidParameter(format!(
                "MSD cutoff must be positive and finite, got {s}"
            ))),
            Self::None => Ok((largest_lag, largest_lag)),
        }
    }
}

/// Least-squares line through `(ln lag, ln msd)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MsdFit {
    /// Pooled curve up to and including `fitted_up_to`
    pub points: Vec<MsdPoint>,
    /// Cutoff in seconds; only reported, not applied, for [`MsdCutoff::Reported`]
    pub cutoff: f64,
    /// Largest lag eligible for the fit, in seconds
    pub fitted_up_to: f64,
    /// Anomalous diffusion exponent; 1 for a random walk, 2 for ballistic motion
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation of the log-log points
    pub r: f64,
    /// Two-sided p-value for a zero slope
    pub p_value: f64,
    /// Standard error of the slope
    pub stderr: f64,
}

impl MsdFit {
    /// MSD predicted by the fitted power law
    pub fn predict(&self, lag: f64) -> f64 {
        (self.intercept + self.slope * lag.ln()).exp()
    }
}

/// MSD slope obtained with a given cutoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlopeAtCutoff {
    pub cutoff: f64,
    pub slope: f64,
}

/// Samples pooled at one time lag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagSample {
    pub lag: f64,
    pub values: Vec<f64>,
}

/// Per-track autocorrelations pooled at one step lag, one value per track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutocorrelationSample {
    pub lag_steps: usize,
    pub values: Vec<f64>,
}

fn require_profiles(profiles: &[&Profile]) -> Result<()> {
    if profiles.is_empty() {
        return Err(Error::InvalidParameter(
            "at least one profile is required".to_string(),
        ));
    }
    Ok(())
}

/// MSD at every lag, pooling squared displacements across all tracks
pub fn population_msd_curve(profiles: &[&Profile]) -> Vec<MsdPoint> {
    let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for track in profiles.iter().flat_map(|p| p.tracks()) {
        for point in track.msd_curve() {
            let entry = sums.entry(lag_key(point.lag)).or_insert((0.0, 0));
            entry.0 += point.msd * point.pairs as f64;
            entry.1 += point.pairs;
        }
    }
    sums.into_iter()
        .map(|(key, (sum, pairs))| MsdPoint {
            lag: key as f64 / LAG_RESOLUTION,
            msd: sum / pairs as f64,
            pairs,
        })
        .collect()
}

/// Fit the population MSD curve on log-log axes
///
/// Fails with [`Error::InsufficientData`] when fewer than two lags with a
/// positive MSD fall under the cutoff.
#[instrument(skip(profiles), fields(n_profiles = profiles.len()))]
pub fn msd(profiles: &[&Profile], cutoff: MsdCutoff) -> Result<MsdFit> {
    require_profiles(profiles)?;
    fit_curve(population_msd_curve(profiles), cutoff)
}

fn fit_curve(curve: Vec<MsdPoint>, cutoff: MsdCutoff) -> Result<MsdFit> {
    let largest = curve
        .last()
        .map(|p| p.lag)
        .ok_or_else(|| Error::insufficient("MSD", "no position pairs in any track"))?;
    let (cutoff, fitted_up_to) = cutoff.resolve(largest)?;
    let limit = lag_key(fitted_up_to);
    let points: Vec<MsdPoint> = curve
        .into_iter()
        .filter(|p| lag_key(p.lag) <= limit)
        .collect();

    let (xs, ys): (Vec<f64>, Vec<f64>) = points
        .iter()
        .filter(|p| p.msd > 0.0)
        .map(|p| (p.lag.ln(), p.msd.ln()))
        .unzip();
    debug!(
        "Fitting {} of {} lags up to {fitted_up_to}s (cutoff {cutoff}s)",
        xs.len(),
        points.len()
    );
    let fit = linear_regression(&xs, &ys)?;

    Ok(MsdFit {
        points,
        cutoff,
        fitted_up_to,
        slope: fit.slope,
        intercept: fit.intercept,
        r: fit.r,
        p_value: fit.p_value,
        stderr: fit.stderr,
    })
}

/// How the MSD slope changes as the cutoff grows
///
/// Evaluates the fit at every observed lag up to `upper` as the cutoff,
/// skipping the first lag (a single point cannot be fitted). Cutoffs whose
/// fit has too few positive points are left out.
pub fn msd_slope_by_cutoff(profiles: &[&Profile], upper: Option<f64>) -> Result<Vec<SlopeAtCutoff>> {
    require_profiles(profiles)?;
    let curve = population_msd_curve(profiles);
    let upper = upper.map_or(i64::MAX, lag_key);

    let mut slopes = Vec::new();
    for point in curve.iter().skip(1).filter(|p| lag_key(p.lag) <= upper) {
        match fit_curve(curve.clone(), MsdCutoff::Seconds(point.lag)) {
            Ok(fit) => slopes.push(SlopeAtCutoff {
                cutoff: point.lag,
                slope: fit.slope,
            }),
            Err(Error::InsufficientData { reason, .. }) => {
                debug!("No slope at cutoff {}s: {reason}", point.lag);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(slopes)
}

/// Displacements pooled per lag across all tracks
///
/// With `axis` set, the signed displacement along that axis; otherwise the
/// Euclidean distance.
pub fn pooled_lag_displacements(profiles: &[&Profile], axis: Option<Axis>) -> Vec<LagSample> {
    let mut pooled: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for track in profiles.iter().flat_map(|p| p.tracks()) {
        let positions = track.positions();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                let d = a.displacement_to(b);
                let value = match axis {
                    Some(axis) => d.component(axis),
                    None => d.norm(),
                };
                pooled.entry(lag_key(b.t - a.t)).or_default().push(value);
            }
        }
    }
    pooled
        .into_iter()
        .map(|(key, values)| LagSample {
            lag: key as f64 / LAG_RESOLUTION,
            values,
        })
        .collect()
}

/// Each track's displacement autocorrelation, pooled per step lag
pub fn pooled_displacement_autocorrelation(profiles: &[&Profile]) -> Vec<AutocorrelationSample> {
    let mut pooled: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for track in profiles.iter().flat_map(|p| p.tracks()) {
        for point in track.displacement_autocorrelation() {
            pooled
                .entry(point.lag_steps)
                .or_default()
                .push(point.correlation);
        }
    }
    pooled
        .into_iter()
        .map(|(lag_steps, values)| AutocorrelationSample { lag_steps, values })
        .collect()
}

struct LinearFit {
    slope: f64,
    intercept: f64,
    r: f64,
    p_value: f64,
    stderr: f64,
}

/// Ordinary least squares with a t-test on the slope
fn linear_regression(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    let n = xs.len();
    if n < 2 {
        return Err(Error::insufficient(
            "MSD",
            format!("{n} lag(s) with positive MSD; at least 2 are needed for a fit"),
        ));
    }
    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return Err(Error::insufficient("MSD", "all lags are identical"));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if syy == 0.0 {
        return Ok(LinearFit {
            slope,
            intercept,
            r: 0.0,
            p_value: 1.0,
            stderr: 0.0,
        });
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    if n == 2 {
        return Ok(LinearFit {
            slope,
            intercept,
            r,
            p_value: 0.0,
            stderr: 0.0,
        });
    }

    let df = nf - 2.0;
    let stderr = ((1.0 - r * r).max(0.0) * syy / sxx / df).sqrt();
    let p_value = if stderr == 0.0 {
        0.0
    } else {
        let t = slope / stderr;
        let dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| Error::Computation(format!("Student's t distribution: {e}")))?;
        (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0)
    };
    Ok(LinearFit {
        slope,
        intercept,
        r,
        p_value,
        stderr,
    })
}
