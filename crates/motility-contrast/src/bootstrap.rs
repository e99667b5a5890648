//! Percentile bootstrap confidence interval for a difference in means

use motility_core::utils::mean;
use motility_core::{Error, Result};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, instrument};

/// Resampling settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapConfig {
    pub resamples: usize,
    pub confidence_level: f64,
    /// Fixed seed for reproducible intervals; drawn at random when unset
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: 2000,
            confidence_level: 0.95,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    pub fn with_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.resamples == 0 {
            return Err(Error::InvalidParameter(
                "Number of resamples must be positive".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::invalid_probability(self.confidence_level));
        }
        Ok(())
    }
}

/// A confidence interval around a point estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub estimate: f64,
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    pub fn new(lower: f64, upper: f64, estimate: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            estimate,
            confidence_level,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Whether the interval excludes zero
    pub fn excludes_zero(&self) -> bool {
        !self.contains(0.0)
    }
}

/// Interval for `mean(second) - mean(first)`
///
/// Each resample draws both samples with replacement from an RNG seeded with
/// `seed + i`, so a fixed seed reproduces the interval exactly.
#[instrument(skip(first, second), fields(n1 = first.len(), n2 = second.len()))]
pub fn mean_difference_interval(
    first: &[f64],
    second: &[f64],
    config: &BootstrapConfig,
) -> Result<ConfidenceInterval> {
    config.validate()?;
    if first.is_empty() || second.is_empty() {
        return Err(Error::InvalidParameter("Empty sample(s)".to_string()));
    }

    let estimate = mean(second) - mean(first);
    let seed = config.seed.unwrap_or_else(|| thread_rng().gen());
    debug!("Running {} resamples with seed {seed}", config.resamples);

    let mut estimates: Vec<f64> = (0..config.resamples)
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let m1 = resampled_mean(first, &mut rng);
            let m2 = resampled_mean(second, &mut rng);
            m2 - m1
        })
        .collect();
    estimates.sort_by(|a, b| a.total_cmp(b));

    let alpha = 1.0 - config.confidence_level;
    let last = estimates.len() - 1;
    let lower_idx = (((alpha / 2.0) * estimates.len() as f64) as usize).min(last);
    let upper_idx = (((1.0 - alpha / 2.0) * estimates.len() as f64) as usize).min(last);

    Ok(ConfidenceInterval::new(
        estimates[lower_idx],
        estimates[upper_idx],
        estimate,
        config.confidence_level,
    ))
}

fn resampled_mean<R: Rng>(sample: &[f64], rng: &mut R) -> f64 {
    let n = sample.len();
    (0..n).map(|_| sample[rng.gen_range(0..n)]).sum::<f64>() / n as f64
}
