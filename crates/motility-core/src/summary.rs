//! Descriptive summary of a sample

use crate::utils::{mean, quantile_sorted, sorted, std_dev, variance};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Location and spread of a sample
///
/// Built from the full sample so downstream consumers can report
/// mean ± standard deviation as well as the robust median/IQR pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub q1: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize a sample; `statistic` names the quantity for error context
    pub fn from_values(statistic: &str, values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::empty_sample(statistic));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::Computation(format!(
                "{statistic} sample contains NaN or infinite values"
            )));
        }

        let sorted = sorted(values);
        // non-empty, checked above
        let quantile = |p: f64| quantile_sorted(&sorted, p).unwrap_or(f64::NAN);

        Ok(Self {
            n: values.len(),
            mean: mean(values),
            median: quantile(0.5),
            variance: variance(values),
            std_dev: std_dev(values),
            q1: quantile(0.25),
            q3: quantile(0.75),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Standard error of the mean
    pub fn standard_error(&self) -> f64 {
        self.std_dev / (self.n as f64).sqrt()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={}, mean={:.4} ± {:.4}, median={:.4} (IQR {:.4})",
            self.n,
            self.mean,
            self.std_dev,
            self.median,
            self.iqr()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_summary_values() {
        let summary = Summary::from_values("speed", &[5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
        assert_eq!(summary.n, 5);
        assert_abs_diff_eq!(summary.mean, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.median, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.variance, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.iqr(), 2.0, epsilon = 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_summary_rejects_empty_and_nan() {
        assert!(matches!(
            Summary::from_values("speed", &[]),
            Err(Error::InsufficientData { .. })
        ));
        assert!(matches!(
            Summary::from_values("speed", &[1.0, f64::NAN]),
            Err(Error::Computation(_))
        ));
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary::from_values("speed", &[1.0, 3.0]).unwrap();
        let display = format!("{summary}");
        assert!(display.contains("n=2"));
        assert!(display.contains("mean=2.0000"));
    }
}
