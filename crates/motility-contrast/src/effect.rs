//! Effect sizes for two-sample comparisons
//!
//! Both measures are signed so that a positive value means the second
//! sample tends to be larger than the first.

use motility_core::utils::{mean, variance};
use motility_core::{Error, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Types of effect sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectSizeType {
    /// Standardized mean difference (Cohen's d)
    StandardizedMeanDifference,
    /// Non-parametric dominance measure (Cliff's delta)
    Dominance,
}

impl EffectSizeType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StandardizedMeanDifference => "Cohen's d",
            Self::Dominance => "Cliff's delta",
        }
    }
}

/// An effect size measurement with magnitude and interpretation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectSize {
    pub magnitude: f64,
    pub effect_type: EffectSizeType,
    pub interpretation: EffectSizeInterpretation,
    /// Sample sizes (first, second)
    pub sample_sizes: (usize, usize),
}

impl EffectSize {
    pub fn new(magnitude: f64, effect_type: EffectSizeType, sample_sizes: (usize, usize)) -> Self {
        Self {
            magnitude,
            effect_type,
            interpretation: EffectSizeInterpretation::from_magnitude(magnitude, effect_type),
            sample_sizes,
        }
    }

    /// Check if the effect size is practically significant
    pub fn is_practically_significant(&self) -> bool {
        matches!(
            self.interpretation,
            EffectSizeInterpretation::Medium | EffectSizeInterpretation::Large
        )
    }

    /// Whether the second sample tends to be larger
    pub fn favors_second(&self) -> bool {
        self.magnitude > 0.0
    }
}

impl fmt::Display for EffectSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} ({})",
            self.effect_type.name(),
            self.magnitude,
            self.interpretation
        )
    }
}

/// Interpretation of effect size magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectSizeInterpretation {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectSizeInterpretation {
    /// Cohen's conventions for d; Romano et al. thresholds for Cliff's delta
    pub fn from_magnitude(magnitude: f64, effect_type: EffectSizeType) -> Self {
        let (small, medium, large) = match effect_type {
            EffectSizeType::StandardizedMeanDifference => (0.2, 0.5, 0.8),
            EffectSizeType::Dominance => (0.147, 0.33, 0.474),
        };
        let abs_magnitude = magnitude.abs();
        if abs_magnitude < small {
            Self::Negligible
        } else if abs_magnitude < medium {
            Self::Small
        } else if abs_magnitude < large {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

impl fmt::Display for EffectSizeInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Negligible => "negligible",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        write!(f, "{s}")
    }
}

fn require_non_empty(first: &[f64], second: &[f64]) -> Result<()> {
    if first.is_empty() || second.is_empty() {
        return Err(Error::InvalidParameter(
            "Both samples must be non-empty".to_string(),
        ));
    }
    Ok(())
}

/// Cliff's delta: `(#(second > first) - #(second < first)) / (n1 n2)`
///
/// Ranges from -1 (every value of `first` is larger) to +1.
pub fn cliff_delta(first: &[f64], second: &[f64]) -> Result<EffectSize> {
    require_non_empty(first, second)?;

    let mut wins: i64 = 0;
    let mut losses: i64 = 0;
    for &x1 in first {
        for &x2 in second {
            match x2.partial_cmp(&x1) {
                Some(Ordering::Greater) => wins += 1,
                Some(Ordering::Less) => losses += 1,
                Some(Ordering::Equal) => {}
                None => {
                    return Err(Error::Computation(
                        "Cannot compare values (NaN encountered)".to_string(),
                    ))
                }
            }
        }
    }

    let total_pairs = (first.len() * second.len()) as f64;
    Ok(EffectSize::new(
        (wins - losses) as f64 / total_pairs,
        EffectSizeType::Dominance,
        (first.len(), second.len()),
    ))
}

/// Vargha-Delaney A: probability that a value of `second` exceeds one of
/// `first`, counting ties as half
///
/// 0.5 means no dominance; equal to `(1 + delta) / 2` for Cliff's delta.
pub fn vargha_delaney_a(first: &[f64], second: &[f64]) -> Result<f64> {
    Ok((1.0 + cliff_delta(first, second)?.magnitude) / 2.0)
}

/// Cohen's d with the pooled standard deviation
///
/// Zero when both samples are constant and equal; fails when they are
/// constant but differ, since the standardized difference is unbounded.
pub fn cohen_d(first: &[f64], second: &[f64]) -> Result<EffectSize> {
    require_non_empty(first, second)?;
    let (n1, n2) = (first.len(), second.len());
    if n1 + n2 < 3 {
        return Err(Error::insufficient(
            "Cohen's d",
            "at least three values are needed for a pooled standard deviation",
        ));
    }

    let difference = mean(second) - mean(first);
    let pooled_variance = ((n1 - 1) as f64 * variance(first) + (n2 - 1) as f64 * variance(second))
        / (n1 + n2 - 2) as f64;
    let pooled_sd = pooled_variance.sqrt();

    let d = if pooled_sd > 0.0 {
        difference / pooled_sd
    } else if difference == 0.0 {
        0.0
    } else {
        return Err(Error::Computation(
            "Cohen's d is undefined for constant samples with different values".to_string(),
        ));
    };

    Ok(EffectSize::new(
        d,
        EffectSizeType::StandardizedMeanDifference,
        (n1, n2),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_vargha_delaney_a() {
        // 8 of 12 pairs favor second, 1 tie, 3 favor first
        let first = [1.0, 3.0, 5.0];
        let second = [2.0, 3.0, 6.0, 7.0];
        assert_abs_diff_eq!(
            vargha_delaney_a(&first, &second).unwrap(),
            8.5 / 12.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            vargha_delaney_a(&second, &first).unwrap(),
            3.5 / 12.0,
            epsilon = 1e-12
        );
        assert_eq!(vargha_delaney_a(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.5);
        assert!(vargha_delaney_a(&[], &[1.0]).is_err());
    }

    #[test]
    fn test_cliff_delta() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [3.0, 4.0, 5.0, 6.0, 7.0];
        let delta = cliff_delta(&a, &b).unwrap();
        // 19 wins, 3 losses, 3 ties over 25 pairs
        assert_abs_diff_eq!(delta.magnitude, 16.0 / 25.0);
        assert_eq!(delta.interpretation, EffectSizeInterpretation::Large);
        assert!(delta.favors_second());

        let reversed = cliff_delta(&b, &a).unwrap();
        assert_abs_diff_eq!(reversed.magnitude, -delta.magnitude);
    }

    #[test]
    fn test_cliff_delta_rejects_nan() {
        assert!(cliff_delta(&[1.0, f64::NAN], &[2.0]).is_err());
        assert!(cliff_delta(&[], &[2.0]).is_err());
    }

    #[test]
    fn test_cohen_d() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let d = cohen_d(&a, &b).unwrap();
        // pooled sd = sqrt(2.5)
        assert_abs_diff_eq!(d.magnitude, 1.0 / 2.5f64.sqrt(), epsilon = 1e-12);
        assert_eq!(d.interpretation, EffectSizeInterpretation::Medium);
        assert_eq!(d.sample_sizes, (5, 5));
    }

    #[test]
    fn test_cohen_d_constant_samples() {
        assert_eq!(cohen_d(&[2.0, 2.0], &[2.0, 2.0]).unwrap().magnitude, 0.0);
        assert!(cohen_d(&[2.0, 2.0], &[3.0, 3.0]).is_err());
        assert!(cohen_d(&[1.0], &[2.0]).is_err());
    }

    #[test]
    fn test_interpretation_thresholds() {
        use EffectSizeInterpretation::*;
        let dominance = |m| EffectSizeInterpretation::from_magnitude(m, EffectSizeType::Dominance);
        assert_eq!(dominance(0.1), Negligible);
        assert_eq!(dominance(0.2), Small);
        assert_eq!(dominance(-0.4), Medium);
        assert_eq!(dominance(0.6), Large);

        let effect = EffectSize::new(0.6, EffectSizeType::StandardizedMeanDifference, (10, 10));
        assert!(effect.is_practically_significant());
        assert_eq!(format!("{effect}"), "Cohen's d: 0.600 (medium)");
    }
}
