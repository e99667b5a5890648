//! Two-sample hypothesis tests
//!
//! All tests are two-sided. Statistics are reported for the first sample
//! (U of the first sample, t of first minus second).

use motility_core::utils::{average_ranks, mean, sorted, variance};
use motility_core::{Error, Result};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use std::fmt;

/// Which test a contrast runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TestKind {
    /// Mann-Whitney U, normal approximation with tie and continuity correction
    #[default]
    MannWhitney,
    /// Two-sample Kolmogorov-Smirnov, asymptotic distribution
    Ks,
    /// Welch's unequal-variance t-test
    TTest,
}

impl TestKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MannWhitney => "Mann-Whitney U",
            Self::Ks => "Kolmogorov-Smirnov",
            Self::TTest => "Welch's t-test",
        }
    }

    pub fn run(&self, first: &[f64], second: &[f64]) -> Result<TestResult> {
        match self {
            Self::MannWhitney => mann_whitney_u(first, second),
            Self::Ks => ks_two_sample(first, second),
            Self::TTest => welch_t_test(first, second),
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    pub kind: TestKind,
    pub statistic: f64,
    pub p_value: f64,
}

fn check_samples(kind: TestKind, first: &[f64], second: &[f64], min_len: usize) -> Result<()> {
    if first.len() < min_len || second.len() < min_len {
        return Err(Error::insufficient(
            kind.name(),
            format!(
                "samples of size {} and {}; each needs at least {min_len}",
                first.len(),
                second.len()
            ),
        ));
    }
    if first.iter().chain(second).any(|v| !v.is_finite()) {
        return Err(Error::Computation(format!(
            "{} requires finite values",
            kind.name()
        )));
    }
    Ok(())
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("Failed to create normal distribution: {e}")))
}

/// Mann-Whitney U test
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<TestResult> {
    let kind = TestKind::MannWhitney;
    check_samples(kind, first, second, 1)?;

    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let n = n1 + n2;
    let combined: Vec<f64> = first.iter().chain(second).copied().collect();
    let (ranks, ties) = average_ranks(&combined);
    let rank_sum: f64 = ranks[..first.len()].iter().sum();
    let u = rank_sum - n1 * (n1 + 1.0) / 2.0;

    let mu = n1 * n2 / 2.0;
    let sigma = (n1 * n2 / 12.0 * ((n + 1.0) - tie_term(&ties, n))).sqrt();

    let p_value = if sigma > 0.0 && sigma.is_finite() {
        let z = ((u - mu).abs() - 0.5).max(0.0) / sigma;
        (2.0 * (1.0 - standard_normal()?.cdf(z))).min(1.0)
    } else {
        // every value tied
        1.0
    };
    Ok(TestResult {
        kind,
        statistic: u,
        p_value,
    })
}

/// Two-sample Kolmogorov-Smirnov test
///
/// The p-value uses the asymptotic Kolmogorov distribution evaluated at
/// `(√ne + 0.12 + 0.11/√ne)·D` (Stephens 1970), with `ne = n1 n2 / (n1 + n2)`.
pub fn ks_two_sample(first: &[f64], second: &[f64]) -> Result<TestResult> {
    let kind = TestKind::Ks;
    check_samples(kind, first, second, 1)?;

    let a = sorted(first);
    let b = sorted(second);
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    let en = (n1 * n2 / (n1 + n2)).sqrt();
    let p_value = kolmogorov_survival((en + 0.12 + 0.11 / en) * d);
    Ok(TestResult {
        kind,
        statistic: d,
        p_value,
    })
}

/// `Q(λ) = 2 Σ (-1)^(k-1) exp(-2 k² λ²)`
fn kolmogorov_survival(lambda: f64) -> f64 {
    // the series converges too slowly near zero, where Q is 1 to machine precision
    if lambda < 0.2 {
        return 1.0;
    }
    let a = -2.0 * lambda * lambda;
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let term = sign * (a * (k * k) as f64).exp();
        sum += term;
        if term.abs() < 1e-12 * sum.abs() || term.abs() < 1e-300 {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Welch's t-test
pub fn welch_t_test(first: &[f64], second: &[f64]) -> Result<TestResult> {
    let kind = TestKind::TTest;
    check_samples(kind, first, second, 2)?;

    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let difference = mean(first) - mean(second);
    let s1 = variance(first) / n1;
    let s2 = variance(second) / n2;
    let se = (s1 + s2).sqrt();

    if se == 0.0 {
        let (statistic, p_value) = if difference == 0.0 {
            (0.0, 1.0)
        } else {
            (difference.signum() * f64::INFINITY, 0.0)
        };
        return Ok(TestResult {
            kind,
            statistic,
            p_value,
        });
    }

    let t = difference / se;
    let df = (s1 + s2).powi(2) / (s1 * s1 / (n1 - 1.0) + s2 * s2 / (n2 - 1.0));
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| Error::Computation(format!("Failed to create Student's t distribution: {e}")))?;
    let p_value = (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0);
    Ok(TestResult {
        kind,
        statistic: t,
        p_value,
    })
}

/// `sum(t^3 - t) / (n (n - 1))` over tie group sizes `t`
fn tie_term(ties: &[usize], n: f64) -> f64 {
    ties.iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum::<f64>()
        / (n * (n - 1.0))
}
