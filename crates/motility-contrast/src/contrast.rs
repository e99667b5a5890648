//! Contrasting a statistic across labelled profiles

use crate::bootstrap::{mean_difference_interval, ConfidenceInterval};
use crate::config::ContrastConfig;
use crate::correction::Correction;
use crate::effect::{cliff_delta, cohen_d, EffectSize};
use crate::hypothesis::TestKind;
use motility_core::{Error, Result};
use motility_profile::{Aggregate, AggregationPolicy, Profile, Statistic};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Two or more profiles, each under a display label
///
/// # Examples
///
/// ```rust
/// use motility_contrast::{ContrastConfig, ProfileContrast};
/// use motility_profile::{Profile, Statistic, TimeStep};
/// use motility_track::Track;
///
/// let step = TimeStep::explicit(30.0).unwrap();
/// let slow = Track::from_tuples("s", &[(0.0, 0.0, 0.0, 0.0), (30.0, 0.0, 0.0, 30.0)]).unwrap();
/// let fast = Track::from_tuples("f", &[(0.0, 0.0, 0.0, 0.0), (90.0, 0.0, 0.0, 30.0)]).unwrap();
/// let control = Profile::new("control", vec![slow], step).unwrap();
/// let treated = Profile::new("treated", vec![fast], step).unwrap();
///
/// let contrast = ProfileContrast::new(vec![(&control, "control"), (&treated, "treated")]).unwrap();
/// let result = contrast.compare(Statistic::Speed, &ContrastConfig::default()).unwrap();
/// assert_eq!(result.profiles[0].mean, 1.0);
/// assert_eq!(result.profiles[1].mean, 3.0);
/// assert_eq!(result.test_statistic(), Some(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct ProfileContrast<'a> {
    entries: Vec<(&'a Profile, String)>,
}

impl<'a> ProfileContrast<'a> {
    pub fn new<S: Into<String>>(entries: Vec<(&'a Profile, S)>) -> Result<Self> {
        if entries.len() < 2 {
            return Err(Error::InvalidParameter(format!(
                "a contrast needs at least two profiles, got {}",
                entries.len()
            )));
        }
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|(profile, label)| (profile, label.into()))
                .collect(),
        })
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, label)| label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a contrast holds at least two profiles
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail on the first pair of profiles sampled at different time steps,
    /// or only warn about every such pair when `allow_mismatch` is set
    pub fn check_time_steps(&self, allow_mismatch: bool) -> Result<()> {
        for (i, (first, first_label)) in self.entries.iter().enumerate() {
            for (second, second_label) in &self.entries[i + 1..] {
                let (a, b) = (first.time_step(), second.time_step());
                if a.matches(&b) {
                    continue;
                }
                if !allow_mismatch {
                    return Err(Error::IncompatibleProfiles {
                        first: first_label.clone(),
                        first_step: a.seconds,
                        second: second_label.clone(),
                        second_step: b.seconds,
                    });
                }
                warn!(
                    "Comparing '{first_label}' ({a}) with '{second_label}' ({b}) despite differing time steps"
                );
            }
        }
        Ok(())
    }

    /// Aggregate `statistic` per profile and test every pair
    #[instrument(skip(self, config), fields(n_profiles = self.entries.len(), test = %config.test))]
    pub fn compare(&self, statistic: Statistic, config: &ContrastConfig) -> Result<ContrastResult> {
        if let Some(bootstrap) = &config.bootstrap {
            bootstrap.validate()?;
        }
        self.check_time_steps(config.time_step_override)?;

        let aggregates = self
            .entries
            .iter()
            .map(|(profile, _)| profile.aggregate(statistic, config.policy))
            .collect::<Result<Vec<_>>>()?;

        let mut comparisons = Vec::new();
        for i in 0..aggregates.len() {
            for j in i + 1..aggregates.len() {
                comparisons.push(self.compare_pair(i, j, &aggregates, config)?);
            }
        }

        let raw: Vec<f64> = comparisons.iter().map(|c| c.p_value).collect();
        for (comparison, adjusted) in comparisons.iter_mut().zip(config.correction.adjust(&raw)) {
            comparison.adjusted_p_value = adjusted;
        }

        let profiles = self
            .entries
            .iter()
            .zip(&aggregates)
            .map(|((profile, label), aggregate)| ProfileSummary::new(label, profile, aggregate))
            .collect();

        Ok(ContrastResult {
            statistic,
            test: config.test,
            correction: config.correction,
            policy: config.policy,
            profiles,
            comparisons,
        })
    }

    fn compare_pair(
        &self,
        i: usize,
        j: usize,
        aggregates: &[Aggregate],
        config: &ContrastConfig,
    ) -> Result<PairwiseComparison> {
        let (first, second) = (&aggregates[i].values, &aggregates[j].values);
        let test = config.test.run(first, second)?;

        let standardized = match cohen_d(first, second) {
            Ok(d) => Some(d),
            Err(e) => {
                debug!("No Cohen's d for pair ({i}, {j}): {e}");
                None
            }
        };
        let mean_difference_ci = config
            .bootstrap
            .as_ref()
            .map(|bootstrap| mean_difference_interval(first, second, bootstrap))
            .transpose()?;

        let dominance = cliff_delta(first, second)?;

        debug!(
            "{} vs {}: statistic={:.4}, p={:.4}",
            self.entries[i].1, self.entries[j].1, test.statistic, test.p_value
        );

        Ok(PairwiseComparison {
            first: self.entries[i].1.clone(),
            second: self.entries[j].1.clone(),
            statistic: test.statistic,
            p_value: test.p_value,
            adjusted_p_value: test.p_value,
            first_size: first.len(),
            second_size: second.len(),
            vargha_delaney_a: (1.0 + dominance.magnitude) / 2.0,
            cliff_delta: dominance,
            cohen_d: standardized,
            mean_difference_ci,
        })
    }
}

/// Per-profile description of the contrasted statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub label: String,
    pub time_step: f64,
    pub sample_size: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub iqr: f64,
    pub contributing_tracks: usize,
    pub excluded_tracks: usize,
    pub missing_values: usize,
}

impl ProfileSummary {
    fn new(label: &str, profile: &Profile, aggregate: &Aggregate) -> Self {
        Self {
            label: label.to_string(),
            time_step: profile.time_step().seconds,
            sample_size: aggregate.sample_size(),
            mean: aggregate.summary.mean,
            std_dev: aggregate.summary.std_dev,
            median: aggregate.summary.median,
            iqr: aggregate.summary.iqr(),
            contributing_tracks: aggregate.contributing_tracks,
            excluded_tracks: aggregate.excluded_tracks(),
            missing_values: aggregate.missing_values,
        }
    }
}

/// One pairwise test; effect sizes are signed towards `second`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseComparison {
    pub first: String,
    pub second: String,
    pub statistic: f64,
    pub p_value: f64,
    pub adjusted_p_value: f64,
    pub first_size: usize,
    pub second_size: usize,
    pub cliff_delta: EffectSize,
    /// Probability that a `second` value exceeds a `first` one, ties halved
    pub vargha_delaney_a: f64,
    /// Undefined when both samples are constant but differ, or too small
    pub cohen_d: Option<EffectSize>,
    pub mean_difference_ci: Option<ConfidenceInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastResult {
    pub statistic: Statistic,
    pub test: TestKind,
    pub correction: Correction,
    pub policy: AggregationPolicy,
    pub profiles: Vec<ProfileSummary>,
    /// Pairs `(i, j)` with `i < j`, in row-major order
    pub comparisons: Vec<PairwiseComparison>,
}

impl ContrastResult {
    /// Test statistic of the first pair
    pub fn test_statistic(&self) -> Option<f64> {
        self.comparisons.first().map(|c| c.statistic)
    }

    /// Raw p-value of the first pair
    pub fn p_value(&self) -> Option<f64> {
        self.comparisons.first().map(|c| c.p_value)
    }

    pub fn comparison(&self, first: &str, second: &str) -> Option<&PairwiseComparison> {
        self.comparisons
            .iter()
            .find(|c| c.first == first && c.second == second)
    }

    pub fn profile(&self, label: &str) -> Option<&ProfileSummary> {
        self.profiles.iter().find(|p| p.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::BootstrapConfig;
    use approx::assert_abs_diff_eq;
    use motility_profile::{Reducer, TimeStep};
    use motility_track::Track;

    fn track(agent: &str, points: &[(f64, f64, f64, f64)]) -> Track {
        Track::from_tuples(agent, points).unwrap()
    }

    fn profile(label: &str, step: f64, tracks: Vec<Track>) -> Profile {
        Profile::new(label, tracks, TimeStep::explicit(step).unwrap()).unwrap()
    }

    /// Tracks moving `speed` per unit time along x, one step each
    fn uniform(label: &str, step: f64, speeds: &[f64]) -> Profile {
        let tracks = speeds
            .iter()
            .enumerate()
            .map(|(i, s)| track(&format!("{label}-{i}"), &[(0.0, 0.0, 0.0, 0.0), (s * step, 0.0, 0.0, step)]))
            .collect();
        profile(label, step, tracks)
    }

    #[test]
    fn test_requires_two_profiles() {
        let p = uniform("p", 1.0, &[1.0]);
        let err = ProfileContrast::new(vec![(&p, "only")]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_time_step_mismatch() {
        let a = uniform("a", 30.0, &[1.0, 2.0]);
        let b = uniform("b", 50.0, &[1.0, 2.0]);
        let contrast = ProfileContrast::new(vec![(&a, "thirty"), (&b, "fifty")]).unwrap();

        let err = contrast
            .compare(Statistic::Speed, &ContrastConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            Error::IncompatibleProfiles {
                first: "thirty".to_string(),
                first_step: 30.0,
                second: "fifty".to_string(),
                second_step: 50.0,
            }
        );

        let result = contrast
            .compare(
                Statistic::Speed,
                &ContrastConfig::default().with_time_step_override(true),
            )
            .unwrap();
        assert_eq!(result.comparisons.len(), 1);
    }

    #[test]
    fn test_two_track_scenario_profiles() {
        let a = track(
            "A",
            &[(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 0.0, 1.0), (1.0, 1.0, 0.0, 2.0)],
        );
        let b = track("B", &[(0.0, 0.0, 0.0, 0.0), (0.0, 0.0, 1.0, 1.0)]);
        let first = profile("first", 1.0, vec![a]);
        let second = profile("second", 1.0, vec![b]);
        let contrast = ProfileContrast::new(vec![(&first, "A"), (&second, "B")]).unwrap();

        let result = contrast
            .compare(Statistic::Speed, &ContrastConfig::default())
            .unwrap();
        assert_eq!(result.profiles[0].sample_size, 2);
        assert_eq!(result.profiles[1].sample_size, 1);
        assert_eq!(result.p_value(), Some(1.0));
        assert_abs_diff_eq!(result.comparisons[0].cliff_delta.magnitude, 0.0);
    }

    #[test]
    fn test_three_way_bonferroni() {
        let slow = uniform("slow", 1.0, &[1.0, 1.1, 0.9, 1.2, 0.8, 1.05]);
        let mid = uniform("mid", 1.0, &[1.0, 1.15, 0.95, 1.1, 0.85, 1.0]);
        let fast = uniform("fast", 1.0, &[3.0, 3.1, 2.9, 3.2, 2.8, 3.05]);
        let contrast =
            ProfileContrast::new(vec![(&slow, "slow"), (&mid, "mid"), (&fast, "fast")]).unwrap();
        let config = ContrastConfig::new()
            .with_test(TestKind::TTest)
            .with_correction(Correction::Bonferroni)
            .with_policy(AggregationPolicy::PerTrack(Reducer::Median));

        let result = contrast.compare(Statistic::Speed, &config).unwrap();
        let labels: Vec<(&str, &str)> = result
            .comparisons
            .iter()
            .map(|c| (c.first.as_str(), c.second.as_str()))
            .collect();
        assert_eq!(labels, vec![("slow", "mid"), ("slow", "fast"), ("mid", "fast")]);

        for c in &result.comparisons {
            assert_abs_diff_eq!(c.adjusted_p_value, (c.p_value * 3.0).min(1.0), epsilon = 1e-15);
        }
        let slow_fast = result.comparison("slow", "fast").unwrap();
        assert!(slow_fast.adjusted_p_value < 0.001);
        assert_eq!(slow_fast.cliff_delta.magnitude, 1.0);
        assert_eq!(slow_fast.vargha_delaney_a, 1.0);
        assert!(slow_fast.cohen_d.unwrap().is_practically_significant());
        assert!(result.comparison("slow", "mid").unwrap().p_value > 0.5);
        assert_eq!(result.profile("fast").unwrap().contributing_tracks, 6);
    }

    #[test]
    fn test_bootstrap_interval_attached() {
        let a = uniform("a", 1.0, &[1.0, 1.2, 0.9, 1.1, 1.0]);
        let b = uniform("b", 1.0, &[2.0, 2.2, 1.9, 2.1, 2.0]);
        let contrast = ProfileContrast::new(vec![(&a, "a"), (&b, "b")]).unwrap();
        let config = ContrastConfig::new()
            .with_test(TestKind::Ks)
            .with_bootstrap(BootstrapConfig::default().with_resamples(200).with_seed(3));

        let result = contrast.compare(Statistic::Speed, &config).unwrap();
        let ci = result.comparisons[0].mean_difference_ci.unwrap();
        assert_abs_diff_eq!(ci.estimate, 1.0, epsilon = 1e-12);
        assert!(ci.excludes_zero());
        assert_eq!(result.test_statistic(), Some(1.0));
    }
}
