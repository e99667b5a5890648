//! Statistical contrasts between motility profiles
//!
//! A [`ProfileContrast`] aggregates one statistic for each of two or more
//! labelled profiles and runs a two-sample test on every pair:
//!
//! - **Tests**: Mann-Whitney U (default), Kolmogorov-Smirnov, Welch's t-test
//! - **Correction**: none (default) or Bonferroni over all pairs; raw and
//!   adjusted p-values are both reported
//! - **Effect sizes**: Cliff's delta, Vargha-Delaney A and Cohen's d, plus an optional
//!   percentile bootstrap interval for the difference in means
//!
//! Profiles sampled at different time steps are refused unless the
//! configuration explicitly allows it, in which case a warning is logged.
//!
//! # Example
//!
//! ```rust
//! use motility_contrast::{Correction, ContrastConfig, ProfileContrast, TestKind};
//! use motility_profile::{Profile, Statistic, TimeStep};
//! use motility_track::Track;
//!
//! let step = TimeStep::explicit(1.0).unwrap();
//! let tracks = |speeds: &[f64]| -> Vec<Track> {
//!     speeds
//!         .iter()
//!         .enumerate()
//!         .map(|(i, s)| {
//!             Track::from_tuples(format!("t{i}"), &[(0.0, 0.0, 0.0, 0.0), (*s, 0.0, 0.0, 1.0)])
//!                 .unwrap()
//!         })
//!         .collect()
//! };
//! let control = Profile::new("control", tracks(&[1.0, 1.2, 0.8, 1.1]), step).unwrap();
//! let treated = Profile::new("treated", tracks(&[2.0, 2.3, 1.9, 2.2]), step).unwrap();
//!
//! let config = ContrastConfig::new()
//!     .with_test(TestKind::TTest)
//!     .with_correction(Correction::Bonferroni);
//! let result = ProfileContrast::new(vec![(&control, "control"), (&treated, "treated")])
//!     .unwrap()
//!     .compare(Statistic::Speed, &config)
//!     .unwrap();
//!
//! assert!(result.p_value().unwrap() < 0.01);
//! assert!(result.comparisons[0].cliff_delta.favors_second());
//! ```

mod bootstrap;
mod config;
mod contrast;
mod correction;
mod effect;
mod hypothesis;

pub use bootstrap::{mean_difference_interval, BootstrapConfig, ConfidenceInterval};
pub use config::ContrastConfig;
pub use contrast::{ContrastResult, PairwiseComparison, ProfileContrast, ProfileSummary};
pub use correction::Correction;
pub use effect::{
    cliff_delta, cohen_d, vargha_delaney_a, EffectSize, EffectSizeInterpretation, EffectSizeType,
};
pub use hypothesis::{ks_two_sample, mann_whitney_u, welch_t_test, TestKind, TestResult};
