//! Contrast settings

use crate::bootstrap::BootstrapConfig;
use crate::correction::Correction;
use crate::hypothesis::TestKind;
use motility_profile::AggregationPolicy;
use serde::Serialize;

/// How profiles are contrasted
///
/// Defaults: Mann-Whitney U, no correction, pooled per-step values, strict
/// time-step checking, no bootstrap interval.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ContrastConfig {
    pub test: TestKind,
    pub correction: Correction,
    pub policy: AggregationPolicy,
    /// Compare profiles sampled at different time steps instead of failing
    pub time_step_override: bool,
    pub bootstrap: Option<BootstrapConfig>,
}

impl ContrastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test(mut self, test: TestKind) -> Self {
        self.test = test;
        self
    }

    pub fn with_correction(mut self, correction: Correction) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_policy(mut self, policy: AggregationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_time_step_override(mut self, allow: bool) -> Self {
        self.time_step_override = allow;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }
}
