//! Sampling interval with provenance

use motility_core::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Where a profile's time step came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeStepSource {
    /// Passed explicitly by the caller
    Explicit,
    /// Read from metadata accompanying the track data
    Metadata,
}

/// Interval between consecutive observations, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeStep {
    pub seconds: f64,
    pub source: TimeStepSource,
}

impl TimeStep {
    pub fn explicit(seconds: f64) -> Result<Self> {
        Self::new(seconds, TimeStepSource::Explicit)
    }

    pub fn from_metadata(seconds: f64) -> Result<Self> {
        Self::new(seconds, TimeStepSource::Metadata)
    }

    pub fn new(seconds: f64, source: TimeStepSource) -> Result<Self> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "time step must be positive and finite, got {seconds}"
            )));
        }
        Ok(Self { seconds, source })
    }

    /// Same sampling interval, within a relative tolerance of 1e-9
    pub fn matches(&self, other: &TimeStep) -> bool {
        let scale = self.seconds.abs().max(other.seconds.abs());
        (self.seconds - other.seconds).abs() <= 1e-9 * scale
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            TimeStepSource::Explicit => "explicit",
            TimeStepSource::Metadata => "metadata",
        };
        write!(f, "{}s ({source})", self.seconds)
    }
}
