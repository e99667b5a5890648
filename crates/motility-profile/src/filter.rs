//! Track trimming criteria

use motility_track::Track;
use serde::Serialize;
use std::fmt;

/// Arrest-based trimming: drop tracks that spend too much time stationary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrestCriterion {
    /// Steps slower than this count as arrested
    pub speed_threshold: f64,
    /// Tracks whose arrested fraction reaches this value are dropped
    pub max_coefficient: f64,
}

/// Minimum-quality requirements a track must meet to enter a profile
///
/// All criteria are off by default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrackFilter {
    pub min_net_displacement: Option<f64>,
    pub min_observations: Option<usize>,
    pub min_duration: Option<f64>,
    pub arrest: Option<ArrestCriterion>,
}

impl TrackFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_net_displacement(mut self, distance: f64) -> Self {
        self.min_net_displacement = Some(distance);
        self
    }

    pub fn with_min_observations(mut self, count: usize) -> Self {
        self.min_observations = Some(count);
        self
    }

    pub fn with_min_duration(mut self, seconds: f64) -> Self {
        self.min_duration = Some(seconds);
        self
    }

    pub fn with_max_arrest_coefficient(mut self, speed_threshold: f64, max_coefficient: f64) -> Self {
        self.arrest = Some(ArrestCriterion {
            speed_threshold,
            max_coefficient,
        });
        self
    }

    /// The first criterion `track` fails, if any
    pub fn check(&self, track: &Track) -> Option<FilterReason> {
        if let Some(threshold) = self.min_net_displacement {
            let value = track.net_displacement();
            if value < threshold {
                return Some(FilterReason::NetDisplacement { value, threshold });
            }
        }
        if let Some(threshold) = self.min_observations {
            if track.len() < threshold {
                return Some(FilterReason::Observations {
                    count: track.len(),
                    threshold,
                });
            }
        }
        if let Some(threshold) = self.min_duration {
            let value = track.duration();
            if value < threshold {
                return Some(FilterReason::Duration { value, threshold });
            }
        }
        if let Some(arrest) = self.arrest {
            let value = track.arrest_coefficient(arrest.speed_threshold);
            if value >= arrest.max_coefficient {
                return Some(FilterReason::ArrestCoefficient {
                    value,
                    threshold: arrest.max_coefficient,
                });
            }
        }
        None
    }

    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }
}

/// Why a track was trimmed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FilterReason {
    NetDisplacement { value: f64, threshold: f64 },
    Observations { count: usize, threshold: usize },
    Duration { value: f64, threshold: f64 },
    ArrestCoefficient { value: f64, threshold: f64 },
}

impl FilterReason {
    pub fn criterion(&self) -> &'static str {
        match self {
            Self::NetDisplacement { .. } => "net displacement",
            Self::Observations { .. } => "observations",
            Self::Duration { .. } => "duration",
            Self::ArrestCoefficient { .. } => "arrest coefficient",
        }
    }
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetDisplacement { value, threshold } => {
                write!(f, "net displacement {value:.3} below {threshold}")
            }
            Self::Observations { count, threshold } => {
                write!(f, "{count} observations, fewer than {threshold}")
            }
            Self::Duration { value, threshold } => {
                write!(f, "duration {value:.3}s shorter than {threshold}s")
            }
            Self::ArrestCoefficient { value, threshold } => {
                write!(f, "arrest coefficient {value:.3} at or above {threshold}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(points: &[(f64, f64, f64, f64)]) -> Track {
        Track::from_tuples("f", points).unwrap()
    }

    #[test]
    fn test_default_filter_accepts_everything() {
        let filter = TrackFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.check(&track(&[(0.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 1.0)])), None);
    }

    #[test]
    fn test_each_criterion() {
        let short = track(&[(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 0.0, 30.0)]);

        let reason = TrackFilter::new().with_min_net_displacement(10.0).check(&short);
        assert!(matches!(reason, Some(FilterReason::NetDisplacement { .. })));

        let reason = TrackFilter::new().with_min_observations(3).check(&short);
        assert_eq!(
            reason,
            Some(FilterReason::Observations {
                count: 2,
                threshold: 3
            })
        );

        let reason = TrackFilter::new().with_min_duration(60.0).check(&short);
        assert_eq!(reason.map(|r| r.criterion()), Some("duration"));

        let stalled = track(&[(0.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 30.0), (1.0, 0.0, 0.0, 60.0)]);
        let filter = TrackFilter::new().with_max_arrest_coefficient(0.01, 0.5);
        assert!(filter.is_active());
        assert!(matches!(
            filter.check(&stalled),
            Some(FilterReason::ArrestCoefficient { .. })
        ));
        assert_eq!(TrackFilter::new().with_max_arrest_coefficient(0.01, 0.6).check(&stalled), None);
    }
}
