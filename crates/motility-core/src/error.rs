//! Error types for motility analysis
//!
//! Provides a unified error type for all motility-stats crates. Every variant
//! describes a condition local to one track, profile or comparison, and carries
//! enough context (agent, statistic, labels) for the caller to decide whether
//! to exclude the offending input or abort.

use crate::AgentId;
use thiserror::Error;

/// Core error type for motility operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A track could not be built from the supplied positions
    #[error("Invalid track for agent {agent}: {reason}")]
    InvalidTrack { agent: AgentId, reason: String },

    /// A derived statistic cannot be computed from the available points
    #[error("Insufficient data for {statistic}{}: {reason}", agent_context(.agent))]
    InsufficientData {
        agent: Option<AgentId>,
        statistic: String,
        reason: String,
    },

    /// A profile was constructed without any tracks
    #[error("Profile '{label}' contains no tracks")]
    EmptyProfile { label: String },

    /// Profiles sampled at different rates were contrasted without an override
    #[error(
        "Incompatible profiles: '{first}' uses a {first_step}s time step but '{second}' uses {second_step}s"
    )]
    IncompatibleProfiles {
        first: String,
        first_step: f64,
        second: String,
        second_step: f64,
    },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

fn agent_context(agent: &Option<AgentId>) -> String {
    match agent {
        Some(agent) => format!(" (agent {agent})"),
        None => String::new(),
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an invalid-track error
    pub fn invalid_track(agent: &AgentId, reason: impl Into<String>) -> Self {
        Self::InvalidTrack {
            agent: agent.clone(),
            reason: reason.into(),
        }
    }

    /// Create an insufficient-data error scoped to one agent's track
    pub fn insufficient_for_agent(
        agent: &AgentId,
        statistic: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InsufficientData {
            agent: Some(agent.clone()),
            statistic: statistic.into(),
            reason: reason.into(),
        }
    }

    /// Create an insufficient-data error for a population-level computation
    pub fn insufficient(statistic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            agent: None,
            statistic: statistic.into(),
            reason: reason.into(),
        }
    }

    /// Create an error for an empty sample
    pub fn empty_sample(statistic: impl Into<String>) -> Self {
        Self::insufficient(statistic, "no values available")
    }

    /// Create an error for a probability outside [0, 1]
    pub fn invalid_probability(p: f64) -> Self {
        Self::InvalidParameter(format!("Probability {p} must be in [0, 1]"))
    }

    /// Returns the agent this error refers to, if any
    pub fn agent(&self) -> Option<&AgentId> {
        match self {
            Self::InvalidTrack { agent, .. } => Some(agent),
            Self::InsufficientData { agent, .. } => agent.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_track(&AgentId::from("cell-7"), "fewer than 2 positions");
        assert_eq!(
            err.to_string(),
            "Invalid track for agent cell-7: fewer than 2 positions"
        );

        let err = Error::EmptyProfile {
            label: "wild-type".to_string(),
        };
        assert_eq!(err.to_string(), "Profile 'wild-type' contains no tracks");

        let err = Error::IncompatibleProfiles {
            first: "a".to_string(),
            first_step: 30.0,
            second: "b".to_string(),
            second_step: 50.0,
        };
        assert_eq!(
            err.to_string(),
            "Incompatible profiles: 'a' uses a 30s time step but 'b' uses 50s"
        );

        let err = Error::InvalidParameter("resamples must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: resamples must be positive");
    }

    #[test]
    fn test_insufficient_data_context() {
        let err = Error::insufficient_for_agent(&AgentId::from(3u64), "msd", "no pairs at lag 90");
        assert_eq!(
            err.to_string(),
            "Insufficient data for msd (agent 3): no pairs at lag 90"
        );
        assert_eq!(err.agent(), Some(&AgentId::from(3u64)));

        let err = Error::empty_sample("speed");
        assert_eq!(err.to_string(), "Insufficient data for speed: no values available");
        assert_eq!(err.agent(), None);
    }

    #[test]
    fn test_invalid_probability() {
        let err = Error::invalid_probability(1.5);
        assert_eq!(err.to_string(), "Invalid parameter: Probability 1.5 must be in [0, 1]");
    }

    #[test]
    fn test_result_type_alias() {
        fn check(succeed: bool) -> Result<i32> {
            if succeed {
                Ok(42)
            } else {
                Err(Error::Computation("test failure".to_string()))
            }
        }

        assert_eq!(check(true).unwrap(), 42);
        assert!(check(false).is_err());
    }
}
