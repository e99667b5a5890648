//! Parsed observation records

use motility_core::AgentId;
use serde::{Deserialize, Serialize};

/// Time of an observation, either absolute or as a frame index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObservationTime {
    Seconds(f64),
    /// Converted to seconds with the profile's time step
    Frame(u64),
}

impl ObservationTime {
    pub fn to_seconds(self, time_step_seconds: f64) -> f64 {
        match self {
            Self::Seconds(t) => t,
            Self::Frame(frame) => frame as f64 * time_step_seconds,
        }
    }
}

/// One row of tracking output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub agent: AgentId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub time: ObservationTime,
}

impl Observation {
    pub fn new(agent: impl Into<AgentId>, x: f64, y: f64, z: f64, time: ObservationTime) -> Self {
        Self {
            agent: agent.into(),
            x,
            y,
            z,
            time,
        }
    }

    pub fn at_seconds(agent: impl Into<AgentId>, x: f64, y: f64, z: f64, t: f64) -> Self {
        Self::new(agent, x, y, z, ObservationTime::Seconds(t))
    }

    pub fn at_frame(agent: impl Into<AgentId>, x: f64, y: f64, z: f64, frame: u64) -> Self {
        Self::new(agent, x, y, z, ObservationTime::Frame(frame))
    }
}
