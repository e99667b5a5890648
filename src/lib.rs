//! Kinematic statistics and cross-condition comparison for tracked agents
//!
//! This crate re-exports the motility-stats workspace:
//!
//! - [`motility_core`]: errors, agent identifiers and descriptive summaries
//! - [`motility_track`]: per-agent trajectories (speeds, turns, MSD, ...)
//! - [`motility_profile`]: population aggregation, MSD fits and data-quality reports
//! - [`motility_contrast`]: hypothesis tests and effect sizes between profiles
//!
//! # Example
//!
//! ```rust
//! use motility_stats::prelude::*;
//!
//! let step = TimeStep::explicit(1.0).unwrap();
//! let a = Track::from_tuples(
//!     "A",
//!     &[(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 0.0, 1.0), (1.0, 1.0, 0.0, 2.0)],
//! )
//! .unwrap();
//! let b = Track::from_tuples("B", &[(0.0, 0.0, 0.0, 0.0), (0.0, 0.0, 1.0, 1.0)]).unwrap();
//!
//! let first = Profile::new("first", vec![a], step).unwrap();
//! let second = Profile::new("second", vec![b], step).unwrap();
//! let result = ProfileContrast::new(vec![(&first, "first"), (&second, "second")])
//!     .unwrap()
//!     .compare(Statistic::Speed, &ContrastConfig::default())
//!     .unwrap();
//!
//! assert_eq!(result.profiles[0].sample_size, 2);
//! assert_eq!(result.profiles[1].sample_size, 1);
//! ```

pub use motility_contrast;
pub use motility_core;
pub use motility_profile;
pub use motility_track;

pub use motility_core::{AgentId, Error, Result, Summary};

/// Commonly used types
pub mod prelude {
    pub use motility_contrast::{
        BootstrapConfig, ContrastConfig, ContrastResult, Correction, ProfileContrast, TestKind,
    };
    pub use motility_core::{AgentId, Error, Result, Summary};
    pub use motility_profile::{
        msd, AggregationPolicy, MsdCutoff, Observation, Profile, Reducer, Statistic, TimeStep,
        TimeWindow, TrackFilter,
    };
    pub use motility_track::{Position, Track, TurnConvention};
}
