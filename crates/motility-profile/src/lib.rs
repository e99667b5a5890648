//! Population statistics over the tracks of one experimental condition
//!
//! A [`Profile`] is a labelled set of tracks sampled at a common
//! [`TimeStep`]. It answers population questions about one condition:
//!
//! - **Aggregation**: pool a [`Statistic`] over all tracks, either per step
//!   ([`AggregationPolicy::Pooled`]) or one reduced value per track
//!   ([`AggregationPolicy::PerTrack`]), optionally restricted to a
//!   [`TimeWindow`]. Tracks with nothing to contribute are excluded and
//!   counted, never filled with sentinel values.
//! - **Construction from records**: group [`Observation`]s into tracks,
//!   apply a [`TrackFilter`], and keep an account of every rejected agent.
//! - **Population MSD**: pool squared displacements over several profiles and
//!   fit the diffusion exponent ([`msd`]).
//! - **Data quality**: [`Profile::entries`], [`Profile::teleports`] and
//!   [`Profile::duplicate_positions`].
//!
//! # Example
//!
//! ```rust
//! use motility_profile::{
//!     AggregationPolicy, Observation, Profile, Reducer, Statistic, TimeStep, TrackFilter,
//! };
//!
//! let records = vec![
//!     Observation::at_frame("A", 0.0, 0.0, 0.0, 0),
//!     Observation::at_frame("A", 30.0, 0.0, 0.0, 1),
//!     Observation::at_frame("A", 30.0, 30.0, 0.0, 2),
//!     Observation::at_frame("B", 0.0, 0.0, 0.0, 0),
//!     Observation::at_frame("B", 0.0, 60.0, 0.0, 1),
//! ];
//! let profile = Profile::from_records(
//!     "control",
//!     records,
//!     TimeStep::from_metadata(30.0).unwrap(),
//!     &TrackFilter::default(),
//! )
//! .unwrap();
//!
//! let median_speeds = profile
//!     .aggregate(Statistic::Speed, AggregationPolicy::PerTrack(Reducer::Median))
//!     .unwrap();
//! assert_eq!(median_speeds.values, vec![1.0, 2.0]);
//! ```

mod aggregate;
mod filter;
mod msd;
mod profile;
mod quality;
mod record;
mod statistic;
mod time_step;

pub use aggregate::Aggregate;
pub use filter::{ArrestCriterion, FilterReason, TrackFilter};
pub use msd::{
    msd, msd_slope_by_cutoff, pooled_displacement_autocorrelation, pooled_lag_displacements,
    population_msd_curve, AutocorrelationSample, LagSample, MsdCutoff, MsdFit, SlopeAtCutoff,
};
pub use profile::{Profile, RejectedAgent, Rejection};
pub use quality::{Bounds, DuplicatePosition, EntryReport, Teleport, TeleportKind};
pub use record::{Observation, ObservationTime};
pub use statistic::{AggregationPolicy, Contribution, Reducer, Statistic, TimeWindow};
pub use time_step::{TimeStep, TimeStepSource};
