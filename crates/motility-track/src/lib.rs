//! Per-agent trajectories
//!
//! This crate turns raw position sequences into kinematic descriptors:
//!
//! - **Speeds**: displacement magnitude over elapsed time, one per step
//! - **Turning angles**: angle between consecutive displacements, missing
//!   where a step has zero length
//! - **Mean squared displacement**: squared distance averaged over all position
//!   pairs at a given time lag
//! - **Path length / net displacement / meandering index**
//! - **Displacement autocorrelation** (Banigan et al. 2015)
//!
//! Tracks are immutable. Derived series are computed once per track instance
//! and cached; alternate interpretations such as a time window or a coarser
//! sampling produce new tracks.
//!
//! # Example
//!
//! ```rust
//! use motility_track::{Position, Track};
//!
//! let track = Track::new(
//!     "cell-1",
//!     vec![
//!         Position::new(0.0, 0.0, 0.0, 0.0),
//!         Position::new(3.0, 4.0, 0.0, 30.0),
//!         Position::new(3.0, 4.0, 12.0, 60.0),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(track.path_length(), 17.0);
//! assert_eq!(track.net_displacement(), 13.0);
//! assert!(track.net_displacement() <= track.path_length());
//! ```

pub mod geometry;
pub mod position;
pub mod track;
pub mod turn;

pub use geometry::{Axis, Vector3};
pub use position::Position;
pub use track::{lag_key, AutocorrelationPoint, MsdPoint, Track, LAG_RESOLUTION};
pub use turn::TurnConvention;
