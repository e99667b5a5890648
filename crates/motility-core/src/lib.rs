//! Core types for motility analysis
//!
//! This crate provides the pieces every other motility-stats crate builds on:
//!
//! - [`Error`] / [`Result`]: the error taxonomy for tracks, profiles and contrasts
//! - [`AgentId`]: identifier of a tracked agent
//! - [`Summary`]: location and spread of a sample
//! - [`utils`]: small descriptive-statistics helpers over `f64` slices
//!
//! # Example
//!
//! ```rust
//! use motility_core::Summary;
//!
//! let speeds = [1.0, 2.0, 3.0, 4.0];
//! let summary = Summary::from_values("speed", &speeds).unwrap();
//! assert_eq!(summary.n, 4);
//! assert_eq!(summary.median, 2.5);
//! ```

pub mod agent;
pub mod error;
pub mod summary;
pub mod utils;

pub use agent::AgentId;
pub use error::{Error, Result};
pub use summary::Summary;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
