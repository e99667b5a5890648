//! Data-quality reports for tracking output
//!
//! Tracking software sometimes loses an agent mid-volume and resumes it as a
//! new track, or records the same object twice. These reports surface such
//! artefacts; they never alter the profile.

use crate::profile::Profile;
use motility_core::{AgentId, Error, Result};
use motility_track::{lag_key, Axis, Position, Track, Vector3};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Which tracks were present from the first observed time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    /// Earliest time observed in any track
    pub first_time: f64,
    pub present_at_start: Vec<AgentId>,
    /// Tracks that begin later, with their start time
    pub entered_later: Vec<(AgentId, f64)>,
}

/// Whether a track appeared or vanished away from the volume boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TeleportKind {
    Appeared,
    Vanished,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Teleport {
    pub agent: AgentId,
    pub kind: TeleportKind,
    pub position: Position,
}

/// Axis-aligned box enclosing every observed position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Vector3,
    pub max: Vector3,
}

impl Bounds {
    fn of<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        positions.into_iter().fold(None, |bounds, p| {
            let loc = p.location();
            Some(match bounds {
                None => Bounds { min: loc, max: loc },
                Some(b) => Bounds {
                    min: Vector3::new(b.min.x.min(loc.x), b.min.y.min(loc.y), b.min.z.min(loc.z)),
                    max: Vector3::new(b.max.x.max(loc.x), b.max.y.max(loc.y), b.max.z.max(loc.z)),
                },
            })
        })
    }

    /// Shrink each side inwards by `margin` times the extent along that axis
    pub fn shrink(&self, margin: f64) -> Self {
        let extent = self.max - self.min;
        let inset = Vector3::new(extent.x * margin, extent.y * margin, extent.z * margin);
        Bounds {
            min: self.min + inset,
            max: self.max - inset,
        }
    }

    pub fn contains(&self, point: Vector3) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let v = point.component(axis);
            v >= self.min.component(axis) && v <= self.max.component(axis)
        })
    }
}

/// A location recorded by more than one agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatePosition {
    pub location: Vector3,
    /// Every (agent, time) at which the location was recorded
    pub occurrences: Vec<(AgentId, f64)>,
}

impl Profile {
    fn all_positions(&self) -> impl Iterator<Item = &Position> {
        self.tracks().iter().flat_map(Track::positions)
    }

    /// Split tracks into those present at the first observed time and those
    /// that entered later
    pub fn entries(&self) -> EntryReport {
        let first_time = self
            .tracks()
            .iter()
            .map(Track::start_time)
            .fold(f64::INFINITY, f64::min);
        let first_key = lag_key(first_time);

        let mut present_at_start = Vec::new();
        let mut entered_later = Vec::new();
        for track in self.tracks() {
            if lag_key(track.start_time()) == first_key {
                present_at_start.push(track.agent().clone());
            } else {
                entered_later.push((track.agent().clone(), track.start_time()));
            }
        }
        debug!(
            "Profile '{}': {} tracks at start, {} entered later",
            self.label(),
            present_at_start.len(),
            entered_later.len()
        );
        EntryReport {
            first_time,
            present_at_start,
            entered_later,
        }
    }

    /// Tracks that start after the first time or end before the last time
    /// while inside the observed volume shrunk by `margin`
    ///
    /// `margin` is a fraction of the extent along each axis, in `[0, 0.5)`.
    /// Results are ordered by time.
    pub fn teleports(&self, margin: f64) -> Result<Vec<Teleport>> {
        if !(0.0..0.5).contains(&margin) {
            return Err(Error::InvalidParameter(format!(
                "teleport margin must be in [0, 0.5), got {margin}"
            )));
        }
        let Some(bounds) = Bounds::of(self.all_positions()) else {
            return Ok(Vec::new());
        };
        let inner = bounds.shrink(margin);
        let first_key = self.tracks().iter().map(|t| lag_key(t.start_time())).min();
        let last_key = self.tracks().iter().map(|t| lag_key(t.end_time())).max();

        let mut teleports = Vec::new();
        for track in self.tracks() {
            let start = *track.first();
            if Some(lag_key(start.t)) != first_key && inner.contains(start.location()) {
                teleports.push(Teleport {
                    agent: track.agent().clone(),
                    kind: TeleportKind::Appeared,
                    position: start,
                });
            }
            let end = *track.last();
            if Some(lag_key(end.t)) != last_key && inner.contains(end.location()) {
                teleports.push(Teleport {
                    agent: track.agent().clone(),
                    kind: TeleportKind::Vanished,
                    position: end,
                });
            }
        }
        teleports.sort_by(|a, b| a.position.t.total_cmp(&b.position.t));
        Ok(teleports)
    }

    /// Exact coordinates recorded by two or more different agents
    pub fn duplicate_positions(&self) -> Vec<DuplicatePosition> {
        let mut seen: HashMap<[u64; 3], Vec<(AgentId, f64)>> = HashMap::new();
        let mut order = Vec::new();
        for track in self.tracks() {
            for p in track.positions() {
                // normalise -0.0 so it matches 0.0
                let key = [p.x + 0.0, p.y + 0.0, p.z + 0.0].map(f64::to_bits);
                let occurrences = seen.entry(key).or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                });
                occurrences.push((track.agent().clone(), p.t));
            }
        }

        order
            .into_iter()
            .filter_map(|key| {
                let occurrences = seen.remove(&key)?;
                let first = &occurrences[0].0;
                if occurrences.iter().all(|(agent, _)| agent == first) {
                    return None;
                }
                Some(DuplicatePosition {
                    location: Vector3::new(
                        f64::from_bits(key[0]),
                        f64::from_bits(key[1]),
                        f64::from_bits(key[2]),
                    ),
                    occurrences,
                })
            })
            .collect()
    }
}
