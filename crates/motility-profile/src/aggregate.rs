//! Population summaries of one statistic

use crate::statistic::{AggregationPolicy, Contribution, Statistic, TimeWindow};
use motility_core::{AgentId, Error, Result, Summary};
use serde::Serialize;

/// One statistic pooled over the tracks of a profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub statistic: Statistic,
    pub policy: AggregationPolicy,
    /// Every pooled sample, in track order
    pub values: Vec<f64>,
    pub summary: Summary,
    pub total_tracks: usize,
    pub contributing_tracks: usize,
    /// Tracks that contributed nothing
    pub excluded: Vec<AgentId>,
    /// Undefined per-step values skipped across all tracks
    pub missing_values: usize,
    pub window: Option<TimeWindow>,
}

impl Aggregate {
    /// Assemble an aggregate from per-track contributions
    ///
    /// `contributions` pairs every track of the profile with what it
    /// contributed, `None` meaning the track had no usable data at all.
    pub(crate) fn collect(
        statistic: Statistic,
        policy: AggregationPolicy,
        window: Option<TimeWindow>,
        contributions: Vec<(AgentId, Option<Contribution>)>,
    ) -> Result<Self> {
        let total_tracks = contributions.len();
        let mut values = Vec::new();
        let mut excluded = Vec::new();
        let mut missing_values = 0;

        for (agent, contribution) in contributions {
            match contribution {
                Some(c) if !c.values.is_empty() => {
                    missing_values += c.missing;
                    values.extend(c.values);
                }
                Some(c) => {
                    missing_values += c.missing;
                    excluded.push(agent);
                }
                None => excluded.push(agent),
            }
        }

        let contributing_tracks = total_tracks - excluded.len();
        if contributing_tracks == 0 {
            return Err(Error::insufficient(
                statistic.name(),
                format!("none of the {total_tracks} tracks contributed a value"),
            ));
        }
        let summary = Summary::from_values(&statistic.name(), &values)?;

        Ok(Self {
            statistic,
            policy,
            values,
            summary,
            total_tracks,
            contributing_tracks,
            excluded,
            missing_values,
            window,
        })
    }

    pub fn sample_size(&self) -> usize {
        self.values.len()
    }

    pub fn excluded_tracks(&self) -> usize {
        self.excluded.len()
    }
}
