//! A labelled population of tracks

use crate::aggregate::Aggregate;
use crate::filter::{FilterReason, TrackFilter};
use crate::record::Observation;
use crate::statistic::{AggregationPolicy, Statistic, TimeWindow};
use crate::time_step::TimeStep;
use motility_core::{AgentId, Error, Result};
use motility_track::{Position, Track, TurnConvention};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Why an agent from the input did not become part of a profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Rejection {
    /// Its observations do not form a valid track
    Invalid(String),
    /// It failed a [`TrackFilter`] criterion
    Filtered(FilterReason),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(reason) => write!(f, "invalid track: {reason}"),
            Self::Filtered(reason) => write!(f, "filtered: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedAgent {
    pub agent: AgentId,
    pub rejection: Rejection,
}

/// The tracks of one experimental condition, sampled at a common time step
///
/// # Examples
///
/// ```rust
/// use motility_profile::{AggregationPolicy, Profile, Statistic, TimeStep};
/// use motility_track::Track;
///
/// let a = Track::from_tuples(
///     "A",
///     &[(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 0.0, 1.0), (1.0, 1.0, 0.0, 2.0)],
/// )
/// .unwrap();
/// let b = Track::from_tuples("B", &[(0.0, 0.0, 0.0, 0.0), (0.0, 0.0, 1.0, 1.0)]).unwrap();
///
/// let profile = Profile::new("control", vec![a, b], TimeStep::explicit(1.0).unwrap()).unwrap();
/// let speeds = profile
///     .aggregate(Statistic::Speed, AggregationPolicy::Pooled)
///     .unwrap();
/// assert_eq!(speeds.values, vec![1.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Profile {
    label: String,
    tracks: Vec<Track>,
    time_step: TimeStep,
    rejected: Vec<RejectedAgent>,
}

impl Profile {
    /// Build a profile from already-constructed tracks
    pub fn new(label: impl Into<String>, tracks: Vec<Track>, time_step: TimeStep) -> Result<Self> {
        let label = label.into();
        if tracks.is_empty() {
            return Err(Error::EmptyProfile { label });
        }
        Ok(Self {
            label,
            tracks,
            time_step,
            rejected: Vec::new(),
        })
    }

    /// Build a profile keeping only the tracks that pass `filter`
    pub fn filtered(
        label: impl Into<String>,
        tracks: Vec<Track>,
        time_step: TimeStep,
        filter: &TrackFilter,
    ) -> Result<Self> {
        let label = label.into();
        let (kept, rejected) = apply_filter(&label, tracks, filter);
        let mut profile = Self::new(label, kept, time_step)?;
        profile.rejected = rejected;
        Ok(profile)
    }

    /// Build a profile from raw observation records
    ///
    /// Records are grouped per agent in order of first appearance and sorted
    /// by time within each agent. Frame-indexed times are converted with
    /// `time_step`. Agents whose observations do not form a valid track are
    /// not fatal: they are logged and listed by [`Profile::rejected`] along
    /// with agents removed by `filter`.
    #[instrument(skip(label, records, filter), fields(label = %label.as_ref(), time_step = time_step.seconds))]
    pub fn from_records<I>(
        label: impl AsRef<str>,
        records: I,
        time_step: TimeStep,
        filter: &TrackFilter,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        let label = label.as_ref().to_string();
        let mut order: Vec<AgentId> = Vec::new();
        let mut grouped: HashMap<AgentId, Vec<Position>> = HashMap::new();
        for record in records {
            let t = record.time.to_seconds(time_step.seconds);
            let position = Position::new(record.x, record.y, record.z, t);
            grouped
                .entry(record.agent.clone())
                .or_insert_with(|| {
                    order.push(record.agent);
                    Vec::new()
                })
                .push(position);
        }
        debug!("Grouped records into {} agents", order.len());

        let mut tracks = Vec::with_capacity(order.len());
        let mut rejected = Vec::new();
        for agent in order {
            let mut positions = grouped.remove(&agent).unwrap_or_default();
            positions.sort_by(|a, b| a.t.total_cmp(&b.t));
            match Track::new(agent.clone(), positions) {
                Ok(track) => tracks.push(track),
                Err(e) => {
                    warn!("Rejecting agent {agent}: {e}");
                    rejected.push(RejectedAgent {
                        agent,
                        rejection: Rejection::Invalid(e.to_string()),
                    });
                }
            }
        }

        let (kept, filtered) = apply_filter(&label, tracks, filter);
        rejected.extend(filtered);
        let mut profile = Self::new(label, kept, time_step)?;
        profile.rejected = rejected;
        Ok(profile)
    }

    /// Pool replicate profiles of one condition into a single profile
    ///
    /// Agent ids are qualified with their replicate's label (`rep1/7`) so
    /// agents numbered independently per replicate stay distinct. Every
    /// replicate must share the first one's time step.
    pub fn merge(label: impl Into<String>, replicates: &[&Profile]) -> Result<Self> {
        let label = label.into();
        let Some(first) = replicates.first() else {
            return Err(Error::InvalidParameter(format!(
                "no replicates to merge into '{label}'"
            )));
        };
        if let Some(other) = replicates
            .iter()
            .find(|p| !p.time_step.matches(&first.time_step))
        {
            return Err(Error::IncompatibleProfiles {
                first: first.label.clone(),
                first_step: first.time_step.seconds,
                second: other.label.clone(),
                second_step: other.time_step.seconds,
            });
        }

        let qualify = |replicate: &Profile, agent: &AgentId| {
            AgentId::new(format!("{}/{}", replicate.label, agent))
        };
        let mut tracks = Vec::with_capacity(replicates.iter().map(|p| p.len()).sum());
        let mut rejected = Vec::new();
        for replicate in replicates {
            for track in &replicate.tracks {
                let relabelled =
                    Track::new(qualify(replicate, track.agent()), track.positions().to_vec())?;
                tracks.push(relabelled.with_turn_convention(track.turn_convention()));
            }
            rejected.extend(replicate.rejected.iter().map(|r| RejectedAgent {
                agent: qualify(replicate, &r.agent),
                rejection: r.rejection.clone(),
            }));
        }
        info!(
            "Merged {} replicates into '{label}': {} tracks",
            replicates.len(),
            tracks.len()
        );

        let mut profile = Self::new(label, tracks, first.time_step)?;
        profile.rejected = rejected;
        Ok(profile)
    }

    /// Apply a turning-angle convention to every track
    pub fn with_turn_convention(mut self, convention: TurnConvention) -> Self {
        self.tracks = self
            .tracks
            .into_iter()
            .map(|t| t.with_turn_convention(convention))
            .collect();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, agent: &AgentId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.agent() == agent)
    }

    pub fn time_step(&self) -> TimeStep {
        self.time_step
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; a profile holds at least one track
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Agents dropped while building this profile
    pub fn rejected(&self) -> &[RejectedAgent] {
        &self.rejected
    }

    /// Pool `statistic` over every track
    #[instrument(skip(self), fields(profile = %self.label))]
    pub fn aggregate(&self, statistic: Statistic, policy: AggregationPolicy) -> Result<Aggregate> {
        statistic.validate()?;
        let contributions = self.map_tracks(|track| {
            (
                track.agent().clone(),
                Some(statistic.contribution(track, policy)),
            )
        });
        let aggregate = Aggregate::collect(statistic, policy, None, contributions)?;
        debug!(
            "{} values from {}/{} tracks",
            aggregate.sample_size(),
            aggregate.contributing_tracks,
            aggregate.total_tracks
        );
        Ok(aggregate)
    }

    /// Pool `statistic` over the part of each track inside `window`
    ///
    /// Tracks with fewer than two positions in the window are excluded.
    #[instrument(skip(self), fields(profile = %self.label))]
    pub fn aggregate_in_window(
        &self,
        statistic: Statistic,
        policy: AggregationPolicy,
        window: TimeWindow,
    ) -> Result<Aggregate> {
        statistic.validate()?;
        let contributions = self.map_tracks(|track| {
            let contribution = track
                .window(window.start, window.end)
                .ok()
                .map(|view| statistic.contribution(&view, policy));
            (track.agent().clone(), contribution)
        });
        Aggregate::collect(statistic, policy, Some(window), contributions)
    }

    #[cfg(feature = "parallel")]
    fn map_tracks<T, F>(&self, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&Track) -> T + Sync + Send,
    {
        use rayon::prelude::*;
        self.tracks.par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn map_tracks<T, F>(&self, f: F) -> Vec<T>
    where
        F: Fn(&Track) -> T,
    {
        self.tracks.iter().map(f).collect()
    }
}

fn apply_filter(
    label: &str,
    tracks: Vec<Track>,
    filter: &TrackFilter,
) -> (Vec<Track>, Vec<RejectedAgent>) {
    if !filter.is_active() {
        return (tracks, Vec::new());
    }
    let before = tracks.len();
    let mut kept = Vec::with_capacity(before);
    let mut rejected = Vec::new();
    for track in tracks {
        match filter.check(&track) {
            None => kept.push(track),
            Some(reason) => {
                debug!("Filtering agent {}: {reason}", track.agent());
                rejected.push(RejectedAgent {
                    agent: track.agent().clone(),
                    rejection: Rejection::Filtered(reason),
                });
            }
        }
    }
    info!(
        "Profile '{label}': excluded {} of {before} tracks by filter",
        rejected.len()
    );
    (kept, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ObservationTime;
    use crate::statistic::Reducer;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::SQRT_2;

    fn step() -> TimeStep {
        TimeStep::explicit(1.0).unwrap()
    }

    fn track_a() -> Track {
        Track::from_tuples(
            "A",
            &[(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 0.0, 1.0), (1.0, 1.0, 0.0, 2.0)],
        )
        .unwrap()
    }

    fn track_b() -> Track {
        Track::from_tuples("B", &[(0.0, 0.0, 0.0, 0.0), (0.0, 0.0, 1.0, 1.0)]).unwrap()
    }

    fn profile() -> Profile {
        Profile::new("P", vec![track_a(), track_b()], step()).unwrap()
    }

    #[test]
    fn test_empty_profile_fails() {
        let err = Profile::new("empty", vec![], step()).unwrap_err();
        assert_eq!(
            err,
            Error::EmptyProfile {
                label: "empty".to_string()
            }
        );
    }

    #[test]
    fn test_pooled_speed() {
        let agg = profile()
            .aggregate(Statistic::Speed, AggregationPolicy::Pooled)
            .unwrap();
        assert_eq!(agg.values, vec![1.0, 1.0, 1.0]);
        assert_eq!(agg.summary.n, 3);
        assert_abs_diff_eq!(agg.summary.mean, 1.0);
        assert_eq!(agg.contributing_tracks, 2);
        assert_eq!(agg.excluded_tracks(), 0);
    }

    #[test]
    fn test_turning_angle_excludes_short_track() {
        let agg = profile()
            .aggregate(Statistic::TurningAngle, AggregationPolicy::Pooled)
            .unwrap();
        assert_eq!(agg.sample_size(), 1);
        assert_eq!(agg.excluded, vec![AgentId::from("B")]);
        assert_eq!(agg.total_tracks, agg.contributing_tracks + agg.excluded_tracks());
    }

    #[test]
    fn test_net_displacement_per_track() {
        let agg = profile()
            .aggregate(
                Statistic::NetDisplacement,
                AggregationPolicy::PerTrack(Reducer::Median),
            )
            .unwrap();
        assert_abs_diff_eq!(agg.values[0], SQRT_2, epsilon = 1e-12);
        assert_abs_diff_eq!(agg.values[1], 1.0);
    }

    #[test]
    fn test_invalid_msd_lag() {
        let err = profile()
            .aggregate(
                Statistic::MeanSquaredDisplacement { lag: -1.0 },
                AggregationPolicy::Pooled,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_msd_lag_beyond_every_track() {
        let err = profile()
            .aggregate(
                Statistic::MeanSquaredDisplacement { lag: 10.0 },
                AggregationPolicy::Pooled,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData { .. }));
    }

    #[test]
    fn test_aggregate_in_window() {
        let window = TimeWindow::new(1.0, 2.0).unwrap();
        let agg = profile()
            .aggregate_in_window(Statistic::Speed, AggregationPolicy::Pooled, window)
            .unwrap();
        // B has only its t=1 position inside the window
        assert_eq!(agg.values, vec![1.0]);
        assert_eq!(agg.excluded, vec![AgentId::from("B")]);
        assert_eq!(agg.window, Some(window));
    }

    #[test]
    fn test_from_records_groups_sorts_and_rejects() {
        let records = vec![
            Observation::at_frame("B", 0.0, 0.0, 1.0, 1),
            Observation::at_frame("A", 1.0, 0.0, 0.0, 1),
            Observation::at_frame("A", 0.0, 0.0, 0.0, 0),
            Observation::at_frame("B", 0.0, 0.0, 0.0, 0),
            Observation::at_frame("A", 1.0, 1.0, 0.0, 2),
            Observation::new("C", 0.0, 0.0, 0.0, ObservationTime::Seconds(0.0)),
        ];
        let profile = Profile::from_records(
            "records",
            records,
            TimeStep::from_metadata(30.0).unwrap(),
            &TrackFilter::default(),
        )
        .unwrap();

        let agents: Vec<&str> = profile.tracks().iter().map(|t| t.agent().as_str()).collect();
        assert_eq!(agents, vec!["B", "A"]);
        let a = profile.track(&AgentId::from("A")).unwrap();
        assert_eq!(a.positions()[2].t, 60.0);
        assert_eq!(a.speeds(), &[1.0 / 30.0, 1.0 / 30.0]);

        assert_eq!(profile.rejected().len(), 1);
        assert_eq!(profile.rejected()[0].agent, AgentId::from("C"));
        assert!(matches!(profile.rejected()[0].rejection, Rejection::Invalid(_)));
    }

    #[test]
    fn test_from_records_with_filter() {
        let records = vec![
            Observation::at_seconds("A", 0.0, 0.0, 0.0, 0.0),
            Observation::at_seconds("A", 5.0, 0.0, 0.0, 30.0),
            Observation::at_seconds("B", 0.0, 0.0, 0.0, 0.0),
            Observation::at_seconds("B", 0.5, 0.0, 0.0, 30.0),
        ];
        let filter = TrackFilter::new().with_min_net_displacement(1.0);
        let profile =
            Profile::from_records("f", records.clone(), TimeStep::explicit(30.0).unwrap(), &filter)
                .unwrap();
        assert_eq!(profile.len(), 1);
        assert!(matches!(
            profile.rejected()[0].rejection,
            Rejection::Filtered(FilterReason::NetDisplacement { .. })
        ));

        let strict = TrackFilter::new().with_min_net_displacement(100.0);
        let err = Profile::from_records("f", records, TimeStep::explicit(30.0).unwrap(), &strict)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyProfile { .. }));
    }

    #[test]
    fn test_filtered_records_rejections() {
        let filter = TrackFilter::new().with_min_observations(3);
        let profile = Profile::filtered("f", vec![track_a(), track_b()], step(), &filter).unwrap();
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.tracks()[0].agent(), &AgentId::from("A"));
        assert_eq!(
            profile.rejected(),
            &[RejectedAgent {
                agent: AgentId::from("B"),
                rejection: Rejection::Filtered(FilterReason::Observations {
                    count: 2,
                    threshold: 3
                }),
            }]
        );

        let unfiltered =
            Profile::filtered("u", vec![track_a(), track_b()], step(), &TrackFilter::default())
                .unwrap();
        assert_eq!(unfiltered.len(), 2);
        assert!(unfiltered.rejected().is_empty());
    }

    #[test]
    fn test_merge_pools_replicates() {
        let rep1 = Profile::new("rep1", vec![track_a(), track_b()], step()).unwrap();
        let rep2 = Profile::filtered(
            "rep2",
            vec![track_a(), track_b()],
            step(),
            &TrackFilter::new().with_min_observations(3),
        )
        .unwrap();
        let merged = Profile::merge("condition", &[&rep1, &rep2]).unwrap();

        assert_eq!(merged.label(), "condition");
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.time_step(), step());
        let ids: Vec<&str> = merged.tracks().iter().map(|t| t.agent().as_str()).collect();
        assert_eq!(ids, vec!["rep1/A", "rep1/B", "rep2/A"]);
        assert_eq!(merged.rejected()[0].agent, AgentId::from("rep2/B"));

        let speeds = merged
            .aggregate(Statistic::Speed, AggregationPolicy::Pooled)
            .unwrap();
        assert_eq!(speeds.values, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_merge_refuses_mixed_time_steps() {
        let thirty = Profile::new("thirty", vec![track_a()], TimeStep::explicit(30.0).unwrap())
            .unwrap();
        let fifty = Profile::new("fifty", vec![track_b()], TimeStep::explicit(50.0).unwrap())
            .unwrap();
        let err = Profile::merge("mixed", &[&thirty, &fifty]).unwrap_err();
        assert_eq!(
            err,
            Error::IncompatibleProfiles {
                first: "thirty".to_string(),
                first_step: 30.0,
                second: "fifty".to_string(),
                second_step: 50.0,
            }
        );
        assert!(matches!(
            Profile::merge("none", &[]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_turn_convention_propagates() {
        let convention = TurnConvention::Signed {
            reference: motility_track::Vector3::new(0.0, 0.0, 1.0),
        };
        let profile = profile().with_turn_convention(convention);
        let agg = profile
            .aggregate(Statistic::TurningAngle, AggregationPolicy::Pooled)
            .unwrap();
        assert_abs_diff_eq!(agg.values[0], std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }
}
