//! Property-based tests for track kinematics

use motility_track::{Track, TurnConvention, Vector3};
use proptest::prelude::*;
use std::f64::consts::PI;

/// Random walk with strictly increasing timestamps
fn arb_track() -> impl Strategy<Value = Track> {
    prop::collection::vec(
        (-50.0..50.0f64, -50.0..50.0f64, -50.0..50.0f64, 0.1..60.0f64),
        2..40,
    )
    .prop_map(|steps| {
        let mut t = 0.0;
        let points: Vec<_> = steps
            .into_iter()
            .map(|(x, y, z, dt)| {
                t += dt;
                (x, y, z, t)
            })
            .collect();
        Track::from_tuples("prop", &points).unwrap()
    })
}

proptest! {
    // Property: one non-negative speed per step
    #[test]
    fn prop_speed_count_and_sign(track in arb_track()) {
        prop_assert_eq!(track.speeds().len(), track.len() - 1);
        prop_assert!(track.speeds().iter().all(|&s| s >= 0.0 && s.is_finite()));
    }

    // Property: triangle inequality between net displacement and path length
    #[test]
    fn prop_net_displacement_bounded_by_path(track in arb_track()) {
        prop_assert!(track.net_displacement() <= track.path_length() + 1e-9);
    }

    // Property: unsigned turns lie in [0, π], signed turns in [-π, π]
    #[test]
    fn prop_turning_angle_range(track in arb_track()) {
        prop_assert_eq!(track.turning_angles().len(), track.len().saturating_sub(2));
        for angle in track.turning_angles().iter().flatten() {
            prop_assert!((0.0..=PI).contains(angle));
        }

        let signed = track.with_turn_convention(TurnConvention::Signed {
            reference: Vector3::new(0.0, 0.0, 1.0),
        });
        for angle in signed.turning_angles().iter().flatten() {
            prop_assert!((-PI..=PI).contains(angle));
        }
    }

    // Property: cached accessors return identical values
    #[test]
    fn prop_accessors_idempotent(track in arb_track()) {
        let speeds = track.speeds().to_vec();
        let turns = track.turning_angles().to_vec();
        let path = track.path_length();
        let curve = track.msd_curve().to_vec();

        prop_assert_eq!(speeds, track.speeds().to_vec());
        prop_assert_eq!(turns, track.turning_angles().to_vec());
        prop_assert_eq!(path.to_bits(), track.path_length().to_bits());
        prop_assert_eq!(curve, track.msd_curve().to_vec());
    }

    // Property: every cached MSD lag is retrievable and counts its pairs
    #[test]
    fn prop_msd_curve_lookup(track in arb_track()) {
        let total_pairs: usize = track.msd_curve().iter().map(|p| p.pairs).sum();
        prop_assert!(total_pairs <= track.len() * (track.len() - 1) / 2);
        for point in track.msd_curve() {
            let msd = track.mean_squared_displacement(point.lag).unwrap();
            prop_assert_eq!(msd, point.msd);
            prop_assert!(msd >= 0.0);
        }
    }
}

#[test]
fn straight_line_has_equal_net_and_path() {
    let points: Vec<_> = (0..10)
        .map(|i| (i as f64 * 2.0, i as f64, -(i as f64), i as f64))
        .collect();
    let track = Track::from_tuples("line", &points).unwrap();
    assert!((track.net_displacement() - track.path_length()).abs() < 1e-9);
    assert!((track.meandering_index().unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn bent_path_is_strictly_longer() {
    let track = Track::from_tuples(
        "bent",
        &[(0.0, 0.0, 0.0, 0.0), (1.0, 0.0, 0.0, 1.0), (1.0, 1.0, 0.0, 2.0)],
    )
    .unwrap();
    assert!(track.net_displacement() < track.path_length());
}
