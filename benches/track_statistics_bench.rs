use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use motility_stats::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;

/// Gaussian random walk with `len` positions, 30 s apart
fn random_walk(agent: u64, len: usize, seed: u64) -> Track {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = Normal::new(0.0, 5.0).unwrap();
    let mut pos = [0.0f64; 3];
    let positions = (0..len)
        .map(|i| {
            for p in &mut pos {
                *p += step.sample(&mut rng);
            }
            Position::new(pos[0], pos[1], pos[2], i as f64 * 30.0)
        })
        .collect();
    Track::new(agent, positions).unwrap()
}

fn bench_track_derivations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Track");
    for &len in &[50, 200, 800] {
        let template = random_walk(0, len, 42);

        group.bench_with_input(BenchmarkId::new("speeds_and_turns", len), &template, |b, t| {
            b.iter(|| {
                // fresh clone so the cache starts empty
                let track = Track::new(t.agent().clone(), t.positions().to_vec()).unwrap();
                black_box(track.speeds().len() + track.turning_angles().len())
            })
        });

        group.bench_with_input(BenchmarkId::new("msd_curve", len), &template, |b, t| {
            b.iter(|| {
                let track = Track::new(t.agent().clone(), t.positions().to_vec()).unwrap();
                black_box(track.msd_curve().len())
            })
        });
    }
    group.finish();
}

fn bench_profile_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Profile");
    for &tracks in &[10u64, 100, 500] {
        let profile = Profile::new(
            "bench",
            (0..tracks).map(|i| random_walk(i, 60, i)).collect(),
            TimeStep::explicit(30.0).unwrap(),
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::new("pooled_speed", tracks), &profile, |b, p| {
            b.iter(|| p.aggregate(black_box(Statistic::Speed), AggregationPolicy::Pooled))
        });

        group.bench_with_input(BenchmarkId::new("population_msd", tracks), &profile, |b, p| {
            b.iter(|| msd(&[p], MsdCutoff::default()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_track_derivations, bench_profile_aggregation);
criterion_main!(benches);
