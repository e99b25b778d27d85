use accident_hotspots::{bin_points, rank, CellStatistics, GridSpec, Point};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const POINTS: usize = 100_000;

// Roughly the continental US map box, with a dense cluster to rank against.
fn synthetic_points() -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..POINTS)
        .map(|i| {
            if i % 4 == 0 {
                Point::new(
                    rng.random_range(1.9e6..2.0e6),
                    rng.random_range(0.6e6..0.7e6),
                )
            } else {
                Point::new(rng.random_range(0.0..5.5e6), rng.random_range(0.0..3.2e6))
            }
        })
        .collect()
}

fn bench_hotspots(c: &mut Criterion) {
    let points = synthetic_points();
    let Ok(spec) = GridSpec::from_points(&points, 100) else {
        return;
    };

    c.bench_function("bin_points", |b| {
        b.iter(|| bin_points(black_box(&points), black_box(&spec)))
    });

    c.bench_function("bin_and_rank", |b| {
        b.iter(|| {
            let counts = bin_points(black_box(&points), &spec).ok()?;
            let statistics = CellStatistics::from_counts(&counts).ok()?;
            let top = rank(&counts, 10).ok()?;
            Some((statistics, top))
        })
    });
}

criterion_group!(benches, bench_hotspots);
criterion_main!(benches);
