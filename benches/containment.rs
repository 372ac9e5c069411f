use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::{Point2, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trackgeom::containment::{
    containment_area_size, containment_volume_size, cylinder_size, BoundaryPolygon,
    BoundaryPrism,
};
use trackgeom::trajectory::Trajectory;

/// Random infinite tracks through the cube `[-1000, 1000]³`.
fn random_tracks(rng: &mut StdRng, n: usize) -> Vec<Trajectory> {
    (0..n)
        .map(|_| {
            let position = Point3::new(
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
            );
            let direction = Vector3::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
            );
            Trajectory::infinite(position, direction, 0.0)
        })
        .collect()
}

fn bench_area(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let polygon = BoundaryPolygon::regular(28, 600.0, Point2::origin()).unwrap();

    c.bench_function("containment/area_28gon", |b| {
        b.iter_batched(
            || random_tracks(&mut rng, 1_000),
            |tracks| {
                for t in &tracks {
                    black_box(containment_area_size(black_box(t), &polygon, 0.0));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_volume_vs_cylinder(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    let polygon = BoundaryPolygon::regular(28, 600.0, Point2::origin()).unwrap();
    let prism = BoundaryPrism::new(polygon, -500.0, 500.0).unwrap();

    c.bench_function("containment/volume_28gon", |b| {
        b.iter_batched(
            || random_tracks(&mut rng, 1_000),
            |tracks| {
                for t in &tracks {
                    black_box(containment_volume_size(black_box(t), &prism));
                }
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("containment/cylinder", |b| {
        b.iter_batched(
            || random_tracks(&mut rng, 1_000),
            |tracks| {
                for t in &tracks {
                    black_box(cylinder_size(black_box(t), 1000.0, 600.0, 0.0));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_area, bench_volume_vs_cylinder);
criterion_main!(benches);
