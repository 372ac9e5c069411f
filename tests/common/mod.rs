#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::Rng;
use trackgeom::calculator::{cherenkov_time, closest_approach_distance, OpticalConstants};
use trackgeom::constants::{Hit, HitSeriesMap, SensorKey, SensorMap, DPI};
use trackgeom::trajectory::{Trajectory, TrajectoryShape};

pub fn assert_point_close(actual: &Point3<f64>, expected: &Point3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}

/// Uniform direction on the unit sphere.
pub fn random_direction(rng: &mut StdRng) -> Vector3<f64> {
    let cos_zen: f64 = rng.random_range(-1.0..=1.0);
    let azi = rng.random::<f64>() * DPI;
    let sin_zen = (1.0 - cos_zen * cos_zen).sqrt();
    Vector3::new(sin_zen * azi.cos(), sin_zen * azi.sin(), cos_zen)
}

/// Uniform point in the cube `[-half, half]³`.
pub fn random_point(rng: &mut StdRng, half: f64) -> Point3<f64> {
    Point3::new(
        rng.random_range(-half..=half),
        rng.random_range(-half..=half),
        rng.random_range(-half..=half),
    )
}

/// A track of the given shape with a random vertex and direction.
pub fn random_track(rng: &mut StdRng, shape: TrajectoryShape, half: f64) -> Trajectory {
    let length = rng.random_range(0.0..=2.0 * half);
    Trajectory::new(
        random_point(rng, half),
        random_direction(rng),
        rng.random_range(-1000.0..=1000.0),
        length,
        shape,
    )
}

/// Square grid of `n × n` strings spaced by `spacing`, centered on the origin, with
/// `modules` sensors per string evenly spaced between -500 and 500 m.
///
/// String ids run row by row from 1.
pub fn grid_detector(n: usize, spacing: f64, modules: u32) -> SensorMap {
    let mut sensors = SensorMap::default();
    let offset = 0.5 * spacing * (n as f64 - 1.0);
    for row in 0..n {
        for col in 0..n {
            let string = (row * n + col + 1) as i32;
            let x = col as f64 * spacing - offset;
            let y = row as f64 * spacing - offset;
            for m in 0..modules {
                let z = 500.0 - 1000.0 * m as f64 / (modules - 1).max(1) as f64;
                sensors.insert(SensorKey::new(string, m + 1), Point3::new(x, y, z));
            }
        }
    }
    sensors
}

/// One unit-charge hit per sensor within `radius` of the track (of the vertex for a
/// point-like trajectory), arriving with the unscattered light plus `delay(key)`.
pub fn simulate_hits(
    track: &Trajectory,
    sensors: &SensorMap,
    radius: f64,
    optics: &OpticalConstants,
    delay: impl Fn(&SensorKey) -> f64,
) -> HitSeriesMap {
    let mut hits = HitSeriesMap::new();
    for (key, position) in sensors {
        let expected = cherenkov_time(track, position, optics);
        let distance = if track.shape.is_track() {
            closest_approach_distance(track, position)
        } else {
            (position - track.position).norm()
        };
        if expected.is_finite() && distance <= radius {
            hits.entry(*key)
                .or_default()
                .push(Hit::new(track.time + expected + delay(key), 1.0));
        }
    }
    hits
}
