mod common;

use approx::assert_relative_eq;
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use trackgeom::calculator::{
    cherenkov_cone, closest_approach, default_sensor_axis, is_on_track, time_residual,
    OpticalConstants,
};
use trackgeom::constants::ON_TRACK_TOLERANCE;
use trackgeom::trajectory::{is_null, Trajectory, TrajectoryShape};

use crate::common::{assert_point_close, random_point, random_track};

const SHAPES: [TrajectoryShape; 4] = [
    TrajectoryShape::InfiniteTrack,
    TrajectoryShape::StartingTrack,
    TrajectoryShape::StoppingTrack,
    TrajectoryShape::ContainedTrack,
];

#[test]
fn bounded_distance_never_below_unbounded() {
    let mut rng = StdRng::seed_from_u64(42_u64);

    for _ in 0..500 {
        for shape in SHAPES {
            let track = random_track(&mut rng, shape, 500.0);
            let p = random_point(&mut rng, 500.0);
            let ca = closest_approach(&track, &p);

            if shape == TrajectoryShape::InfiniteTrack {
                assert_eq!(ca.bounded_distance, ca.unbounded_distance);
                assert_point_close(&ca.bounded_position, &ca.unbounded_position, 1e-12);
            } else {
                assert!(ca.bounded_distance >= ca.unbounded_distance - 1e-9);
            }
            assert!(is_on_track(&track, &ca.bounded_position, ON_TRACK_TOLERANCE));
        }
    }
}

#[test]
fn residual_of_unscattered_light_is_zero() {
    let mut rng = StdRng::seed_from_u64(7_u64);
    let optics = OpticalConstants::default();

    for _ in 0..200 {
        let track = random_track(&mut rng, TrajectoryShape::InfiniteTrack, 300.0);
        let sensor = random_point(&mut rng, 300.0);
        let cone = cherenkov_cone(&track, &sensor, &optics, &default_sensor_axis());
        assert!(cone.is_valid());

        let residual = time_residual(&track, &sensor, track.time + cone.time, &optics);
        assert_relative_eq!(residual, 0.0, epsilon = 1e-9);

        // the photon path closes the triangle with the emission point
        assert_relative_eq!(
            (sensor - cone.emission_position).norm(),
            cone.distance,
            epsilon = 1e-8
        );
        // the emission point is on the track
        assert!(is_on_track(&track, &cone.emission_position, 1e-6));
    }
}

#[test]
fn invalid_cone_is_all_nan() {
    let mut rng = StdRng::seed_from_u64(1234_u64);
    let optics = OpticalConstants::default();
    let mut invalid = 0;

    for _ in 0..300 {
        let track = random_track(&mut rng, TrajectoryShape::ContainedTrack, 300.0);
        let sensor = random_point(&mut rng, 300.0);
        let cone = cherenkov_cone(&track, &sensor, &optics, &default_sensor_axis());
        if !cone.is_valid() {
            invalid += 1;
            assert!(is_null(&cone.emission_position));
            assert!(cone.time.is_nan());
            assert!(cone.distance.is_nan());
            assert!(cone.approach_angle.is_nan());
        }
    }
    assert!(invalid > 0);
}

#[test]
fn point_like_has_no_closest_approach() {
    let vertex = Trajectory::point_like(Point3::new(1.0, 2.0, 3.0), 0.0);
    let ca = closest_approach(&vertex, &Point3::origin());
    assert!(is_null(&ca.bounded_position));
    assert!(is_null(&ca.unbounded_position));
    assert!(!is_on_track(&vertex, &Point3::new(1.0, 2.0, 3.0), 1.0));
}
