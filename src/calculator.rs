//! # Closest-approach and light-cone geometry
//!
//! Relations between a [`Trajectory`] and a point in space (typically a sensor):
//!
//! * [`closest_approach`] – nearest point of the line, and of the physical part of the track.
//! * [`cherenkov_cone`] – point of the track from which Cherenkov light reaches the sensor,
//!   together with the travel time, the photon path length and the arrival angle.
//! * [`time_residual`] – measured minus expected arrival time of a hit.
//! * [`is_on_track`] – whether a point lies on the physical part of a track.
//!
//! ## Geometry
//!
//! ```text
//!              sensor P
//!               /|
//!          d   / | ρ
//!             /θc|
//!  ----------E---A---------->  direction
//!            s_e  s
//! ```
//!
//! With `s = (P − x)·u` the along-track parameter of the closest approach `A`, `ρ` the
//! perpendicular distance and `θc = acos(1/n_phase)` the Cherenkov angle, the emission point
//! `E` sits at `s_e = s − ρ / tan θc` and the photon travels `d = ρ / sin θc`. The expected
//! delay after the reference time is `(s_e + n_group · d) / c`.
//!
//! Every "no such geometric relation" outcome is reported as NaN (scalars) or as the
//! all-NaN [`null_point`](crate::trajectory::null_point); none of these functions fail.
use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Meter, Nanosecond, Radian, C_VACUUM, N_ICE_GROUP, N_ICE_PHASE},
    trajectory::{null_point, Trajectory},
};

/// Refractive indices of the propagation medium.
///
/// * `phase_index` sets the Cherenkov angle `acos(1 / phase_index)`.
/// * `group_index` sets the photon propagation speed `c / group_index`.
///
/// The default is deep glacial ice at 400 nm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticalConstants {
    pub group_index: f64,
    pub phase_index: f64,
}

impl Default for OpticalConstants {
    fn default() -> Self {
        OpticalConstants {
            group_index: N_ICE_GROUP,
            phase_index: N_ICE_PHASE,
        }
    }
}

impl OpticalConstants {
    pub fn new(group_index: f64, phase_index: f64) -> Self {
        OpticalConstants {
            group_index,
            phase_index,
        }
    }

    /// Cherenkov angle in radians; NaN below the Cherenkov threshold (`phase_index < 1`).
    pub fn cherenkov_angle(&self) -> Radian {
        (1.0 / self.phase_index).acos()
    }

    /// Speed of the light front in the medium (m/ns).
    pub fn group_speed(&self) -> f64 {
        C_VACUUM / self.group_index
    }
}

/// Axis of a sensor looking straight down, the usual deployment.
pub fn default_sensor_axis() -> Unit<Vector3<f64>> {
    Unit::new_unchecked(-Vector3::z())
}

/// Result of [`closest_approach`].
///
/// The `unbounded_*` fields treat the trajectory as an infinite line, the `bounded_*`
/// fields restrict it to the physical part given by its shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    pub unbounded_position: Point3<f64>,
    pub unbounded_distance: Meter,
    pub bounded_position: Point3<f64>,
    pub bounded_distance: Meter,
    /// Signed along-track parameter of the unbounded closest approach.
    pub along: Meter,
}

impl ClosestApproach {
    fn undefined() -> Self {
        ClosestApproach {
            unbounded_position: null_point(),
            unbounded_distance: f64::NAN,
            bounded_position: null_point(),
            bounded_distance: f64::NAN,
            along: f64::NAN,
        }
    }
}

/// Closest approach of a trajectory to a point.
///
/// Arguments
/// ---------
/// * `trajectory`: the track; a point-like trajectory has no line and gives NaN.
/// * `point`: the query point.
///
/// Return
/// ------
/// * A [`ClosestApproach`]. For the bounded result the along-track parameter is clamped:
///   a starting track snaps to its start point when `s < 0`, a stopping track to its stop
///   point beyond the stop, a contained track on both sides.
pub fn closest_approach(trajectory: &Trajectory, point: &Point3<f64>) -> ClosestApproach {
    let dir = trajectory.direction.into_inner();
    if !trajectory.shape.is_track() || dir.iter().any(|c| !c.is_finite()) {
        return ClosestApproach::undefined();
    }

    let s = (point - trajectory.position).dot(&dir);
    let unbounded_position = trajectory.point_at(s);

    let mut bounded_s = s;
    if trajectory.shape.has_start() && bounded_s < 0.0 {
        bounded_s = 0.0;
    }
    if trajectory.shape.has_stop() && bounded_s > trajectory.stop_parameter() {
        bounded_s = trajectory.stop_parameter();
    }
    let bounded_position = trajectory.point_at(bounded_s);

    ClosestApproach {
        unbounded_position,
        unbounded_distance: (point - unbounded_position).norm(),
        bounded_position,
        bounded_distance: (point - bounded_position).norm(),
        along: s,
    }
}

/// Bounded closest-approach distance, see [`closest_approach`].
pub fn closest_approach_distance(trajectory: &Trajectory, point: &Point3<f64>) -> Meter {
    closest_approach(trajectory, point).bounded_distance
}

/// Bounded closest-approach point, see [`closest_approach`].
pub fn closest_approach_position(trajectory: &Trajectory, point: &Point3<f64>) -> Point3<f64> {
    closest_approach(trajectory, point).bounded_position
}

/// `true` if `point` lies within `tolerance` of the physical part of the track.
pub fn is_on_track(trajectory: &Trajectory, point: &Point3<f64>, tolerance: Meter) -> bool {
    let d = closest_approach(trajectory, point).bounded_distance;
    !d.is_nan() && d <= tolerance
}

/// Result of [`cherenkov_cone`].
///
/// An unreachable target gives NaN in every field. The approach angle alone is NaN
/// when the target sits on the emission point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CherenkovCone {
    /// Point of the trajectory emitting the light that reaches the target.
    pub emission_position: Point3<f64>,
    /// Delay between the trajectory reference time and the arrival at the target (ns).
    pub time: Nanosecond,
    /// Photon path length from emission to target (m).
    pub distance: Meter,
    /// Angle between the sensor axis and the direction towards the emission point (rad).
    pub approach_angle: Radian,
}

impl CherenkovCone {
    fn undefined() -> Self {
        CherenkovCone {
            emission_position: null_point(),
            time: f64::NAN,
            distance: f64::NAN,
            approach_angle: f64::NAN,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.time.is_nan()
    }
}

fn approach_angle(
    emission: &Point3<f64>,
    sensor: &Point3<f64>,
    sensor_axis: &Unit<Vector3<f64>>,
) -> Radian {
    let to_emission = emission - sensor;
    let norm = to_emission.norm();
    if norm == 0.0 {
        return f64::NAN;
    }
    (sensor_axis.dot(&to_emission) / norm)
        .clamp(-1.0, 1.0)
        .acos()
}

/// Light-cone geometry between a trajectory and a point.
///
/// For a track, finds the unique point of the line from which a cone of half-angle
/// `acos(1/n_phase)` reaches `point`. When that emission point is not on the physical
/// part of the track (before the start of a starting track, after the stop of a
/// stopping track) the configuration is invalid and **all** outputs are NaN.
///
/// For a point-like trajectory the light travels in a straight line from the vertex at
/// the group speed.
///
/// Arguments
/// ---------
/// * `trajectory`: the light source.
/// * `point`: target (sensor) position.
/// * `optics`: refractive indices of the medium.
/// * `sensor_axis`: pointing direction of the sensor, used for the approach angle.
///
/// Return
/// ------
/// * A [`CherenkovCone`]. A point on the track itself gives a zero distance and an
///   undefined (NaN) approach angle.
pub fn cherenkov_cone(
    trajectory: &Trajectory,
    point: &Point3<f64>,
    optics: &OpticalConstants,
    sensor_axis: &Unit<Vector3<f64>>,
) -> CherenkovCone {
    if !trajectory.shape.is_track() {
        let distance = (point - trajectory.position).norm();
        return CherenkovCone {
            emission_position: trajectory.position,
            time: distance / optics.group_speed(),
            distance,
            approach_angle: approach_angle(&trajectory.position, point, sensor_axis),
        };
    }

    let ca = closest_approach(trajectory, point);
    let theta_c = optics.cherenkov_angle();
    if ca.along.is_nan() || theta_c.is_nan() {
        return CherenkovCone::undefined();
    }

    let rho = ca.unbounded_distance;
    let s_emission = ca.along - rho / theta_c.tan();
    if !trajectory.contains_parameter(s_emission) {
        return CherenkovCone::undefined();
    }

    let emission_position = trajectory.point_at(s_emission);
    let distance = rho / theta_c.sin();
    let time = (s_emission + distance * optics.group_index) / C_VACUUM;

    CherenkovCone {
        emission_position,
        time,
        distance,
        approach_angle: approach_angle(&emission_position, point, sensor_axis),
    }
}

/// Expected delay of Cherenkov light at `point`, see [`cherenkov_cone`].
pub fn cherenkov_time(
    trajectory: &Trajectory,
    point: &Point3<f64>,
    optics: &OpticalConstants,
) -> Nanosecond {
    cherenkov_cone(trajectory, point, optics, &default_sensor_axis()).time
}

/// Photon path length from the emission point to `point`, see [`cherenkov_cone`].
pub fn cherenkov_distance(
    trajectory: &Trajectory,
    point: &Point3<f64>,
    optics: &OpticalConstants,
) -> Meter {
    cherenkov_cone(trajectory, point, optics, &default_sensor_axis()).distance
}

/// Arrival angle of Cherenkov light on a sensor with axis `sensor_axis`.
pub fn cherenkov_approach_angle(
    trajectory: &Trajectory,
    point: &Point3<f64>,
    optics: &OpticalConstants,
    sensor_axis: &Unit<Vector3<f64>>,
) -> Radian {
    cherenkov_cone(trajectory, point, optics, sensor_axis).approach_angle
}

/// Time residual of a hit: measured time minus expected arrival time.
///
/// Positive residuals are late hits (delayed by scattering), negative ones arrive before
/// the unscattered light could. NaN when the light cone cannot reach the hit position.
pub fn time_residual(
    trajectory: &Trajectory,
    hit_position: &Point3<f64>,
    hit_time: Nanosecond,
    optics: &OpticalConstants,
) -> Nanosecond {
    hit_time - trajectory.time - cherenkov_time(trajectory, hit_position, optics)
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> Meter {
    (a - b).norm()
}

/// Opening angle between the directions of two trajectories, in `[0, π]`.
pub fn angle_diff(a: &Trajectory, b: &Trajectory) -> Radian {
    a.direction.dot(&b.direction.into_inner()).clamp(-1.0, 1.0).acos()
}

/// `true` if the two directions differ by less than `tolerance` radians.
pub fn in_the_same_direction(a: &Trajectory, b: &Trajectory, tolerance: Radian) -> bool {
    angle_diff(a, b) < tolerance
}
