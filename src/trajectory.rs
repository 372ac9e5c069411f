//! # Reconstructed trajectories
//!
//! A [`Trajectory`] is the reconstruction hypothesis every query of this crate is
//! evaluated against: a vertex, a propagation direction, a reference time and a shape
//! telling which part of the straight line is physical.
//!
//! ## Shapes
//!
//! ```text
//!  InfiniteTrack   <--------------------x-------------------->
//!  StartingTrack                        x-------------------->
//!  StoppingTrack   <--------------------x . . . . stop
//!  ContainedTrack                       x--------- stop
//!  PointLike                            x
//! ```
//!
//! `x` marks [`Trajectory::position`]. The stop point of a stopping or contained track is
//! `position + length · direction`; a stopping track built with
//! [`Trajectory::stopping`] has length 0, so its position is the stop point.
use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Meter, Nanosecond, Radian},
    rotation::{direction_from_zenith_azimuth, zenith_azimuth},
};

/// Which part of the line through [`Trajectory::position`] carries the particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrajectoryShape {
    InfiniteTrack,
    StartingTrack,
    StoppingTrack,
    ContainedTrack,
    PointLike,
}

impl TrajectoryShape {
    /// `true` for every shape with a meaningful propagation direction.
    pub fn is_track(&self) -> bool {
        !matches!(self, TrajectoryShape::PointLike)
    }

    /// `true` when the particle does not exist before its position.
    pub fn has_start(&self) -> bool {
        matches!(
            self,
            TrajectoryShape::StartingTrack | TrajectoryShape::ContainedTrack
        )
    }

    /// `true` when the particle does not exist after its stop point.
    pub fn has_stop(&self) -> bool {
        matches!(
            self,
            TrajectoryShape::StoppingTrack | TrajectoryShape::ContainedTrack
        )
    }
}

/// A straight-line particle hypothesis.
///
/// # Fields
///
/// * `position` - vertex of the trajectory (m)
/// * `direction` - unit propagation direction
/// * `time` - time at which the particle is at `position` (ns)
/// * `length` - extent along `direction` for stopping/contained tracks (m)
/// * `shape` - see [`TrajectoryShape`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub position: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
    pub time: Nanosecond,
    pub length: Meter,
    pub shape: TrajectoryShape,
}

impl Trajectory {
    /// Build a trajectory from a position, direction cosines, time, length and shape.
    ///
    /// The direction is normalized, so any non-zero vector is accepted. A zero
    /// direction yields a NaN direction, which every direction-dependent query reports as
    /// undefined.
    pub fn new(
        position: Point3<f64>,
        direction: Vector3<f64>,
        time: Nanosecond,
        length: Meter,
        shape: TrajectoryShape,
    ) -> Self {
        Trajectory {
            position,
            direction: Unit::new_normalize(direction),
            time,
            length,
            shape,
        }
    }

    /// Same as [`Trajectory::new`] with the direction given as detector angles.
    ///
    /// Arguments
    /// ---------
    /// * `zenith`, `azimuth`: angles pointing to where the particle comes from (rad)
    pub fn from_angles(
        position: Point3<f64>,
        zenith: Radian,
        azimuth: Radian,
        time: Nanosecond,
        length: Meter,
        shape: TrajectoryShape,
    ) -> Self {
        Trajectory {
            position,
            direction: direction_from_zenith_azimuth(zenith, azimuth),
            time,
            length,
            shape,
        }
    }

    pub fn infinite(position: Point3<f64>, direction: Vector3<f64>, time: Nanosecond) -> Self {
        Self::new(
            position,
            direction,
            time,
            f64::NAN,
            TrajectoryShape::InfiniteTrack,
        )
    }

    pub fn starting(position: Point3<f64>, direction: Vector3<f64>, time: Nanosecond) -> Self {
        Self::new(
            position,
            direction,
            time,
            f64::NAN,
            TrajectoryShape::StartingTrack,
        )
    }

    pub fn stopping(position: Point3<f64>, direction: Vector3<f64>, time: Nanosecond) -> Self {
        Self::new(position, direction, time, 0.0, TrajectoryShape::StoppingTrack)
    }

    pub fn contained(
        position: Point3<f64>,
        direction: Vector3<f64>,
        time: Nanosecond,
        length: Meter,
    ) -> Self {
        Self::new(
            position,
            direction,
            time,
            length,
            TrajectoryShape::ContainedTrack,
        )
    }

    /// A cascade: a point-like light source. The direction is kept but ignored by the
    /// light-cone geometry.
    pub fn point_like(position: Point3<f64>, time: Nanosecond) -> Self {
        Self::new(
            position,
            Vector3::z(),
            time,
            f64::NAN,
            TrajectoryShape::PointLike,
        )
    }

    pub fn zenith(&self) -> Radian {
        zenith_azimuth(&self.direction).0
    }

    pub fn azimuth(&self) -> Radian {
        zenith_azimuth(&self.direction).1
    }

    /// Where the particle starts; NaN point for shapes without a start.
    pub fn start_point(&self) -> Point3<f64> {
        if self.shape.has_start() {
            self.position
        } else {
            null_point()
        }
    }

    /// Along-track parameter of the stop point, relative to `position`.
    ///
    /// A non-finite length is read as 0 so that a stopping track without length
    /// stops at its position.
    pub(crate) fn stop_parameter(&self) -> Meter {
        if self.length.is_finite() {
            self.length
        } else {
            0.0
        }
    }

    /// Where the particle stops; NaN point for shapes without a stop.
    pub fn stop_point(&self) -> Point3<f64> {
        if self.shape.has_stop() {
            self.point_at(self.stop_parameter())
        } else {
            null_point()
        }
    }

    /// Point at signed distance `s` from `position` along the direction.
    pub fn point_at(&self, s: Meter) -> Point3<f64> {
        self.position + self.direction.into_inner() * s
    }

    /// `true` when the along-track parameter `s` lies on the physical part of the track.
    ///
    /// Always `false` for a point-like trajectory.
    pub fn contains_parameter(&self, s: Meter) -> bool {
        if !self.shape.is_track() || s.is_nan() {
            return false;
        }
        if self.shape.has_start() && s < 0.0 {
            return false;
        }
        if self.shape.has_stop() && s > self.stop_parameter() {
            return false;
        }
        true
    }

    /// `true` when the direction has no horizontal component.
    pub fn is_vertical(&self) -> bool {
        self.direction.x.abs() < f64::EPSILON && self.direction.y.abs() < f64::EPSILON
    }

    /// `true` when the direction has no vertical component.
    pub fn is_horizontal(&self) -> bool {
        self.direction.z.abs() < f64::EPSILON
    }
}

/// The all-NaN point, meaning "no such point exists".
pub fn null_point() -> Point3<f64> {
    Point3::new(f64::NAN, f64::NAN, f64::NAN)
}

/// `true` when any coordinate of `p` is NaN.
pub fn is_null(p: &Point3<f64>) -> bool {
    p.coords.iter().any(|c| c.is_nan())
}

#[cfg(test)]
mod trajectory_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_start_and_stop_points() {
        let origin = Point3::new(1.0, 2.0, 3.0);

        let t = Trajectory::contained(origin, Vector3::new(0.0, 0.0, 2.0), 0.0, 10.0);
        assert_abs_diff_eq!(t.direction.into_inner(), Vector3::z(), epsilon = 1e-15);
        assert_eq!(t.start_point(), origin);
        assert_eq!(t.stop_point(), Point3::new(1.0, 2.0, 13.0));

        let t = Trajectory::stopping(origin, Vector3::x(), 0.0);
        assert_eq!(t.stop_point(), origin);
        assert!(is_null(&t.start_point()));

        let t = Trajectory::infinite(origin, Vector3::x(), 0.0);
        assert!(is_null(&t.start_point()));
        assert!(is_null(&t.stop_point()));
    }

    #[test]
    fn test_contains_parameter() {
        let origin = Point3::origin();
        let t = Trajectory::contained(origin, Vector3::x(), 0.0, 5.0);
        assert!(t.contains_parameter(0.0));
        assert!(t.contains_parameter(5.0));
        assert!(!t.contains_parameter(-0.1));
        assert!(!t.contains_parameter(5.1));

        let t = Trajectory::starting(origin, Vector3::x(), 0.0);
        assert!(t.contains_parameter(1e9));
        assert!(!t.contains_parameter(-1e-9));

        let t = Trajectory::point_like(origin, 0.0);
        assert!(!t.contains_parameter(0.0));
    }

    #[test]
    fn test_from_angles() {
        let t = Trajectory::from_angles(
            Point3::origin(),
            0.0,
            0.0,
            0.0,
            f64::NAN,
            TrajectoryShape::InfiniteTrack,
        );
        assert!(t.is_vertical());
        assert!(!t.is_horizontal());
        assert_abs_diff_eq!(t.zenith(), 0.0);
    }
}
