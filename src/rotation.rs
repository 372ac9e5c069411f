//! # Directions and rotations
//!
//! Thin helpers over [`nalgebra`] rotations used by the geometric algorithms.
//!
//! ## Conventions
//!
//! * Rotations are **active** and **right-handed**: rotating by a positive angle about an
//!   axis turns vectors counter-clockwise when looking from the tip of the axis towards the
//!   origin. This holds for both [`axis_rotation`] matrices and the [`UnitQuaternion`]
//!   returned by [`plane_to_xy`].
//! * A direction given by `(zenith, azimuth)` follows the detector convention: the angles
//!   point to where the particle **comes from**, so the propagation direction is
//!   `(-sinθ cosφ, -sinθ sinφ, -cosθ)`. A down-going particle has zenith 0.
use nalgebra::{Matrix3, Rotation3, Unit, UnitQuaternion, Vector3};

use crate::constants::{Radian, DPI};

/// Cartesian axis selector for [`axis_rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Rotation matrix of angle `alpha` around one of the Cartesian axes.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians (positive = counter-clockwise about the axis).
/// * `axis`: the Cartesian axis to rotate around.
///
/// Return
/// ------
/// * The 3×3 rotation matrix `R` such that `v' = R · v`.
pub fn axis_rotation(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotate `v` by `angle` around an arbitrary `axis`.
pub fn rotate_about(v: &Vector3<f64>, axis: &Unit<Vector3<f64>>, angle: Radian) -> Vector3<f64> {
    Rotation3::from_axis_angle(axis, angle) * v
}

/// Propagation direction of a particle coming from `(zenith, azimuth)`.
pub fn direction_from_zenith_azimuth(zenith: Radian, azimuth: Radian) -> Unit<Vector3<f64>> {
    let (sin_zen, cos_zen) = zenith.sin_cos();
    let (sin_azi, cos_azi) = azimuth.sin_cos();
    Unit::new_unchecked(Vector3::new(
        -sin_zen * cos_azi,
        -sin_zen * sin_azi,
        -cos_zen,
    ))
}

/// Inverse of [`direction_from_zenith_azimuth`].
///
/// Return
/// ------
/// * `(zenith, azimuth)` with zenith in `[0, π]` and azimuth in `[0, 2π)`.
pub fn zenith_azimuth(direction: &Unit<Vector3<f64>>) -> (Radian, Radian) {
    let zenith = (-direction.z).clamp(-1.0, 1.0).acos();
    let azimuth = (-direction.y).atan2(-direction.x).rem_euclid(DPI);
    (zenith, azimuth)
}

/// Two unit vectors perpendicular to `direction` and to each other.
///
/// The first one lies in the vertical plane containing `direction` (for vertical
/// directions, along +x); the second one is the first rotated by +π/2 about `direction`,
/// so `(first, second, direction)` is a right-handed frame.
pub fn transverse_directions(
    direction: &Unit<Vector3<f64>>,
) -> (Unit<Vector3<f64>>, Unit<Vector3<f64>>) {
    let horizontal = Vector3::new(direction.x, direction.y, 0.0);
    let first = if horizontal.norm() < f64::EPSILON {
        Vector3::x_axis()
    } else {
        // component of +z orthogonal to the direction
        let up = Vector3::z() - direction.into_inner() * direction.z;
        Unit::new_normalize(up)
    };
    let second = rotate_about(&first, direction, std::f64::consts::FRAC_PI_2);
    (first, Unit::new_normalize(second))
}

/// Unit quaternion rotating `normal` onto `+z`.
///
/// Applying it to points of a plane with this normal maps the plane into a horizontal
/// plane, where the `z` component is constant and the 2-D predicates apply.
/// An anti-parallel normal is handled with a half turn about `+x`.
pub fn plane_to_xy(normal: &Vector3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::rotation_between(normal, &Vector3::z()).unwrap_or_else(|| {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI)
    })
}
