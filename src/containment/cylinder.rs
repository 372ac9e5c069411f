//! Closed-form containment in an upright circular cylinder.
//!
//! For a cylinder of radius `R` and height `H` centered on the z axis at depth `z_c`
//! the gauge of a point is `max(ρ / R, |z − z_c| / (H/2))`, with `ρ` the distance to
//! the axis. Both terms are convex along a line, so the minimum of their maximum is
//! reached at the minimum of either term or where the two terms are equal.
use smallvec::SmallVec;

use crate::{constants::Meter, trajectory::Trajectory};

/// Gauge of a point given in cylinder coordinates centered on `(0, 0, 0)`.
#[inline]
fn gauge(x: f64, y: f64, z: f64, radius: Meter, half_height: Meter) -> f64 {
    (x.hypot(y) / radius).max(z.abs() / half_height)
}

/// Roots of `a t² + b t + c = 0`, falling back to the linear equation when `a` is
/// negligible against `b` and `c`.
fn real_roots(a: f64, b: f64, c: f64) -> SmallVec<[f64; 2]> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if a.abs() <= 1e-14 * scale {
        if b != 0.0 {
            return smallvec::smallvec![-c / b];
        }
        return SmallVec::new();
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return SmallVec::new();
    }
    // stable form avoids cancellation between -b and sqrt(disc)
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        return smallvec::smallvec![0.0];
    }
    smallvec::smallvec![q / a, c / q]
}

/// Containment factor of a trajectory in a vertical cylinder.
///
/// Arguments
/// ---------
/// * `trajectory`: any track (treated as a full line) or a point-like vertex.
/// * `height`: full height of the cylinder (m).
/// * `radius`: radius of the cylinder (m).
/// * `center_z`: depth of the cylinder center; the axis is the z axis.
///
/// Return
/// ------
/// * The smallest scale factor of the cylinder about its center that reaches the
///   trajectory, NaN when no candidate can be evaluated (non-finite input).
pub fn cylinder_size(
    trajectory: &Trajectory,
    height: Meter,
    radius: Meter,
    center_z: Meter,
) -> f64 {
    let h = 0.5 * height;
    let x0 = trajectory.position.x;
    let y0 = trajectory.position.y;
    let z0 = trajectory.position.z - center_z;

    if !trajectory.shape.is_track() {
        return gauge(x0, y0, z0, radius, h);
    }

    let (dx, dy, dz) = (
        trajectory.direction.x,
        trajectory.direction.y,
        trajectory.direction.z,
    );
    let dxy2 = dx * dx + dy * dy;
    let radial = x0 * dx + y0 * dy;

    let mut candidates: SmallVec<[f64; 4]> = SmallVec::new();
    // closest approach to the axis
    if dxy2 > f64::EPSILON * f64::EPSILON {
        candidates.push(-radial / dxy2);
    }
    // mid-plane crossing
    if dz != 0.0 {
        candidates.push(-z0 / dz);
    }
    // lateral term equal to the cap term
    let r2 = radius * radius;
    let h2 = h * h;
    candidates.extend(real_roots(
        dxy2 / r2 - dz * dz / h2,
        2.0 * (radial / r2 - z0 * dz / h2),
        (x0 * x0 + y0 * y0) / r2 - z0 * z0 / h2,
    ));

    candidates
        .iter()
        .filter(|t| t.is_finite())
        .map(|t| gauge(x0 + t * dx, y0 + t * dy, z0 + t * dz, radius, h))
        .fold(f64::NAN, f64::min)
}
