//! 2-D containment: how much a horizontal boundary polygon must be scaled about its
//! centroid to pass through the point where a trajectory crosses a given depth.
use nalgebra::Point2;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    constants::Meter,
    containment::polygon::{ray_edge_ratio, BoundaryPolygon, Side},
    trajectory::Trajectory,
};

/// Horizontal position where the trajectory crosses the plane at depth `z`.
///
/// A point-like trajectory gives its own horizontal position. An exactly horizontal
/// track never crosses (or lies in) the plane and gives a NaN point.
pub fn project_to_plane(trajectory: &Trajectory, z: Meter) -> Point2<f64> {
    if !trajectory.shape.is_track() {
        return trajectory.position.xy();
    }
    let dir = trajectory.direction;
    if dir.z == 0.0 || dir.z.is_nan() {
        return Point2::new(f64::NAN, f64::NAN);
    }
    let t = (z - trajectory.position.z) / dir.z;
    Point2::new(
        trajectory.position.x + t * dir.x,
        trajectory.position.y + t * dir.y,
    )
}

/// Collapse the candidate expansion factors into one answer using the tagged side.
///
/// * `Boundary` → 1.
/// * `Inside` → the largest factor below 1 (the first crossing beyond `p`).
/// * `Outside` → the smallest factor above 1 (the last crossing before `p`).
///
/// A lone candidate goes through the same check. When the side and the candidates
/// disagree (rounding right at a vertex) the factor closest to 1 is used.
fn resolve(candidates: &[f64], side: Side) -> f64 {
    if candidates.is_empty() {
        return f64::NAN;
    }

    let picked = match side {
        Side::Boundary => return 1.0,
        Side::Inside => candidates
            .iter()
            .copied()
            .filter(|c| *c < 1.0)
            .map(OrderedFloat)
            .max(),
        Side::Outside => candidates
            .iter()
            .copied()
            .filter(|c| *c > 1.0)
            .map(OrderedFloat)
            .min(),
    };

    picked.map(|c| c.into_inner()).unwrap_or_else(|| {
        debug!(
            ?side,
            ?candidates,
            "containment candidates inconsistent with side, using the closest to 1"
        );
        candidates
            .iter()
            .copied()
            .min_by_key(|c| OrderedFloat((c - 1.0).abs()))
            .unwrap_or(f64::NAN)
    })
}

/// Scale factor of `polygon`, about its centroid, whose boundary passes through `p`.
///
/// 0 at the centroid, below 1 inside, exactly 1 on the boundary, above 1 outside.
/// NaN when no edge brackets the direction of `p` (NaN input).
pub fn polygon_scale_factor(polygon: &BoundaryPolygon, p: &Point2<f64>) -> f64 {
    let center = polygon.centroid();
    if !(p.x.is_finite() && p.y.is_finite()) {
        return f64::NAN;
    }
    if (p - center).norm() <= f64::EPSILON * polygon.extent() {
        return 0.0;
    }

    let candidates: SmallVec<[f64; 4]> = polygon
        .edges()
        .filter_map(|(a, b)| ray_edge_ratio(&center, p, &a, &b))
        .collect();

    if candidates.len() > 1 {
        debug!(n = candidates.len(), "several edges bracket the query point");
    }

    resolve(&candidates, polygon.side(p))
}

/// Containment factor of a trajectory in the plane at depth `z`.
///
/// The trajectory is intersected with the horizontal plane at `z` and the boundary
/// polygon is scaled about its centroid until it passes through the intersection.
///
/// Arguments
/// ---------
/// * `trajectory`: the track (must not be horizontal) or a point-like vertex.
/// * `polygon`: the validated boundary.
/// * `z`: depth of the plane (m).
///
/// Return
/// ------
/// * The scale factor: `< 1` inside, `1` on the boundary, `> 1` outside, NaN for a
///   horizontal track.
pub fn containment_area_size(trajectory: &Trajectory, polygon: &BoundaryPolygon, z: Meter) -> f64 {
    polygon_scale_factor(polygon, &project_to_plane(trajectory, z))
}

/// Same as [`containment_area_size`] with the boundary given as coordinate lists, in
/// rotational order.
///
/// # Panics
/// * If `x` and `y` have different lengths, fewer than 3 points are given, or the
///   points do not form a simple polygon of non-zero area.
pub fn containment_area_size_xy(trajectory: &Trajectory, x: &[f64], y: &[f64], z: Meter) -> f64 {
    let polygon = BoundaryPolygon::from_xy(x, y)
        .unwrap_or_else(|err| panic!("invalid boundary polygon: {err}"));
    containment_area_size(trajectory, &polygon, z)
}
