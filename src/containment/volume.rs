//! 3-D containment in a vertical prism.
//!
//! The containment factor of a point is the gauge of the prism seen from its center:
//! the factor by which the prism has to be scaled about the center for its surface to
//! pass through the point. Along a straight line the gauge of a convex prism is convex
//! and piecewise linear, with kinks where the line crosses one of the planes spanned by
//! the center and a prism edge. The factor of a trajectory is the smallest gauge over
//! those crossings.
use nalgebra::{Point2, Point3, Vector3};
use tracing::debug;

use crate::{
    constants::Meter,
    containment::{
        area::polygon_scale_factor,
        polygon::{ray_edge_ratio, BoundaryPolygon},
    },
    rotation::plane_to_xy,
    trackgeom_errors::TrackGeomError,
    trajectory::{null_point, Trajectory},
};

/// A vertical prism: a horizontal boundary polygon extruded between two depths.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPrism {
    polygon: BoundaryPolygon,
    z_low: Meter,
    z_high: Meter,
}

impl BoundaryPrism {
    /// Arguments
    /// ---------
    /// * `polygon`: the horizontal cross-section.
    /// * `z_low`, `z_high`: bottom and top of the prism (m), finite with `z_low < z_high`.
    pub fn new(
        polygon: BoundaryPolygon,
        z_low: Meter,
        z_high: Meter,
    ) -> Result<Self, TrackGeomError> {
        if !(z_low.is_finite() && z_high.is_finite() && z_low < z_high) {
            return Err(TrackGeomError::InvalidVerticalExtent(z_low, z_high));
        }
        Ok(BoundaryPrism {
            polygon,
            z_low,
            z_high,
        })
    }

    pub fn polygon(&self) -> &BoundaryPolygon {
        &self.polygon
    }

    pub fn z_low(&self) -> Meter {
        self.z_low
    }

    pub fn z_high(&self) -> Meter {
        self.z_high
    }

    pub fn half_height(&self) -> Meter {
        0.5 * (self.z_high - self.z_low)
    }

    /// Polygon centroid at mid-height.
    pub fn center(&self) -> Point3<f64> {
        let c = self.polygon.centroid();
        Point3::new(c.x, c.y, 0.5 * (self.z_low + self.z_high))
    }

    /// Gauge of a single point: the larger of the horizontal and vertical factors.
    pub fn point_scale_factor(&self, p: &Point3<f64>) -> f64 {
        let lateral = polygon_scale_factor(&self.polygon, &p.xy());
        let vertical = (p.z - self.center().z).abs() / self.half_height();
        lateral.max(vertical)
    }

    /// Every prism edge with the wall family it bounds.
    fn edges(&self) -> impl Iterator<Item = (WallFamily, Point3<f64>, Point3<f64>)> + '_ {
        let (lo, hi) = (self.z_low, self.z_high);
        self.polygon.edges().flat_map(move |(a, b)| {
            [
                (WallFamily::Top, lift(&a, hi), lift(&b, hi)),
                (WallFamily::Bottom, lift(&a, lo), lift(&b, lo)),
                (WallFamily::Side, lift(&a, lo), lift(&a, hi)),
            ]
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WallFamily {
    Top,
    Bottom,
    Side,
}

#[inline]
fn lift(p: &Point2<f64>, z: Meter) -> Point3<f64> {
    Point3::new(p.x, p.y, z)
}

/// Intersection of the trajectory line with the plane through `p1`, `p2` and `p3`.
///
/// Return
/// ------
/// * The intersection, or the null point when the three points are collinear or the
///   line is parallel to the plane.
pub fn line_plane_intersection(
    trajectory: &Trajectory,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Point3<f64> {
    let normal = (p2 - p1).cross(&(p3 - p1));
    let n_norm = normal.norm();
    if !(n_norm > f64::EPSILON * (p2 - p1).norm() * (p3 - p1).norm()) {
        return null_point();
    }

    let dir = trajectory.direction.into_inner();
    let denom = normal.dot(&dir);
    if denom.abs() <= f64::EPSILON * n_norm || denom.is_nan() {
        return null_point();
    }

    let s = normal.dot(&(p1 - trajectory.position)) / denom;
    trajectory.position + dir * s
}

/// Gauge at the crossing of the trajectory with the plane spanned by `center` and
/// the edge `a`-`b`, if the crossing lies within the edge's angular span.
fn edge_crossing_factor(
    trajectory: &Trajectory,
    center: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> Option<f64> {
    let crossing = line_plane_intersection(trajectory, center, a, b);
    if crossing.x.is_nan() {
        return None;
    }

    let normal: Vector3<f64> = (a - center).cross(&(b - center));
    let to_xy = plane_to_xy(&normal);
    let flatten = |p: &Point3<f64>| {
        let v = to_xy * (p - center);
        Point2::new(v.x, v.y)
    };

    ray_edge_ratio(&Point2::origin(), &flatten(&crossing), &flatten(a), &flatten(b))
}

/// Containment factor of a trajectory in a vertical prism.
///
/// Arguments
/// ---------
/// * `trajectory`: any track orientation, or a point-like vertex. Tracks are treated
///   as full lines regardless of their shape.
/// * `prism`: the validated boundary prism.
///
/// Return
/// ------
/// * The smallest scale factor of the prism, about its center, that reaches the
///   trajectory: `< 1` when the line passes inside, `1` when it grazes the surface,
///   `> 1` when it misses. NaN when nothing could be evaluated.
pub fn containment_volume_size(trajectory: &Trajectory, prism: &BoundaryPrism) -> f64 {
    if !trajectory.shape.is_track() {
        return prism.point_scale_factor(&trajectory.position);
    }

    let center = prism.center();
    let skip_sides = trajectory.is_vertical();

    let (top, bottom, side) = prism
        .edges()
        .filter(|(family, _, _)| !(skip_sides && *family == WallFamily::Side))
        .filter_map(|(family, a, b)| {
            edge_crossing_factor(trajectory, &center, &a, &b).map(|f| (family, f))
        })
        .fold(
            (f64::NAN, f64::NAN, f64::NAN),
            |(top, bottom, side), (family, f)| match family {
                WallFamily::Top => (top.min(f), bottom, side),
                WallFamily::Bottom => (top, bottom.min(f), side),
                WallFamily::Side => (top, bottom, side.min(f)),
            },
        );

    let size = top.min(bottom).min(side);
    if size.is_nan() {
        debug!(
            position = ?trajectory.position,
            direction = ?trajectory.direction,
            "no prism wall crossing found"
        );
    }
    size
}

/// Same as [`containment_volume_size`] with the boundary given as coordinate lists in
/// rotational order and a vertical extent.
///
/// # Panics
/// * If `x` and `y` have different lengths, fewer than 3 points are given, the points
///   do not form a simple polygon, or `z_low >= z_high`.
pub fn containment_volume_size_xy(
    trajectory: &Trajectory,
    x: &[f64],
    y: &[f64],
    z_low: Meter,
    z_high: Meter,
) -> f64 {
    let prism = BoundaryPolygon::from_xy(x, y)
        .and_then(|polygon| BoundaryPrism::new(polygon, z_low, z_high))
        .unwrap_or_else(|err| panic!("invalid boundary prism: {err}"));
    containment_volume_size(trajectory, &prism)
}
