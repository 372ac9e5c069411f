//! Validated boundary polygons and the 2-D primitives the containment routines share.
use std::f64::consts::PI;

use itertools::Itertools;
use nalgebra::{Point2, Vector2};

use crate::{
    constants::{ANGLE_SNAP, BOUNDARY_EPS, DPI},
    trackgeom_errors::TrackGeomError,
};

/// Where a point lies relative to a [`BoundaryPolygon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Inside,
    Outside,
    Boundary,
}

#[inline]
fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Polar angle of `v` in `[0, 2π)`.
///
/// Angles within `5·ε` of zero are snapped to exactly zero so that a value of `-0` or
/// `-1e-17` does not wrap around to `2π`.
pub fn polar_angle(v: &Vector2<f64>) -> f64 {
    let a = v.y.atan2(v.x);
    if a.abs() < ANGLE_SNAP {
        0.0
    } else if a < 0.0 {
        a + DPI
    } else {
        a
    }
}

/// Counter-clockwise angular distance from `from` to `to`, in `[0, 2π)`.
#[inline]
fn ccw_span(from: f64, to: f64) -> f64 {
    (to - from).rem_euclid(DPI)
}

/// `true` if `theta` lies in the counter-clockwise window of width `span` starting at `start`.
#[inline]
fn in_ccw_window(theta: f64, start: f64, span: f64) -> bool {
    let offset = ccw_span(start, theta);
    offset <= span + BOUNDARY_EPS || offset >= DPI - BOUNDARY_EPS
}

/// Intersection of the line through `a1`, `a2` with the line through `b1`, `b2`.
///
/// Return
/// ------
/// * The intersection point, or a NaN point when the lines are parallel (or one of them
///   is degenerate).
pub fn line_intersection_2d(
    a1: &Point2<f64>,
    a2: &Point2<f64>,
    b1: &Point2<f64>,
    b2: &Point2<f64>,
) -> Point2<f64> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = cross(&r, &s);
    if denom.abs() <= f64::EPSILON * r.norm() * s.norm() || denom.is_nan() {
        return Point2::new(f64::NAN, f64::NAN);
    }
    let t = cross(&(b1 - a1), &s) / denom;
    a1 + r * t
}

/// Expansion factor of the edge `a`–`b` for the ray from `center` through `p`.
///
/// Returns `None` when the direction of `p` seen from `center` is not within the angular
/// span of the edge. Both winding orders of the edge are accepted, only the window
/// narrower than π is used. Otherwise the factor is `|center p| / |center I|` where `I`
/// is the intersection of the ray with the edge line; a `p` at the center gives 0.
pub(crate) fn ray_edge_ratio(
    center: &Point2<f64>,
    p: &Point2<f64>,
    a: &Point2<f64>,
    b: &Point2<f64>,
) -> Option<f64> {
    let dp = p - center;
    let r = dp.norm();
    if !r.is_finite() {
        return None;
    }
    let scale = (a - center).norm().max((b - center).norm());
    if r <= BOUNDARY_EPS * scale {
        return Some(0.0);
    }

    let theta_p = polar_angle(&dp);
    let theta_a = polar_angle(&(a - center));
    let theta_b = polar_angle(&(b - center));

    let forward = ccw_span(theta_a, theta_b);
    let backward = ccw_span(theta_b, theta_a);
    let bracketed = (forward < PI && in_ccw_window(theta_p, theta_a, forward))
        || (backward < PI && in_ccw_window(theta_p, theta_b, backward));
    if !bracketed {
        return None;
    }

    let hit = line_intersection_2d(center, p, a, b);
    let ratio = r / (hit - center).norm();
    ratio.is_finite().then_some(ratio)
}

/// Signed area of a polygon (positive for counter-clockwise order).
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    0.5 * points
        .iter()
        .circular_tuple_windows::<(_, _)>()
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
}

/// Area centroid of a polygon.
///
/// The polygon is split into the fan of `N − 2` triangles sharing vertex 0 and the
/// triangle centroids are averaged with their signed areas as weights. Reversing the
/// vertex order flips every sign and leaves the result unchanged.
///
/// Return
/// ------
/// * The centroid, or a NaN point for a zero-area polygon.
///
/// # Panics
/// * If fewer than 3 points are given.
pub fn polygon_centroid(points: &[Point2<f64>]) -> Point2<f64> {
    assert!(
        points.len() >= 3,
        "polygon centroid needs at least 3 points, got {}",
        points.len()
    );

    let p0 = points[0];
    let (weighted, total) = points[1..].iter().tuple_windows::<(_, _)>().fold(
        (Vector2::zeros(), 0.0),
        |(weighted, total), (p1, p2)| {
            let area = 0.5 * cross(&(p1 - p0), &(p2 - p0));
            let tri_centroid = (p0.coords + p1.coords + p2.coords) / 3.0;
            (weighted + tri_centroid * area, total + area)
        },
    );

    if total == 0.0 {
        return Point2::new(f64::NAN, f64::NAN);
    }
    Point2::from(weighted / total)
}

/// Stable sort of points by polar angle around `center`.
///
/// Only meaningful for polygons that are star-shaped from `center`; a concave boundary
/// can be scrambled by this ordering.
pub fn sort_by_angle(points: &[Point2<f64>], center: &Point2<f64>) -> Vec<Point2<f64>> {
    points
        .iter()
        .copied()
        .sorted_by(|a, b| polar_angle(&(a - center)).total_cmp(&polar_angle(&(b - center))))
        .collect()
}

fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    cross(&(b - a), &(c - a))
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// `true` if the closed segments `p1 p2` and `q1 q2` share at least one point.
fn segments_intersect(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

fn point_segment_distance(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// A simple polygon in the horizontal plane, validated once at construction.
///
/// Invariants
/// ----------
/// * at least 3 vertices, all finite,
/// * non-zero area,
/// * no two non-adjacent edges touch (the polygon is simple).
///
/// The containment factors are exact for polygons that are star-shaped from their
/// centroid (every convex polygon is). For other simple polygons the inside/outside
/// decision still comes from the winding number, but the scale factor is only one of
/// several boundary crossings along the ray.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    vertices: Vec<Point2<f64>>,
    centroid: Point2<f64>,
    signed_area: f64,
    extent: f64,
}

impl BoundaryPolygon {
    /// Build a polygon from unordered vertices by sorting them by angle around their mean.
    pub fn new(vertices: Vec<Point2<f64>>) -> Result<Self, TrackGeomError> {
        Self::check_vertices(&vertices)?;
        let mean = Point2::from(
            vertices.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords)
                / vertices.len() as f64,
        );
        Self::from_ordered(sort_by_angle(&vertices, &mean))
    }

    /// Build a polygon keeping the caller's vertex order (either winding).
    pub fn from_ordered(vertices: Vec<Point2<f64>>) -> Result<Self, TrackGeomError> {
        Self::check_vertices(&vertices)?;

        let area = signed_area(&vertices);
        let (min_x, max_x) = vertices
            .iter()
            .map(|p| p.x)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
            .unwrap_or((0.0, 0.0));
        let (min_y, max_y) = vertices
            .iter()
            .map(|p| p.y)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
            .unwrap_or((0.0, 0.0));
        let n = vertices.len();
        for i in 0..n {
            // edges sharing a vertex with edge i are skipped
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                if segments_intersect(
                    &vertices[i],
                    &vertices[(i + 1) % n],
                    &vertices[j],
                    &vertices[(j + 1) % n],
                ) {
                    return Err(TrackGeomError::SelfIntersecting(i, j));
                }
            }
        }

        let extent = (max_x - min_x).hypot(max_y - min_y);
        if area.abs() <= BOUNDARY_EPS * extent * extent {
            return Err(TrackGeomError::DegeneratePolygon);
        }

        let centroid = polygon_centroid(&vertices);
        Ok(BoundaryPolygon {
            vertices,
            centroid,
            signed_area: area,
            extent,
        })
    }

    /// Build an ordered polygon from parallel coordinate lists.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self, TrackGeomError> {
        if x.len() != y.len() {
            return Err(TrackGeomError::MismatchedCoordinates(x.len(), y.len()));
        }
        Self::from_ordered(x.iter().zip(y).map(|(&x, &y)| Point2::new(x, y)).collect())
    }

    /// Regular polygon with `n` vertices on a circle, counter-clockwise from angle 0.
    pub fn regular(
        n: usize,
        circumradius: f64,
        center: Point2<f64>,
    ) -> Result<Self, TrackGeomError> {
        Self::from_ordered(
            (0..n)
                .map(|k| {
                    let (s, c) = (DPI * k as f64 / n as f64).sin_cos();
                    center + Vector2::new(c, s) * circumradius
                })
                .collect(),
        )
    }

    fn check_vertices(vertices: &[Point2<f64>]) -> Result<(), TrackGeomError> {
        if vertices.len() < 3 {
            return Err(TrackGeomError::TooFewVertices(vertices.len()));
        }
        if let Some(idx) = vertices
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(TrackGeomError::NonFiniteVertex(idx));
        }
        Ok(())
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn centroid(&self) -> Point2<f64> {
        self.centroid
    }

    pub fn signed_area(&self) -> f64 {
        self.signed_area
    }

    pub fn area(&self) -> f64 {
        self.signed_area.abs()
    }

    /// Diagonal of the bounding box, the length scale of the tolerances.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Edges as consecutive vertex pairs, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.vertices
            .iter()
            .copied()
            .circular_tuple_windows::<(_, _)>()
    }

    /// `true` if every turn has the same orientation.
    pub fn is_convex(&self) -> bool {
        let sign = self.signed_area.signum();
        self.vertices
            .iter()
            .circular_tuple_windows::<(_, _, _)>()
            .all(|(a, b, c)| orientation(a, b, c) * sign >= 0.0)
    }

    /// Winding number of the boundary around `p` (0 outside).
    ///
    /// Counter-clockwise polygons give +1 inside, clockwise ones −1.
    pub fn winding_number(&self, p: &Point2<f64>) -> i32 {
        self.edges().fold(0, |wn, (a, b)| {
            if a.y <= p.y {
                if b.y > p.y && orientation(&a, &b, p) > 0.0 {
                    return wn + 1;
                }
            } else if b.y <= p.y && orientation(&a, &b, p) < 0.0 {
                return wn - 1;
            }
            wn
        })
    }

    /// Ray-casting containment test.
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        self.winding_number(p) != 0
    }

    /// Euclidean distance from `p` to the closest edge.
    pub fn distance_to_boundary(&self, p: &Point2<f64>) -> f64 {
        self.edges()
            .map(|(a, b)| point_segment_distance(p, &a, &b))
            .fold(f64::INFINITY, f64::min)
    }

    /// Inside/outside decision for `p`, with a tolerance band around the edges.
    pub fn side(&self, p: &Point2<f64>) -> Side {
        if self.distance_to_boundary(p) <= BOUNDARY_EPS * self.extent {
            Side::Boundary
        } else if self.contains(p) {
            Side::Inside
        } else {
            Side::Outside
        }
    }
}

#[cfg(test)]
mod polygon_test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn test_line_intersection_2d() {
        let p = line_intersection_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        );
        assert_relative_eq!(p, Point2::new(1.0, 1.0));

        let parallel = line_intersection_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
        );
        assert!(parallel.x.is_nan() && parallel.y.is_nan());
    }

    #[test]
    fn test_polygon_centroid() {
        let c = polygon_centroid(&square());
        assert_abs_diff_eq!(c, Point2::origin(), epsilon = 1e-15);

        // same result in clockwise order
        let mut cw = square();
        cw.reverse();
        assert_abs_diff_eq!(polygon_centroid(&cw), Point2::origin(), epsilon = 1e-15);

        // L-shape: unit squares at (0,0), (1,0), (0,1)
        let l_shape = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let c = polygon_centroid(&l_shape);
        assert_relative_eq!(c, Point2::new(5.0 / 6.0, 5.0 / 6.0), epsilon = 1e-14);
    }

    #[test]
    #[should_panic(expected = "at least 3 points")]
    fn test_polygon_centroid_too_few_points() {
        polygon_centroid(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_sort_by_angle() {
        let shuffled = vec![
            Point2::new(-1.0, 1.0),
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, 1.0),
        ];
        let sorted = sort_by_angle(&shuffled, &Point2::origin());
        assert_eq!(
            sorted,
            vec![
                Point2::new(1.0, 1.0),
                Point2::new(-1.0, 1.0),
                Point2::new(-1.0, -1.0),
                Point2::new(1.0, -1.0),
            ]
        );
    }

    #[test]
    fn test_polygon_validation() {
        assert_eq!(
            BoundaryPolygon::from_ordered(vec![Point2::origin(), Point2::new(1.0, 0.0)]),
            Err(TrackGeomError::TooFewVertices(2))
        );
        assert_eq!(
            BoundaryPolygon::from_xy(&[0.0, 1.0, 1.0], &[0.0, 1.0]),
            Err(TrackGeomError::MismatchedCoordinates(3, 2))
        );
        assert_eq!(
            BoundaryPolygon::from_ordered(vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(2.0, 2.0),
            ]),
            Err(TrackGeomError::DegeneratePolygon)
        );
        assert_eq!(
            BoundaryPolygon::from_ordered(vec![
                Point2::new(0.0, 0.0),
                Point2::new(f64::NAN, 1.0),
                Point2::new(2.0, 2.0),
            ]),
            Err(TrackGeomError::NonFiniteVertex(1))
        );

        // bow tie
        let bow_tie = BoundaryPolygon::from_ordered(vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, 1.0),
        ]);
        assert_eq!(bow_tie, Err(TrackGeomError::SelfIntersecting(0, 2)));

        // the same points are accepted once ordered by angle
        let fixed = BoundaryPolygon::new(vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, 1.0),
        ])
        .unwrap();
        assert_relative_eq!(fixed.area(), 4.0);
        assert!(fixed.signed_area() > 0.0);
        assert!(fixed.is_convex());
    }

    #[test]
    fn test_winding_and_side() {
        let poly = BoundaryPolygon::from_ordered(square()).unwrap();
        assert_eq!(poly.winding_number(&Point2::new(0.2, 0.3)), 1);
        assert_eq!(poly.winding_number(&Point2::new(2.0, 0.3)), 0);

        let mut cw = square();
        cw.reverse();
        let cw = BoundaryPolygon::from_ordered(cw).unwrap();
        assert_eq!(cw.winding_number(&Point2::new(0.2, 0.3)), -1);
        assert!(cw.contains(&Point2::new(0.2, 0.3)));

        assert_eq!(poly.side(&Point2::new(0.5, 0.5)), Side::Inside);
        assert_eq!(poly.side(&Point2::new(1.5, 0.5)), Side::Outside);
        assert_eq!(poly.side(&Point2::new(1.0, 0.5)), Side::Boundary);
        assert_eq!(poly.side(&Point2::new(1.0, 1.0)), Side::Boundary);
    }

    #[test]
    fn test_ray_edge_ratio() {
        let c = Point2::origin();
        let a = Point2::new(1.0, -1.0);
        let b = Point2::new(1.0, 1.0);

        let r = ray_edge_ratio(&c, &Point2::new(0.5, 0.25), &a, &b).unwrap();
        assert_relative_eq!(r, 0.5);
        // reversed edge orientation gives the same factor
        let r = ray_edge_ratio(&c, &Point2::new(3.0, 1.5), &b, &a).unwrap();
        assert_relative_eq!(r, 3.0);
        // direction outside the edge span
        assert!(ray_edge_ratio(&c, &Point2::new(-0.5, 0.0), &a, &b).is_none());
        assert!(ray_edge_ratio(&c, &Point2::new(0.5, 0.75), &a, &b).is_none());
        // ray along the positive x axis through an edge spanning angle 0
        let r = ray_edge_ratio(&c, &Point2::new(2.0, 0.0), &a, &b).unwrap();
        assert_relative_eq!(r, 2.0);
        assert_eq!(ray_edge_ratio(&c, &c, &a, &b), Some(0.0));
    }

    #[test]
    fn test_convexity() {
        let l_shape = BoundaryPolygon::from_ordered(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ])
        .unwrap();
        assert!(!l_shape.is_convex());
        assert_relative_eq!(l_shape.area(), 3.0);
        assert_eq!(l_shape.edges().count(), 6);
    }
}
