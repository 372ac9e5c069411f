mod common;

use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trackgeom::containment::{
    containment_area_size, containment_volume_size, cylinder_size, BoundaryPolygon,
    BoundaryPreset, BoundaryPrism, StringGeometry,
};
use trackgeom::trajectory::Trajectory;

use crate::common::{grid_detector, random_direction, random_point};

#[test]
fn cylinder_matches_fine_polygon_prism() {
    let mut rng = StdRng::seed_from_u64(2024_u64);
    let (radius, height, center_z) = (500.0, 1000.0, -50.0);

    let circle = BoundaryPolygon::regular(360, radius, Point2::origin()).unwrap();
    let prism = BoundaryPrism::new(circle, center_z - 0.5 * height, center_z + 0.5 * height)
        .unwrap();

    for _ in 0..40 {
        let position = random_point(&mut rng, 1500.0);
        let track = Trajectory::infinite(position, random_direction(&mut rng), 0.0);

        let exact = cylinder_size(&track, height, radius, center_z);
        let polygonal = containment_volume_size(&track, &prism);
        assert!(exact.is_finite());
        assert_relative_eq!(polygonal, exact, max_relative = 1e-3);
    }

    let vertex = Trajectory::point_like(Point3::new(120.0, -340.0, 200.0), 0.0);
    assert_relative_eq!(
        containment_volume_size(&vertex, &prism),
        cylinder_size(&vertex, height, radius, center_z),
        max_relative = 1e-3
    );
}

#[test]
fn area_size_agrees_with_winding_number() {
    let mut rng = StdRng::seed_from_u64(99_u64);
    // convex hexagon, not centered
    let hexagon = BoundaryPolygon::regular(6, 200.0, Point2::new(40.0, -30.0)).unwrap();

    for _ in 0..500 {
        let x = rng.random_range(-400.0..=400.0);
        let y = rng.random_range(-400.0..=400.0);
        let track = Trajectory::infinite(Point3::new(x, y, 0.0), -Vector3::z(), 0.0);
        let size = containment_area_size(&track, &hexagon, 0.0);
        let inside = hexagon.contains(&Point2::new(x, y));
        assert_eq!(size < 1.0, inside, "point ({x}, {y}) size {size}");
    }
}

#[test]
fn area_size_scales_linearly_from_centroid() {
    let polygon = BoundaryPolygon::from_xy(
        &[-300.0, 250.0, 400.0, 100.0, -350.0],
        &[-200.0, -300.0, 50.0, 350.0, 150.0],
    )
    .unwrap();
    assert!(polygon.is_convex());
    let c = polygon.centroid();

    for vertex in polygon.vertices() {
        for factor in [0.25, 0.5, 1.0, 2.0, 7.0] {
            let p = c + (vertex - c) * factor;
            let track = Trajectory::infinite(Point3::new(p.x, p.y, 10.0), -Vector3::z(), 0.0);
            assert_relative_eq!(
                containment_area_size(&track, &polygon, -100.0),
                factor,
                max_relative = 1e-12
            );
        }
    }
}

#[test]
fn grid_detector_preset_free_boundary() {
    // outer ring of a 4 x 4 grid, walked around the border
    let sensors = grid_detector(4, 125.0, 10);
    let ring = [1, 2, 3, 4, 8, 12, 16, 15, 14, 13, 9, 5];
    let vertices: Vec<Point2<f64>> = ring
        .iter()
        .map(|&s| sensors.string_position(s).unwrap())
        .collect();
    let polygon = BoundaryPolygon::from_ordered(vertices).unwrap();
    let prism = BoundaryPrism::new(polygon, -500.0, 500.0).unwrap();

    let through_corner =
        Trajectory::infinite(Point3::new(187.5, 187.5, 800.0), -Vector3::z(), 0.0);
    assert_relative_eq!(
        containment_volume_size(&through_corner, &prism),
        1.0,
        epsilon = 1e-12
    );

    let horizontal_above =
        Trajectory::infinite(Point3::new(0.0, 0.0, 750.0), Vector3::x(), 0.0);
    assert_relative_eq!(
        containment_volume_size(&horizontal_above, &prism),
        1.5,
        epsilon = 1e-12
    );

    // the grid has none of the standard boundary strings above 16
    assert!(BoundaryPreset::IC86Outer.prism(&sensors).is_err());
}
