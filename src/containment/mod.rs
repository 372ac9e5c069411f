//! # Containment
//!
//! Dimensionless measures of how far inside or outside a detector boundary a
//! trajectory passes.
//!
//! Every routine returns a **scale factor** `k ≥ 0` of the boundary about its center:
//!
//! * `k < 1`: the boundary would have to shrink to exclude the trajectory,
//! * `k = 1`: the trajectory touches the boundary,
//! * `k > 1`: the boundary would have to grow to reach it,
//! * NaN: the question has no answer (a horizontal track against a horizontal plane,
//!   non-finite input).
//!
//! ## Boundaries
//!
//! * [`polygon::BoundaryPolygon`]: a validated simple polygon in the horizontal plane.
//! * [`volume::BoundaryPrism`]: a polygon extruded between two depths.
//! * [`cylinder::cylinder_size`]: the closed-form circular case.
//! * [`presets::BoundaryPreset`]: named string rings resolved through a
//!   [`presets::StringGeometry`] lookup.
//!
//! The factors are exact for boundaries that are star-shaped from their centroid,
//! which includes every convex boundary.
pub mod area;
pub mod cylinder;
pub mod polygon;
pub mod presets;
pub mod volume;

pub use area::{containment_area_size, containment_area_size_xy};
pub use cylinder::cylinder_size;
pub use polygon::{BoundaryPolygon, Side};
pub use presets::{
    containment_area_size_preset, containment_volume_size_preset, BoundaryPreset,
    StringGeometry,
};
pub use volume::{containment_volume_size, containment_volume_size_xy, BoundaryPrism};
