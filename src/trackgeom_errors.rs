use thiserror::Error;

use crate::constants::{SensorKey, StringId};

#[derive(Error, Debug)]
pub enum TrackGeomError {
    #[error("A boundary polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("Coordinate lists have different lengths: {0} x values, {1} y values")]
    MismatchedCoordinates(usize, usize),

    #[error("Boundary polygon has a non-finite vertex at index {0}")]
    NonFiniteVertex(usize),

    #[error("Boundary polygon has zero area")]
    DegeneratePolygon,

    #[error("Boundary polygon edges {0} and {1} intersect")]
    SelfIntersecting(usize, usize),

    #[error("Invalid vertical extent: z_low = {0}, z_high = {1}")]
    InvalidVerticalExtent(f64, f64),

    #[error("Hit recorded on a sensor missing from the geometry: {0}")]
    UnknownSensor(SensorKey),

    #[error("No geometry available for boundary string {0}")]
    UnknownString(StringId),

    #[error("Unknown boundary preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid cuts parameter: {0}")]
    InvalidCutsParameter(String),
}

impl PartialEq for TrackGeomError {
    fn eq(&self, other: &Self) -> bool {
        use TrackGeomError::*;
        match (self, other) {
            (TooFewVertices(a), TooFewVertices(b)) => a == b,
            (MismatchedCoordinates(a1, a2), MismatchedCoordinates(b1, b2)) => {
                a1 == b1 && a2 == b2
            }
            (NonFiniteVertex(a), NonFiniteVertex(b)) => a == b,
            (SelfIntersecting(a1, a2), SelfIntersecting(b1, b2)) => a1 == b1 && a2 == b2,
            // NaN extents never compare equal, matching f64 semantics
            (InvalidVerticalExtent(a1, a2), InvalidVerticalExtent(b1, b2)) => {
                a1 == b1 && a2 == b2
            }
            (UnknownSensor(a), UnknownSensor(b)) => a == b,
            (UnknownString(a), UnknownString(b)) => a == b,
            (UnknownPreset(a), UnknownPreset(b)) => a == b,
            (InvalidCutsParameter(a), InvalidCutsParameter(b)) => a == b,

            (DegeneratePolygon, DegeneratePolygon) => true,

            _ => false,
        }
    }
}
