//! Named detector boundaries.
//!
//! A [`BoundaryPreset`] is an ordered list of the strings forming the outer ring of a
//! detector configuration. The string positions themselves come from the caller through
//! the [`StringGeometry`] lookup, so the presets carry no coordinates.
use std::str::FromStr;

use itertools::Itertools;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Meter, SensorMap, StringId},
    containment::{
        area::containment_area_size,
        polygon::BoundaryPolygon,
        volume::{containment_volume_size, BoundaryPrism},
    },
    trackgeom_errors::TrackGeomError,
    trajectory::Trajectory,
};

/// Outer strings of the 86-string configuration, walking around the array.
const IC86_OUTER: [StringId; 28] = [
    1, 2, 3, 4, 5, 6, 13, 21, 30, 40, 50, 59, 67, 74, 73, 72, 78, 77, 76, 75, 68, 60, 51, 41, 31,
    22, 14, 7,
];

/// Outer strings of the 79-string configuration.
const IC79_OUTER: [StringId; 27] = [
    2, 3, 4, 5, 6, 13, 21, 30, 40, 50, 59, 67, 74, 73, 72, 78, 77, 76, 75, 68, 60, 51, 41, 32, 23,
    15, 8,
];

/// Where the strings of a detector are.
pub trait StringGeometry {
    /// Horizontal position of the string, `None` if the string is unknown.
    fn string_position(&self, string: StringId) -> Option<Point2<f64>>;

    /// Lowest and highest sensor depth on the string, `None` if the string is unknown.
    fn string_extent(&self, string: StringId) -> Option<(Meter, Meter)>;
}

impl StringGeometry for SensorMap {
    /// Mean horizontal position of the sensors on the string.
    fn string_position(&self, string: StringId) -> Option<Point2<f64>> {
        let (sum, count) = self
            .iter()
            .filter(|(key, _)| key.string == string)
            .fold((Vector2::zeros(), 0usize), |(sum, count), (_, p)| {
                (sum + p.xy().coords, count + 1)
            });
        (count > 0).then(|| Point2::from(sum / count as f64))
    }

    fn string_extent(&self, string: StringId) -> Option<(Meter, Meter)> {
        self.iter()
            .filter(|(key, _)| key.string == string)
            .map(|(_, p)| p.z)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
    }
}

/// Named outer boundaries of the standard detector configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryPreset {
    IC86Outer,
    IC79Outer,
}

impl BoundaryPreset {
    /// Boundary strings in polygon order.
    pub fn strings(&self) -> &'static [StringId] {
        match self {
            BoundaryPreset::IC86Outer => &IC86_OUTER,
            BoundaryPreset::IC79Outer => &IC79_OUTER,
        }
    }

    /// The horizontal boundary polygon, vertices in the order of [`Self::strings`].
    ///
    /// Return
    /// ------
    /// * The polygon, or `UnknownString` for the first string missing from `geometry`,
    ///   or the polygon validation error.
    pub fn polygon<G: StringGeometry + ?Sized>(
        &self,
        geometry: &G,
    ) -> Result<BoundaryPolygon, TrackGeomError> {
        let vertices = self
            .strings()
            .iter()
            .map(|&s| {
                geometry
                    .string_position(s)
                    .ok_or(TrackGeomError::UnknownString(s))
            })
            .collect::<Result<Vec<_>, _>>()?;
        BoundaryPolygon::from_ordered(vertices)
    }

    /// The boundary prism, spanning the deepest to the shallowest sensor of the
    /// boundary strings.
    pub fn prism<G: StringGeometry + ?Sized>(
        &self,
        geometry: &G,
    ) -> Result<BoundaryPrism, TrackGeomError> {
        let polygon = self.polygon(geometry)?;
        let (z_low, z_high) = self.strings().iter().try_fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(low, high), &s| {
                let (l, h) = geometry
                    .string_extent(s)
                    .ok_or(TrackGeomError::UnknownString(s))?;
                Ok::<_, TrackGeomError>((low.min(l), high.max(h)))
            },
        )?;
        BoundaryPrism::new(polygon, z_low, z_high)
    }
}

impl std::fmt::Display for BoundaryPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryPreset::IC86Outer => write!(f, "IC86Outer"),
            BoundaryPreset::IC79Outer => write!(f, "IC79Outer"),
        }
    }
}

impl FromStr for BoundaryPreset {
    type Err = TrackGeomError;

    /// Case-insensitive, `-` and `_` are ignored: `"IC86Outer"`, `"ic86_outer"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "ic86outer" => Ok(BoundaryPreset::IC86Outer),
            "ic79outer" => Ok(BoundaryPreset::IC79Outer),
            _ => Err(TrackGeomError::UnknownPreset(s.to_string())),
        }
    }
}

/// [`containment_area_size`] on the polygon of a preset.
pub fn containment_area_size_preset<G: StringGeometry + ?Sized>(
    trajectory: &Trajectory,
    preset: BoundaryPreset,
    geometry: &G,
    z: Meter,
) -> Result<f64, TrackGeomError> {
    Ok(containment_area_size(trajectory, &preset.polygon(geometry)?, z))
}

/// [`containment_volume_size`] on the prism of a preset.
pub fn containment_volume_size_preset<G: StringGeometry + ?Sized>(
    trajectory: &Trajectory,
    preset: BoundaryPreset,
    geometry: &G,
) -> Result<f64, TrackGeomError> {
    Ok(containment_volume_size(trajectory, &preset.prism(geometry)?))
}
