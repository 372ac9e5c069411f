//! Quality variables of a cascade (point-like) reconstruction.
use std::fmt;

use ahash::AHashSet;

use crate::{
    constants::{HitSeriesMap, SensorMap},
    cuts::{classify_hits, CutsParams, HitClass},
    trackgeom_errors::TrackGeomError,
    trajectory::Trajectory,
};

/// Hit counts of an event against a cascade hypothesis.
///
/// Fields
/// -----------------
/// * `nchan` – sensors with at least one hit.
/// * `nhit` – total number of hits.
/// * `n_1hit` – sensors with exactly one hit.
/// * `nstring` – distinct strings among the hit sensors.
/// * `ndir` – hits with a residual strictly inside the window.
/// * `nearly` – hits earlier than the window.
/// * `nlate` – hits later than the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeCuts {
    pub nchan: usize,
    pub nhit: usize,
    pub n_1hit: usize,
    pub nstring: usize,
    pub ndir: usize,
    pub nearly: usize,
    pub nlate: usize,
}

/// Compute the [`CascadeCuts`] of an event.
///
/// The hypothesis is usually [`Trajectory::point_like`], in which case the expected
/// arrival is the straight-line propagation from the vertex at the group speed. Any
/// track shape is accepted and uses the Cherenkov cone instead.
///
/// Return
/// ------
/// * The cuts, or `UnknownSensor` for a hit sensor missing from `sensors`.
pub fn calculate_cascade_cuts(
    trajectory: &Trajectory,
    sensors: &SensorMap,
    hits: &HitSeriesMap,
    params: &CutsParams,
) -> Result<CascadeCuts, TrackGeomError> {
    let records = classify_hits(trajectory, sensors, hits, params)?;

    let mut cuts = CascadeCuts {
        nchan: hits.values().filter(|series| !series.is_empty()).count(),
        n_1hit: hits.values().filter(|series| series.len() == 1).count(),
        nhit: records.len(),
        nstring: records
            .iter()
            .map(|r| r.sensor.string)
            .collect::<AHashSet<_>>()
            .len(),
        ..Default::default()
    };

    for record in &records {
        match record.class {
            HitClass::Direct => cuts.ndir += 1,
            HitClass::Early => cuts.nearly += 1,
            HitClass::Late => cuts.nlate += 1,
            HitClass::Edge | HitClass::Undefined => {}
        }
    }

    Ok(cuts)
}

impl fmt::Display for CascadeCuts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nchan={}, nhit={}, n_1hit={}, nstring={}, ndir={}, nearly={}, nlate={}",
            self.nchan, self.nhit, self.n_1hit, self.nstring, self.ndir, self.nearly, self.nlate
        )
    }
}
