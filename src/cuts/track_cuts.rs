//! Quality variables of a track reconstruction.
use std::fmt;

use ahash::AHashSet;

use crate::{
    constants::{HitSeriesMap, SensorMap},
    cuts::{
        classify_hits,
        statistics::{length, smoothness},
        CutsParams, HitClass,
    },
    trackgeom_errors::TrackGeomError,
    trajectory::Trajectory,
};

/// Summary of how well the hits of an event follow a track hypothesis.
///
/// Fields
/// -----------------
/// * `nchan` – sensors with at least one hit.
/// * `nhit` – total number of hits.
/// * `nstring` – distinct strings among the hit sensors.
/// * `ndir` – direct hits, time residual strictly inside the window.
/// * `ldir` – spread of the direct-hit projections along the track (m), NaN without
///   direct hits.
/// * `sdir` – smoothness of the direct-hit projections.
/// * `sall` – smoothness of the projections of all hits.
///
/// Display
/// -----------------
/// * `{}` – one line, `nchan=.., nhit=.., ...`.
/// * `{:#}` – one field per line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackCuts {
    pub nchan: usize,
    pub nhit: usize,
    pub nstring: usize,
    pub ndir: usize,
    pub ldir: f64,
    pub sdir: f64,
    pub sall: f64,
}

/// Compute the [`TrackCuts`] of an event.
///
/// Arguments
/// ---------
/// * `trajectory`: the track hypothesis.
/// * `sensors`: position of every sensor that may appear in `hits`.
/// * `hits`: hits per sensor.
/// * `params`: direct-hit window and optical constants.
///
/// Return
/// ------
/// * The cuts, or `UnknownSensor` for a hit sensor missing from `sensors`.
pub fn calculate_track_cuts(
    trajectory: &Trajectory,
    sensors: &SensorMap,
    hits: &HitSeriesMap,
    params: &CutsParams,
) -> Result<TrackCuts, TrackGeomError> {
    let records = classify_hits(trajectory, sensors, hits, params)?;

    let nchan = hits.values().filter(|series| !series.is_empty()).count();
    let nstring = records
        .iter()
        .map(|r| r.sensor.string)
        .collect::<AHashSet<_>>()
        .len();

    let all_projections: Vec<f64> = records.iter().map(|r| r.projection).collect();
    let direct_projections: Vec<f64> = records
        .iter()
        .filter(|r| r.class == HitClass::Direct)
        .map(|r| r.projection)
        .collect();

    Ok(TrackCuts {
        nchan,
        nhit: records.len(),
        nstring,
        ndir: direct_projections.len(),
        ldir: length(&direct_projections),
        sdir: smoothness(&direct_projections),
        sall: smoothness(&all_projections),
    })
}

impl fmt::Display for TrackCuts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Track cuts")?;
            writeln!(f, "----------")?;
            writeln!(f, "nchan   : {}", self.nchan)?;
            writeln!(f, "nhit    : {}", self.nhit)?;
            writeln!(f, "nstring : {}", self.nstring)?;
            writeln!(f, "ndir    : {}", self.ndir)?;
            writeln!(f, "ldir    : {:.2} m", self.ldir)?;
            writeln!(f, "sdir    : {:.4}", self.sdir)?;
            write!(f, "sall    : {:.4}", self.sall)
        } else {
            write!(
                f,
                "nchan={}, nhit={}, nstring={}, ndir={}, ldir={:.2}, sdir={:.4}, sall={:.4}",
                self.nchan, self.nhit, self.nstring, self.ndir, self.ldir, self.sdir, self.sall
            )
        }
    }
}
