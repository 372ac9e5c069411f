//! Order statistics over hit projections and the charge-weighted center of gravity.
use itertools::Itertools;
use nalgebra::{Point3, Vector3};
use tracing::warn;

use crate::{
    constants::{HitSeriesMap, SensorMap},
    cuts::sensor_position,
    trackgeom_errors::TrackGeomError,
    trajectory::null_point,
};

/// Smoothness of a set of projections along the track.
///
/// After sorting, `N = count − 1` and for `j = 1..N−1`
///
/// ```text
/// S_j = j / N − (p[j] − p[0]) / (p[N] − p[0])
/// ```
///
/// compares the rank fraction of each inner point with its distance fraction. The
/// result is the `S_j` of largest magnitude, sign included. Equally spaced points give
/// exactly 0; points bunched towards the far end give a negative value, towards the
/// near end a positive one.
///
/// Return
/// ------
/// * The signed smoothness in `[-1, 1]`, NaN for fewer than 3 points or a zero span.
pub fn smoothness(projections: &[f64]) -> f64 {
    if projections.len() < 3 {
        return f64::NAN;
    }
    let sorted = projections
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect::<Vec<_>>();

    let n = sorted.len() - 1;
    let first = sorted[0];
    let span = sorted[n] - first;
    if !(span > 0.0) {
        return f64::NAN;
    }

    sorted[1..n]
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1) as f64 / n as f64 - (p - first) / span)
        .fold(0.0, |best: f64, s| if s.abs() > best.abs() { s } else { best })
}

/// Extent of a set of projections, `max − min`; NaN when empty.
pub fn length(projections: &[f64]) -> f64 {
    projections
        .iter()
        .copied()
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .map_or(f64::NAN, |(min, max)| max - min)
}

/// Charge-weighted mean sensor position over all hits.
///
/// Each hit contributes its sensor position with its charge as weight. Non-finite
/// charges count as zero. When the total charge is zero the mean is unweighted.
///
/// Return
/// ------
/// * The center of gravity, the null point for an event without hits, or
///   `UnknownSensor` for a sensor without a position.
pub fn center_of_gravity(
    sensors: &SensorMap,
    hits: &HitSeriesMap,
) -> Result<Point3<f64>, TrackGeomError> {
    let mut weighted = Vector3::zeros();
    let mut plain = Vector3::zeros();
    let mut total_charge = 0.0;
    let mut count = 0usize;

    for (key, series) in hits {
        if series.is_empty() {
            continue;
        }
        let position = sensor_position(sensors, key)?.coords;
        for hit in series {
            let charge = if hit.charge.is_finite() {
                hit.charge
            } else {
                warn!(sensor = %key, charge = hit.charge, "non-finite charge counted as zero");
                0.0
            };
            weighted += position * charge;
            plain += position;
            total_charge += charge;
            count += 1;
        }
    }

    if count == 0 {
        return Ok(null_point());
    }
    if total_charge == 0.0 {
        return Ok(Point3::from(plain / count as f64));
    }
    Ok(Point3::from(weighted / total_charge))
}
