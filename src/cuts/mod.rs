//! # Hit cuts
//!
//! Classification of the hits of an event against a reconstructed [`Trajectory`] and
//! the summary statistics built on top of it.
//!
//! ## Pipeline
//!
//! 1. Every hit is paired with the position of its sensor (a hit on a sensor absent
//!    from the [`SensorMap`] is an error).
//! 2. The hit gets a **time residual** (measured minus expected Cherenkov arrival, see
//!    [`time_residual`](crate::calculator::time_residual)) and a **projection** of the
//!    sensor position on the track direction.
//! 3. The residual is compared with the direct-hit window `(t1, t2)`:
//!    * `t1 < residual < t2` → [`HitClass::Direct`],
//!    * `residual < t1` → [`HitClass::Early`],
//!    * `residual > t2` → [`HitClass::Late`],
//!    * `residual` equal to `t1` or `t2` → [`HitClass::Edge`],
//!    * NaN → [`HitClass::Undefined`].
//! 4. [`track_cuts::TrackCuts`] and [`cascade_cuts::CascadeCuts`] aggregate the classes.
//!
//! ## Configuration
//!
//! [`CutsParams`] gathers the window, the optical constants and the sensor axis. It is
//! built with a validating fluent builder:
//!
//! ```rust
//! use trackgeom::cuts::{CutsParams, DirectHitWindow};
//!
//! let params = CutsParams::builder()
//!     .window(DirectHitWindow::C)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.window.bounds(), (-15.0, 75.0));
//! ```
use std::cmp::Ordering::{Greater, Less};
use std::fmt;

use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    calculator::{cherenkov_cone, default_sensor_axis, OpticalConstants},
    constants::{Hit, HitSeriesMap, Nanosecond, Radian, SensorKey, SensorMap},
    trackgeom_errors::TrackGeomError,
    trajectory::Trajectory,
};

pub mod cascade_cuts;
pub mod statistics;
pub mod track_cuts;

pub use cascade_cuts::{calculate_cascade_cuts, CascadeCuts};
pub use track_cuts::{calculate_track_cuts, TrackCuts};

/// Time-residual window of direct (unscattered) hits, in nanoseconds.
///
/// The lettered presets share an early edge of −15 ns and widen the late edge:
///
/// | preset | window (ns)  |
/// |--------|--------------|
/// | `A`    | (−15, 15)    |
/// | `B`    | (−15, 25)    |
/// | `C`    | (−15, 75)    |
/// | `D`    | (−15, 125)   |
/// | `E`    | (−15, 250)   |
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DirectHitWindow {
    A,
    #[default]
    B,
    C,
    D,
    E,
    Custom { t1: Nanosecond, t2: Nanosecond },
}

impl DirectHitWindow {
    /// `(t1, t2)` of the window.
    pub fn bounds(&self) -> (Nanosecond, Nanosecond) {
        match *self {
            DirectHitWindow::A => (-15.0, 15.0),
            DirectHitWindow::B => (-15.0, 25.0),
            DirectHitWindow::C => (-15.0, 75.0),
            DirectHitWindow::D => (-15.0, 125.0),
            DirectHitWindow::E => (-15.0, 250.0),
            DirectHitWindow::Custom { t1, t2 } => (t1, t2),
        }
    }

    /// Class of a hit with the given time residual.
    pub fn classify(&self, residual: Nanosecond) -> HitClass {
        let (t1, t2) = self.bounds();
        if residual.is_nan() {
            HitClass::Undefined
        } else if residual < t1 {
            HitClass::Early
        } else if residual > t2 {
            HitClass::Late
        } else if residual > t1 && residual < t2 {
            HitClass::Direct
        } else {
            // exactly on a window edge
            HitClass::Edge
        }
    }
}

/// Where a hit falls relative to the direct-hit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitClass {
    Early,
    Direct,
    Late,
    /// Residual equal to `t1` or `t2`; neither direct, early nor late.
    Edge,
    /// The light cone cannot reach the sensor.
    Undefined,
}

/// Parameters shared by the track and cascade cuts.
///
/// Fields
/// -----------------
/// * `window` – direct-hit time-residual window.
/// * `optics` – refractive indices used for the expected arrival times.
/// * `sensor_axis` – pointing direction of the sensors, used for the arrival angles.
///
/// Defaults
/// -----------------
/// * `window`: [`DirectHitWindow::B`] (−15, 25) ns
/// * `optics`: deep glacial ice, see [`OpticalConstants::default`]
/// * `sensor_axis`: straight down, `(0, 0, −1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutsParams {
    pub window: DirectHitWindow,
    pub optics: OpticalConstants,
    pub sensor_axis: Unit<Vector3<f64>>,
}

impl CutsParams {
    /// Equivalent to [`CutsParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CutsParamsBuilder {
        CutsParamsBuilder::new()
    }
}

impl Default for CutsParams {
    fn default() -> Self {
        CutsParams {
            window: DirectHitWindow::default(),
            optics: OpticalConstants::default(),
            sensor_axis: default_sensor_axis(),
        }
    }
}

impl fmt::Display for CutsParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (t1, t2) = self.window.bounds();
        write!(
            f,
            "CutsParams(window=({t1:.1}, {t2:.1}) ns, n_group={:.5}, n_phase={:.5}, axis=({:.3}, {:.3}, {:.3}))",
            self.optics.group_index,
            self.optics.phase_index,
            self.sensor_axis.x,
            self.sensor_axis.y,
            self.sensor_axis.z
        )
    }
}

/// Builder for [`CutsParams`], with validation.
#[derive(Debug, Clone)]
pub struct CutsParamsBuilder {
    params: CutsParams,
    raw_axis: Option<Vector3<f64>>,
}

impl Default for CutsParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CutsParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: CutsParams::default(),
            raw_axis: None,
        }
    }

    pub fn window(mut self, window: DirectHitWindow) -> Self {
        self.params.window = window;
        self
    }

    /// Shorthand for `window(DirectHitWindow::Custom { t1, t2 })`.
    pub fn time_window(mut self, t1: Nanosecond, t2: Nanosecond) -> Self {
        self.params.window = DirectHitWindow::Custom { t1, t2 };
        self
    }

    pub fn optics(mut self, optics: OpticalConstants) -> Self {
        self.params.optics = optics;
        self
    }

    /// Sensor pointing direction; normalized by [`build`](Self::build).
    pub fn sensor_axis(mut self, axis: Vector3<f64>) -> Self {
        self.raw_axis = Some(axis);
        self
    }

    #[inline]
    fn gt(x: f64, bound: f64) -> bool {
        x.partial_cmp(&bound) == Some(Greater)
    }

    #[inline]
    fn lt(a: f64, b: f64) -> bool {
        a.partial_cmp(&b) == Some(Less)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `t1 < t2`, both finite.
    /// * `phase_index > 1` – below 1 no Cherenkov cone exists.
    /// * `group_index > 0`.
    /// * `sensor_axis` finite and non-zero.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(CutsParams)` or `Err(TrackGeomError::InvalidCutsParameter)` naming the
    ///   first rule that failed.
    pub fn build(mut self) -> Result<CutsParams, TrackGeomError> {
        let (t1, t2) = self.params.window.bounds();
        if !(t1.is_finite() && t2.is_finite() && Self::lt(t1, t2)) {
            return Err(TrackGeomError::InvalidCutsParameter(
                "time window requires finite t1 < t2".into(),
            ));
        }
        if !Self::gt(self.params.optics.phase_index, 1.0) {
            return Err(TrackGeomError::InvalidCutsParameter(
                "phase_index must be > 1".into(),
            ));
        }
        if !Self::gt(self.params.optics.group_index, 0.0) {
            return Err(TrackGeomError::InvalidCutsParameter(
                "group_index must be > 0".into(),
            ));
        }

        if let Some(axis) = self.raw_axis {
            let norm = axis.norm();
            if !(norm.is_finite() && Self::gt(norm, 0.0)) {
                return Err(TrackGeomError::InvalidCutsParameter(
                    "sensor_axis must be finite and non-zero".into(),
                ));
            }
            self.params.sensor_axis = Unit::new_normalize(axis);
        }

        Ok(self.params)
    }
}

/// A hit with everything the cuts need to know about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub sensor: SensorKey,
    pub hit: Hit,
    pub position: Point3<f64>,
    /// Measured minus expected arrival time (ns).
    pub residual: Nanosecond,
    /// `(position − vertex) · direction` (m).
    pub projection: f64,
    /// Arrival angle of the Cherenkov light on the sensor axis (rad).
    pub approach_angle: Radian,
    pub class: HitClass,
}

/// Look up the position of a sensor.
pub(crate) fn sensor_position(
    sensors: &SensorMap,
    key: &SensorKey,
) -> Result<Point3<f64>, TrackGeomError> {
    sensors
        .get(key)
        .copied()
        .ok_or(TrackGeomError::UnknownSensor(*key))
}

/// Residual, projection and class of every hit of the event.
///
/// Arguments
/// ---------
/// * `trajectory`: the reconstruction hypothesis.
/// * `sensors`: sensor positions.
/// * `hits`: hits per sensor.
/// * `params`: window, optics and sensor axis.
///
/// Return
/// ------
/// * One [`HitRecord`] per hit, in sensor order then hit order, or
///   `UnknownSensor` for the first sensor without a position.
pub fn classify_hits(
    trajectory: &Trajectory,
    sensors: &SensorMap,
    hits: &HitSeriesMap,
    params: &CutsParams,
) -> Result<Vec<HitRecord>, TrackGeomError> {
    let direction = trajectory.direction.into_inner();
    let mut records = Vec::with_capacity(hits.values().map(|h| h.len()).sum());

    for (key, series) in hits {
        let position = sensor_position(sensors, key)?;
        let cone = cherenkov_cone(trajectory, &position, &params.optics, &params.sensor_axis);
        let projection = (position - trajectory.position).dot(&direction);

        records.extend(series.iter().map(|hit| {
            let residual = hit.time - trajectory.time - cone.time;
            HitRecord {
                sensor: *key,
                hit: *hit,
                position,
                residual,
                projection,
                approach_angle: cone.approach_angle,
                class: params.window.classify(residual),
            }
        }));
    }

    Ok(records)
}
