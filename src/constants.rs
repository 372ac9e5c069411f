//! # Constants and type definitions for trackgeom
//!
//! This module centralizes the **physical constants**, **numerical tolerances**, and
//! **common type definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - Optical properties of the detector medium (refractive indices, speed of light)
//! - Numerical tolerances used by the geometric predicates
//! - Type aliases for the units used across the crate (meters, nanoseconds, radians)
//! - Identifiers and containers for sensors and their hits
//!
//! ## Units
//!
//! All lengths are expressed in **meters**, all times in **nanoseconds** and all angles
//! in **radians**. Charges are in photo-electrons but the algorithms only use them as
//! relative weights.

use std::collections::BTreeMap;

use ahash::AHashMap;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// 2π, useful for angle wrapping
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Speed of light in vacuum, meters per nanosecond
pub const C_VACUUM: f64 = 0.299_792_458;

/// Phase refractive index of deep glacial ice at 400 nm
pub const N_ICE_PHASE: f64 = 1.3195;

/// Group refractive index of deep glacial ice at 400 nm
pub const N_ICE_GROUP: f64 = 1.356_34;

// -------------------------------------------------------------------------------------------------
// Numerical tolerances
// -------------------------------------------------------------------------------------------------

/// Angles closer than this to zero are snapped to exactly zero by the angular predicates.
pub const ANGLE_SNAP: f64 = 5.0 * f64::EPSILON;

/// Relative tolerance used when deciding that a point lies on a polygon edge.
pub const BOUNDARY_EPS: f64 = 1e-12;

/// Default tolerance (meters) for [`crate::calculator::is_on_track`].
pub const ON_TRACK_TOLERANCE: f64 = 1e-6;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Time in nanoseconds
pub type Nanosecond = f64;

/// Identifier of a boundary group (a physical string of sensors).
pub type StringId = i32;

// -------------------------------------------------------------------------------------------------
// Sensors and hits
// -------------------------------------------------------------------------------------------------

/// Identity of a sensor: the string it hangs on and its position along the string.
///
/// The `string` component doubles as the sensor's *boundary group* when counting how many
/// distinct strings saw light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorKey {
    pub string: StringId,
    pub module: u32,
}

impl SensorKey {
    pub fn new(string: StringId, module: u32) -> Self {
        SensorKey { string, module }
    }
}

impl std::fmt::Display for SensorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.string, self.module)
    }
}

impl From<(StringId, u32)> for SensorKey {
    fn from((string, module): (StringId, u32)) -> Self {
        SensorKey { string, module }
    }
}

/// A single timestamped signal recorded by a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Arrival time (ns)
    pub time: Nanosecond,
    /// Amplitude, used as a relative weight
    pub charge: f64,
}

impl Hit {
    pub fn new(time: Nanosecond, charge: f64) -> Self {
        Hit { time, charge }
    }
}

/// A small, inline-optimized container for the hits of a single sensor.
pub type Hits = SmallVec<[Hit; 4]>;

/// Hits of an event keyed by sensor.
pub type HitSeriesMap = BTreeMap<SensorKey, Hits>;

/// Sensor positions keyed by sensor.
pub type SensorMap = AHashMap<SensorKey, Point3<f64>>;
