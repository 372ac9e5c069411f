pub mod calculator;
pub mod constants;
pub mod containment;
pub mod cuts;
pub mod rotation;
pub mod trackgeom_errors;
pub mod trajectory;

pub use calculator::{
    cherenkov_cone, closest_approach, is_on_track, time_residual, OpticalConstants,
};
pub use trackgeom_errors::TrackGeomError;
pub use trajectory::{Trajectory, TrajectoryShape};
