//! kbm_stanley - kinematic bicycle model with Stanley path tracking
//!
//! This crate provides the numerical core of a single-vehicle path tracking
//! simulation: a cubic spline reference path generator, a discrete kinematic
//! bicycle model and a Stanley steering controller, plus a tick driver that
//! composes them.

// Core modules
pub mod common;
pub mod utils;
pub mod config;

// Algorithm modules
pub mod path_planning;
pub mod path_tracking;
pub mod vehicle;
pub mod simulation;

// Re-export common types for convenience
pub use common::{Point2D, Pose, VehicleState, Path2D, ControlCommand, TrackingResult};
pub use common::{MotionModel, PathTracker, normalize_angle};
pub use common::{SimError, SimResult};
pub use path_planning::{calc_spline_course, BoundaryCondition, ReferencePath, Spline2D};
pub use path_tracking::{StanleyConfig, StanleyController};
pub use vehicle::{Integrator, KinematicBicycleModel, VehicleGeometry};
