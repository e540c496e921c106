//! Common traits at the seams between the motion model, the tracker and the
//! tick driver

use crate::common::error::SimResult;
use crate::common::types::*;
use crate::path_planning::ReferencePath;

/// Trait for vehicle motion models advancing state by one fixed time step
pub trait MotionModel {
    /// Fixed integration step [s]
    fn time_step(&self) -> f64;

    /// Propagate state forward by one time step.
    ///
    /// Never fails: out-of-range commands are clamped and the realised values
    /// are reported in the returned state.
    fn propagate(&self, state: &VehicleState, command: &ControlCommand) -> VehicleState;
}

/// Trait for path tracking algorithms computing a steering command
pub trait PathTracker {
    /// Compute the (clamped) steering angle that drives the vehicle onto the path,
    /// together with the tracking diagnostics of this step.
    ///
    /// `state.steering_angle` is read as the previous tick's steering.
    fn compute_steering(
        &self,
        state: &VehicleState,
        path: &ReferencePath,
    ) -> SimResult<(f64, TrackingResult)>;
}
