//! Stanley path tracking controller
//!
//! Steers the front axle onto the reference path by combining the heading
//! error with a speed-normalised cross-track correction, plus optional
//! yaw-rate and steering-rate damping.
//!
//! author: Atsushi Sakai (@Atsushi_twi)
//!         Ryohei Sasaki (@rsasaki0109)
//! Ref:
//!     - [Stanley: The robot that won the DARPA grand challenge](http://isl.ecst.csuchico.edu/DOCS/darpa2005/DARPA%202005%20Stanley.pdf)
//!     - [Autonomous Automobile Path Tracking](https://www.ri.cmu.edu/pub_files/2009/2/Automatic_Steering_Methods_for_Autonomous_Automobile_Path_Tracking.pdf)

use log::{debug, trace};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::common::{normalize_angle, PathTracker, Pose, SimError, SimResult, TrackingResult, VehicleState};
use crate::path_planning::ReferencePath;
use crate::vehicle::VehicleGeometry;

/// Gains of the Stanley controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanleyConfig {
    /// Cross-track gain
    pub k: f64,
    /// Softening gain, keeps the cross-track term finite at standstill
    pub k_soft: f64,
    /// Yaw-rate damping gain
    pub k_yaw_rate: f64,
    /// Steering-rate damping gain
    pub k_damp_steer: f64,
}

impl Default for StanleyConfig {
    fn default() -> Self {
        Self {
            k: 8.0,
            k_soft: 1.0,
            k_yaw_rate: 0.01,
            k_damp_steer: 0.0,
        }
    }
}

/// Stanley steering controller.
///
/// Holds only gains and vehicle constants; the path and the previous steering
/// angle are passed in on every call.
#[derive(Debug, Clone)]
pub struct StanleyController {
    config: StanleyConfig,
    wheelbase: f64,
    max_steer: f64,
}

impl StanleyController {
    pub fn new(config: StanleyConfig, geometry: &VehicleGeometry) -> SimResult<Self> {
        geometry.validate()?;
        if !(config.k_soft > 0.0 && config.k_soft.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "softening gain must be positive, got {}",
                config.k_soft
            )));
        }
        let gains = [
            ("k", config.k),
            ("k_yaw_rate", config.k_yaw_rate),
            ("k_damp_steer", config.k_damp_steer),
        ];
        for (name, gain) in gains.iter() {
            if !gain.is_finite() {
                return Err(SimError::InvalidParameter(format!("{} must be finite, got {}", name, gain)));
            }
        }
        debug!("Stanley controller: {:?}", config);

        Ok(Self {
            config,
            wheelbase: geometry.wheelbase,
            max_steer: geometry.max_steer,
        })
    }

    pub fn config(&self) -> &StanleyConfig {
        &self.config
    }

    /// Nearest path sample to the front axle (first one on ties) and the
    /// signed cross-track error there.
    pub fn calc_target_index(&self, pose: &Pose, path: &ReferencePath) -> SimResult<(usize, f64)> {
        let front = pose.ahead(self.wheelbase);

        let (target_index, _) = path
            .x
            .iter()
            .zip(&path.y)
            .map(|(px, py)| (front.x - px).hypot(front.y - py))
            .enumerate()
            .min_by_key(|&(_, d)| OrderedFloat(d))
            .ok_or_else(|| SimError::InvalidPath("reference path is empty".to_string()))?;

        // Project the error onto the lateral axis pointing to the vehicle's right.
        let dx = front.x - path.x[target_index];
        let dy = front.y - path.y[target_index];
        let crosstrack_error = dx * pose.yaw.sin() - dy * pose.yaw.cos();

        Ok((target_index, crosstrack_error))
    }

    /// Steering angle and diagnostics for the current tick
    pub fn stanley_control(&self, state: &VehicleState, path: &ReferencePath) -> SimResult<(f64, TrackingResult)> {
        let (target_index, crosstrack_error) = self.calc_target_index(&state.pose, path)?;
        let previous_steer = state.steering_angle;

        let heading_error = normalize_angle(path.yaw[target_index] - state.pose.yaw);
        let crosstrack_term = (self.config.k * crosstrack_error).atan2(self.config.k_soft + state.velocity);
        let yaw_rate_term = self.config.k_yaw_rate * (-state.velocity * previous_steer.sin()) / self.wheelbase;

        let mut steering = heading_error + crosstrack_term + yaw_rate_term;
        steering += self.config.k_damp_steer * (steering - previous_steer);
        let steering = steering.clamp(-self.max_steer, self.max_steer);

        trace!(
            "target {} crosstrack {:.4} heading {:.4} steering {:.4}",
            target_index, crosstrack_error, heading_error, steering
        );

        Ok((
            steering,
            TrackingResult {
                target_index,
                crosstrack_error,
                heading_error,
                crosstrack_term,
            },
        ))
    }
}

impl PathTracker for StanleyController {
    fn compute_steering(&self, state: &VehicleState, path: &ReferencePath) -> SimResult<(f64, TrackingResult)> {
        self.stanley_control(state, path)
    }
}
