//! Kinematic bicycle model
//!
//! Discrete-time bicycle kinematics about the rear axle with a linear
//! velocity-dependent resistance on the longitudinal channel:
//!
//! ```text
//! friction  = v * (c_r + c_a * v)
//! v'        = v + dt * (a - friction)
//! omega     = v * tan(delta) / L
//! yaw'      = normalize(yaw + dt * omega)
//! x', y'    = x + dt * v * cos(yaw), y + dt * v * sin(yaw)
//! ```
//!
//! The longitudinal command is an acceleration [m/s^2]. With both resistance
//! coefficients at zero it is applied unchanged.
//!
//! Ref:
//!     - PythonRobotics: https://github.com/AtsushiSakai/PythonRobotics

use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::{normalize_angle, ControlCommand, MotionModel, Pose, SimError, SimResult, VehicleState};
use crate::vehicle::VehicleGeometry;

/// Time integration scheme of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Everything is computed from the state at the start of the tick
    ExplicitEuler,
    /// Velocity is updated first and drives the yaw rate and the position;
    /// the position also uses the updated yaw
    SemiImplicitEuler,
}

impl Default for Integrator {
    fn default() -> Self {
        Integrator::ExplicitEuler
    }
}

/// Bicycle kinematic motion model with a fixed time step
#[derive(Debug, Clone)]
pub struct KinematicBicycleModel {
    geometry: VehicleGeometry,
    dt: f64,
    integrator: Integrator,
}

impl KinematicBicycleModel {
    pub fn new(geometry: VehicleGeometry, dt: f64) -> SimResult<Self> {
        geometry.validate()?;
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "time step must be positive, got {}",
                dt
            )));
        }
        debug!(
            "Kinematic bicycle model: wheelbase {:.3} m, max steer {:.3} rad, dt {} s",
            geometry.wheelbase, geometry.max_steer, dt
        );
        Ok(Self {
            geometry,
            dt,
            integrator: Integrator::default(),
        })
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn geometry(&self) -> &VehicleGeometry {
        &self.geometry
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// Advance `state` by one time step.
    ///
    /// `steering_angle` is clamped to the vehicle limits before use; the
    /// returned state carries the realised angle and the resulting yaw rate.
    pub fn update(&self, state: &VehicleState, acceleration: f64, steering_angle: f64) -> VehicleState {
        let dt = self.dt;
        let VehicleState { pose, velocity, .. } = *state;

        let friction = velocity * (self.geometry.rolling_resistance + self.geometry.drag_coefficient * velocity);
        let new_velocity = velocity + dt * (acceleration - friction);

        let steering_angle = self.geometry.clamp_steering(steering_angle);

        match self.integrator {
            Integrator::ExplicitEuler => {
                let angular_velocity = self.angular_velocity(velocity, steering_angle);
                VehicleState {
                    pose: Pose {
                        x: pose.x + dt * velocity * pose.yaw.cos(),
                        y: pose.y + dt * velocity * pose.yaw.sin(),
                        yaw: normalize_angle(pose.yaw + dt * angular_velocity),
                    },
                    velocity: new_velocity,
                    steering_angle,
                    angular_velocity,
                }
            }
            Integrator::SemiImplicitEuler => {
                let angular_velocity = self.angular_velocity(new_velocity, steering_angle);
                let new_yaw = normalize_angle(pose.yaw + dt * angular_velocity);
                VehicleState {
                    pose: Pose {
                        x: pose.x + dt * new_velocity * new_yaw.cos(),
                        y: pose.y + dt * new_velocity * new_yaw.sin(),
                        yaw: new_yaw,
                    },
                    velocity: new_velocity,
                    steering_angle,
                    angular_velocity,
                }
            }
        }
    }

    fn angular_velocity(&self, velocity: f64, steering_angle: f64) -> f64 {
        if steering_angle == 0.0 {
            return 0.0;
        }
        velocity * steering_angle.tan() / self.geometry.wheelbase
    }
}

impl MotionModel for KinematicBicycleModel {
    fn time_step(&self) -> f64 {
        self.dt
    }

    fn propagate(&self, state: &VehicleState, command: &ControlCommand) -> VehicleState {
        self.update(state, command.acceleration, command.steering_angle)
    }
}
