//! Simulation parameters loaded from TOML
//!
//! Every section is optional; missing values fall back to the defaults.
//! Angles are in radians.
//!
//! ```toml
//! dt = 0.02
//! target_speed = 10.0
//!
//! [vehicle]
//! wheelbase = 2.96
//! max_steer = 0.5759586531581288
//!
//! [controller]
//! k = 8.0
//! k_soft = 1.0
//!
//! [path]
//! ds = 0.05
//! boundary_condition = "natural"
//! ```

use std::fs::read_to_string;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::{Path2D, SimError, SimResult};
use crate::path_planning::{calc_spline_course, BoundaryCondition, ReferencePath};
use crate::path_tracking::{StanleyConfig, StanleyController};
use crate::vehicle::{Integrator, KinematicBicycleModel, VehicleGeometry};

/// Reference path sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Arc-length sampling interval [m]
    pub ds: f64,
    pub boundary_condition: BoundaryCondition,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            ds: 0.05,
            boundary_condition: BoundaryCondition::Natural,
        }
    }
}

/// All tunable parameters of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation time step [s]
    pub dt: f64,
    pub integrator: Integrator,
    /// Cruise speed [m/s]
    pub target_speed: f64,
    /// Proportional speed gain [1/s]
    pub speed_gain: f64,
    /// Upper bound on the number of ticks of one run
    pub max_ticks: usize,
    /// Distance to the end of the path at which a run stops [m]
    pub goal_tolerance: f64,
    pub vehicle: VehicleGeometry,
    pub controller: StanleyConfig,
    pub path: PathConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 50.0,
            integrator: Integrator::ExplicitEuler,
            target_speed: 10.0,
            speed_gain: 1.0,
            max_ticks: 2500,
            goal_tolerance: 0.5,
            vehicle: VehicleGeometry::default(),
            controller: StanleyConfig::default(),
            path: PathConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> SimResult<Self> {
        let config: SimulationConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let path = path.as_ref();
        debug!("Loading simulation config from {}", path.display());
        let params_str = read_to_string(path)?;
        Self::from_toml_str(&params_str)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.vehicle.validate()?;
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimError::InvalidParameter(format!("dt must be positive, got {}", self.dt)));
        }
        if !(self.path.ds > 0.0 && self.path.ds.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "path.ds must be positive, got {}",
                self.path.ds
            )));
        }
        if !(self.goal_tolerance >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "goal_tolerance must be non-negative, got {}",
                self.goal_tolerance
            )));
        }
        Ok(())
    }

    pub fn build_model(&self) -> SimResult<KinematicBicycleModel> {
        Ok(KinematicBicycleModel::new(self.vehicle, self.dt)?.with_integrator(self.integrator))
    }

    pub fn build_tracker(&self) -> SimResult<StanleyController> {
        StanleyController::new(self.controller, &self.vehicle)
    }

    pub fn build_path(&self, waypoints: &Path2D) -> SimResult<ReferencePath> {
        calc_spline_course(
            &waypoints.x_coords(),
            &waypoints.y_coords(),
            self.path.ds,
            self.path.boundary_condition,
        )
    }
}
