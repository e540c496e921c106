//! Physical constants of the simulated vehicle

use serde::{Deserialize, Serialize};

use crate::common::{SimError, SimResult};

/// Fixed physical description of a car-like vehicle.
///
/// The reference point of the vehicle is the rear axle centre. Defaults describe a
/// mid-size saloon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleGeometry {
    /// Distance between front and rear axle centres [m]
    pub wheelbase: f64,
    /// Mechanical steering limit, symmetric [rad]
    pub max_steer: f64,
    /// Bumper-to-bumper length [m]
    pub overall_length: f64,
    /// Body width [m]
    pub overall_width: f64,
    /// Distance from the rear bumper to the rear axle [m]
    pub rear_overhang: f64,
    /// [m]
    pub tyre_diameter: f64,
    /// [m]
    pub tyre_width: f64,
    /// Distance between left and right wheel centres [m]
    pub axle_track: f64,
    /// Linear rolling-resistance coefficient [1/s]
    pub rolling_resistance: f64,
    /// Aerodynamic drag coefficient [1/m]
    pub drag_coefficient: f64,
}

impl Default for VehicleGeometry {
    fn default() -> Self {
        let wheelbase = 2.96;
        let overall_length = 4.97;
        Self {
            wheelbase,
            max_steer: 33.0_f64.to_radians(),
            overall_length,
            overall_width: 1.964,
            rear_overhang: 0.5 * (overall_length - wheelbase),
            tyre_diameter: 0.4826,
            tyre_width: 0.265,
            axle_track: 1.7,
            rolling_resistance: 0.0,
            drag_coefficient: 0.0,
        }
    }
}

impl VehicleGeometry {
    /// Default body with the given wheelbase and steering limit
    pub fn new(wheelbase: f64, max_steer: f64) -> SimResult<Self> {
        let geometry = Self {
            wheelbase,
            max_steer,
            ..Self::default()
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn with_resistance(mut self, rolling_resistance: f64, drag_coefficient: f64) -> Self {
        self.rolling_resistance = rolling_resistance;
        self.drag_coefficient = drag_coefficient;
        self
    }

    /// Reject geometry that would produce NaN/Inf or meaningless kinematics
    pub fn validate(&self) -> SimResult<()> {
        if !(self.wheelbase > 0.0 && self.wheelbase.is_finite()) {
            return Err(SimError::InvalidGeometry(format!(
                "wheelbase must be a positive length, got {}",
                self.wheelbase
            )));
        }
        if !(self.max_steer >= 0.0 && self.max_steer.is_finite()) {
            return Err(SimError::InvalidGeometry(format!(
                "max steering angle must be non-negative, got {}",
                self.max_steer
            )));
        }

        let dimensions = [
            ("overall length", self.overall_length),
            ("overall width", self.overall_width),
            ("rear overhang", self.rear_overhang),
            ("tyre diameter", self.tyre_diameter),
            ("tyre width", self.tyre_width),
            ("axle track", self.axle_track),
            ("rolling resistance", self.rolling_resistance),
            ("drag coefficient", self.drag_coefficient),
        ];
        for (name, value) in dimensions.iter() {
            if !(*value >= 0.0 && value.is_finite()) {
                return Err(SimError::InvalidGeometry(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Clamp a requested steering angle to the mechanical limits
    pub fn clamp_steering(&self, steering_angle: f64) -> f64 {
        steering_angle.clamp(-self.max_steer, self.max_steer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_valid() {
        let geometry = VehicleGeometry::default();
        assert!(geometry.validate().is_ok());
        assert!((geometry.rear_overhang - 1.005).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_wheelbase() {
        for wheelbase in [0.0, -2.5, f64::NAN, f64::INFINITY].iter() {
            let result = VehicleGeometry::new(*wheelbase, 0.5);
            assert!(matches!(result, Err(SimError::InvalidGeometry(_))));
        }
    }

    #[test]
    fn test_rejects_negative_dimensions() {
        let geometry = VehicleGeometry {
            tyre_width: -0.1,
            ..VehicleGeometry::default()
        };
        assert!(matches!(geometry.validate(), Err(SimError::InvalidGeometry(_))));
        assert!(VehicleGeometry::new(2.5, -0.1).is_err());
    }

    #[test]
    fn test_clamp_steering() {
        let geometry = VehicleGeometry::new(2.5, 0.5).unwrap();
        assert_eq!(geometry.clamp_steering(0.2), 0.2);
        assert_eq!(geometry.clamp_steering(10.0), 0.5);
        assert_eq!(geometry.clamp_steering(-10.0), -0.5);
    }
}
