//! Common types used throughout kbm_stanley

use crate::common::angle::normalize_angle;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

/// Planar pose of the rear axle centre: position [m] and heading [rad].
///
/// The heading is kept in (-pi, pi] by every constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw: normalize_angle(yaw) }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, yaw: 0.0 }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Point `offset` metres ahead of the pose along its heading
    pub fn ahead(&self, offset: f64) -> Point2D {
        Point2D::new(self.x + offset * self.yaw.cos(), self.y + offset * self.yaw.sin())
    }
}

/// Full vehicle state for one simulation tick.
///
/// `steering_angle` is the physically realised (clamped) angle and
/// `angular_velocity` is derived by the motion model; both are outputs of the
/// previous tick and are read back by the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub pose: Pose,
    /// Signed longitudinal velocity [m/s]
    pub velocity: f64,
    /// Steering angle [rad]
    pub steering_angle: f64,
    /// Yaw rate [rad/s]
    pub angular_velocity: f64,
}

impl VehicleState {
    pub fn new(x: f64, y: f64, yaw: f64, velocity: f64) -> Self {
        Self {
            pose: Pose::new(x, y, yaw),
            velocity,
            steering_angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    pub fn at_rest(pose: Pose) -> Self {
        Self {
            pose,
            velocity: 0.0,
            steering_angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.pose.x
    }

    pub fn y(&self) -> f64 {
        self.pose.y
    }

    pub fn yaw(&self) -> f64 {
        self.pose.yaw
    }
}

/// Command handed from the tracker to the motion model within one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlCommand {
    /// Longitudinal acceleration command [m/s^2]
    pub acceleration: f64,
    /// Requested steering angle [rad]
    pub steering_angle: f64,
}

impl ControlCommand {
    pub fn new(acceleration: f64, steering_angle: f64) -> Self {
        Self { acceleration, steering_angle }
    }

    pub fn zero() -> Self {
        Self { acceleration: 0.0, steering_angle: 0.0 }
    }
}

/// Diagnostics of one tracking step, for display only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingResult {
    /// Index of the path sample nearest to the front axle
    pub target_index: usize,
    /// Signed lateral distance of the front axle from the path [m]
    pub crosstrack_error: f64,
    /// Path heading minus vehicle heading [rad]
    pub heading_error: f64,
    /// Steering contribution of the cross-track term [rad]
    pub crosstrack_term: f64,
}

/// Ordered list of 2D waypoints
#[derive(Debug, Clone, Default)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}
