//! Waypoint input and plotting helpers

pub mod visualization;
pub mod waypoints;

pub use visualization::{colors, PathStyle, PointStyle, Visualizer};
pub use waypoints::{load_waypoints, read_waypoints};
