//! Vehicle description and motion model
//!
//! Includes the immutable vehicle geometry and the discrete kinematic bicycle
//! model that advances vehicle state one tick at a time.

pub mod geometry;
pub mod kinematic_bicycle_model;

pub use geometry::*;
pub use kinematic_bicycle_model::*;
