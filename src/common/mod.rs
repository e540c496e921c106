//! Common types, traits, and error definitions for kbm_stanley
//!
//! This module provides the value records passed between the spline planner,
//! the motion model and the tracker.

pub mod angle;
pub mod types;
pub mod traits;
pub mod error;

pub use angle::*;
pub use types::*;
pub use traits::*;
pub use error::*;
