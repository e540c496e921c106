// Reference path generation

pub mod cubic_spline_planner;

pub use cubic_spline_planner::*;
