//! Error types for kbm_stanley

use thiserror::Error;

/// Main error type for path generation, vehicle modelling and tracking
#[derive(Debug, Error)]
pub enum SimError {
    /// Waypoints cannot be turned into a reference path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    /// Vehicle geometry is not physically meaningful
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Invalid tuning or simulation parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Spline evaluated outside of its fitted arc-length range
    #[error("Arc length {s} is outside of the spline range [{min}, {max}]")]
    OutOfRange { s: f64, min: f64, max: f64 },
    /// Numerical computation failed (singular spline system, etc.)
    #[error("Numerical error: {0}")]
    NumericalError(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Waypoint file could not be parsed
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
    /// Visualization error
    #[error("Visualization error: {0}")]
    VisualizationError(String),
}

/// Result type alias for simulation operations
pub type SimResult<T> = Result<T, SimError>;
