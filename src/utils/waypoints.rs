//! Waypoint table reader
//!
//! Expects a CSV file with an `x,y` header (`X,Y` is accepted too) and one
//! waypoint per row, in driving order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::common::{Path2D, Point2D, SimResult};

#[derive(Debug, Deserialize)]
struct WaypointRecord {
    #[serde(alias = "X")]
    x: f64,
    #[serde(alias = "Y")]
    y: f64,
}

/// Read waypoints from any CSV source
pub fn read_waypoints<R: Read>(reader: R) -> SimResult<Path2D> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut waypoints = Path2D::new();
    for record in rdr.deserialize() {
        let record: WaypointRecord = record?;
        waypoints.push(Point2D::new(record.x, record.y));
    }
    Ok(waypoints)
}

/// Read waypoints from a CSV file
pub fn load_waypoints<P: AsRef<Path>>(path: P) -> SimResult<Path2D> {
    let path = path.as_ref();
    let waypoints = read_waypoints(File::open(path)?)?;
    info!("Loaded {} waypoints from {}", waypoints.len(), path.display());
    Ok(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SimError;

    #[test]
    fn test_read_lowercase_header() {
        let csv = "x,y\n0.0,0.0\n10.0, -6.0\n20.5,5.0\n";
        let waypoints = read_waypoints(csv.as_bytes()).unwrap();
        assert_eq!(waypoints.len(), 3);
        assert_eq!(waypoints.points[1], Point2D::new(10.0, -6.0));
    }

    #[test]
    fn test_read_uppercase_header() {
        let csv = "X,Y\n1,2\n3,4\n";
        let waypoints = read_waypoints(csv.as_bytes()).unwrap();
        assert_eq!(waypoints.x_coords(), vec![1.0, 3.0]);
        assert_eq!(waypoints.y_coords(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_read_malformed_row() {
        let csv = "x,y\n1,2\nthree,4\n";
        assert!(matches!(read_waypoints(csv.as_bytes()), Err(SimError::CsvError(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_waypoints("does/not/exist.csv"),
            Err(SimError::IoError(_))
        ));
    }
}
