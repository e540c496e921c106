//! Visualization utilities for kbm_stanley
//!
//! Provides a small gnuplot front end for drawing the reference path, the
//! driven trajectory and the vehicle body. Plot calls only record layers; the
//! gnuplot figure is built when the plot is saved.

use itertools::Itertools;
use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PlotOption, PointSize, PointSymbol};

use crate::common::{Point2D, Pose, SimError, SimResult, VehicleState};
use crate::path_planning::ReferencePath;
use crate::vehicle::VehicleGeometry;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GOLD: &str = "#FFD700";

    // Semantic colors
    pub const REFERENCE: &str = GOLD;
    pub const TRAJECTORY: &str = BLUE;
    pub const WAYPOINT: &str = GREEN;
    pub const TARGET: &str = RED;
    pub const VEHICLE: &str = BLACK;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::REFERENCE, "Reference path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// Closed polygons of the vehicle body and its four wheels in the ground frame
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleOutline {
    pub body: Vec<Point2D>,
    /// Front left, front right, rear left, rear right
    pub wheels: Vec<Vec<Point2D>>,
}

fn rectangle(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Vec<Point2D> {
    vec![
        Point2D::new(x_min, y_max),
        Point2D::new(x_max, y_max),
        Point2D::new(x_max, y_min),
        Point2D::new(x_min, y_min),
        Point2D::new(x_min, y_max),
    ]
}

fn transform(points: &[Point2D], angle: f64, offset: Point2D) -> Vec<Point2D> {
    let (sin, cos) = angle.sin_cos();
    points
        .iter()
        .map(|p| Point2D::new(p.x * cos - p.y * sin + offset.x, p.x * sin + p.y * cos + offset.y))
        .collect()
}

/// Body and wheel outlines for a vehicle whose rear axle centre is at `pose`
pub fn vehicle_outline(geometry: &VehicleGeometry, pose: &Pose, steering_angle: f64) -> VehicleOutline {
    let body = rectangle(
        -geometry.rear_overhang,
        geometry.overall_length - geometry.rear_overhang,
        -0.5 * geometry.overall_width,
        0.5 * geometry.overall_width,
    );
    let radius = 0.5 * geometry.tyre_diameter;
    let half_width = 0.5 * geometry.tyre_width;
    let wheel = rectangle(-radius, radius, -half_width, half_width);
    let half_track = 0.5 * geometry.axle_track;

    let wheel_centres = [
        (Point2D::new(geometry.wheelbase, half_track), steering_angle),
        (Point2D::new(geometry.wheelbase, -half_track), steering_angle),
        (Point2D::new(0.0, half_track), 0.0),
        (Point2D::new(0.0, -half_track), 0.0),
    ];
    let wheels = wheel_centres
        .iter()
        .map(|(centre, steer)| {
            let local = transform(&wheel, *steer, *centre);
            transform(&local, pose.yaw, pose.position())
        })
        .collect();

    VehicleOutline {
        body: transform(&body, pose.yaw, pose.position()),
        wheels,
    }
}

enum Layer {
    Lines { x: Vec<f64>, y: Vec<f64>, style: PathStyle },
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
}

/// Main visualizer struct
pub struct Visualizer {
    layers: Vec<Layer>,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    /// Create a new visualizer
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            title: String::new(),
            x_range: None,
            y_range: None,
        }
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Set X axis range
    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    /// Set Y axis range
    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Fix both axis ranges to the bounding box of `x`, `y` grown by `margin`.
    /// Empty input leaves the ranges on auto.
    pub fn frame_xy(&mut self, x: &[f64], y: &[f64], margin: f64) -> &mut Self {
        if let (Some((x_min, x_max)), Some((y_min, y_max))) = (bounds(x), bounds(y)) {
            self.set_x_range(x_min - margin, x_max + margin);
            self.set_y_range(y_min - margin, y_max + margin);
        }
        self
    }

    /// Number of recorded layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Plot a polyline from x,y vectors
    pub fn plot_path_xy(&mut self, x: &[f64], y: &[f64], style: &PathStyle) -> &mut Self {
        self.layers.push(Layer::Lines {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Plot the sampled reference path
    pub fn plot_reference_path(&mut self, path: &ReferencePath) -> &mut Self {
        self.plot_path_xy(&path.x, &path.y, &PathStyle::default())
    }

    /// Plot points from x,y vectors
    pub fn plot_points_xy(&mut self, x: &[f64], y: &[f64], style: &PointStyle) -> &mut Self {
        self.layers.push(Layer::Points {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Plot a single point (target, start, etc.)
    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.plot_points_xy(&[point.x], &[point.y], style)
    }

    /// Plot the vehicle body and wheels at the given state
    pub fn plot_vehicle(&mut self, state: &VehicleState, geometry: &VehicleGeometry) -> &mut Self {
        let outline = vehicle_outline(geometry, &state.pose, state.steering_angle);
        let body_style = PathStyle::new(colors::VEHICLE, "Vehicle").with_line_width(1.5);
        let wheel_style = PathStyle::new(colors::VEHICLE, "").with_line_width(1.0);

        let (x, y): (Vec<f64>, Vec<f64>) = outline.body.iter().map(|p| (p.x, p.y)).unzip();
        self.plot_path_xy(&x, &y, &body_style);
        for wheel in &outline.wheels {
            let (x, y): (Vec<f64>, Vec<f64>) = wheel.iter().map(|p| (p.x, p.y)).unzip();
            self.plot_path_xy(&x, &y, &wheel_style);
        }
        self
    }

    /// Save plot to PNG file
    pub fn save_png(&self, path: &str, width: u32, height: u32) -> SimResult<()> {
        let mut figure = self.render();
        figure
            .save_to_png(path, width, height)
            .map_err(|e| SimError::VisualizationError(e.to_string()))
    }

    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        {
            let axes = figure.axes2d();
            for layer in &self.layers {
                match layer {
                    Layer::Lines { x, y, style } => {
                        let mut options: Vec<PlotOption<&str>> =
                            vec![Color(style.color.as_str()), LineWidth(style.line_width)];
                        if !style.caption.is_empty() {
                            options.push(Caption(style.caption.as_str()));
                        }
                        axes.lines(x, y, &options);
                    }
                    Layer::Points { x, y, style } => {
                        let mut options: Vec<PlotOption<&str>> = vec![
                            Color(style.color.as_str()),
                            PointSymbol(style.symbol),
                            PointSize(style.size),
                        ];
                        if !style.caption.is_empty() {
                            options.push(Caption(style.caption.as_str()));
                        }
                        axes.points(x, y, &options);
                    }
                }
            }

            if !self.title.is_empty() {
                axes.set_title(&self.title, &[]);
            }
            axes.set_x_label("X [m]", &[]);
            axes.set_y_label("Y [m]", &[]);

            if let Some((min, max)) = self.x_range {
                axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
            }
            if let Some((min, max)) = self.y_range {
                axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
            }
            axes.set_aspect_ratio(AutoOption::Fix(1.0));
        }
        figure
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().copied().minmax().into_option()
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_visualizer_creation() {
        let vis = Visualizer::new();
        assert!(vis.x_range.is_none());
        assert_eq!(vis.layer_count(), 0);
    }

    #[test]
    fn test_frame_xy() {
        let mut vis = Visualizer::new();
        vis.frame_xy(&[3.0, -1.0, 2.0], &[0.5, 4.0, 1.0], 2.0);
        assert_eq!(vis.x_range, Some((-3.0, 5.0)));
        assert_eq!(vis.y_range, Some((-1.5, 6.0)));

        let mut vis = Visualizer::new();
        vis.frame_xy(&[], &[], 2.0);
        assert!(vis.x_range.is_none());
        assert!(vis.y_range.is_none());
    }

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_plot_vehicle_adds_body_and_wheels() {
        let mut vis = Visualizer::new();
        vis.plot_vehicle(&VehicleState::new(0.0, 0.0, 0.0, 0.0), &VehicleGeometry::default());
        assert_eq!(vis.layer_count(), 5);
    }

    #[test]
    fn test_outline_at_origin() {
        let geometry = VehicleGeometry::default();
        let outline = vehicle_outline(&geometry, &Pose::origin(), 0.0);

        assert_eq!(outline.body.len(), 5);
        assert_eq!(outline.body.first(), outline.body.last());
        assert_abs_diff_eq!(outline.body[0].x, -geometry.rear_overhang, epsilon = 1e-12);
        assert_abs_diff_eq!(outline.body[0].y, 0.5 * geometry.overall_width, epsilon = 1e-12);
        assert_abs_diff_eq!(
            outline.body[1].x,
            geometry.overall_length - geometry.rear_overhang,
            epsilon = 1e-12
        );

        let front_left = &outline.wheels[0];
        let centre_x = front_left[..4].iter().map(|p| p.x).sum::<f64>() / 4.0;
        let centre_y = front_left[..4].iter().map(|p| p.y).sum::<f64>() / 4.0;
        assert_abs_diff_eq!(centre_x, geometry.wheelbase, epsilon = 1e-12);
        assert_abs_diff_eq!(centre_y, 0.5 * geometry.axle_track, epsilon = 1e-12);

        let rear_right = &outline.wheels[3];
        let centre_y = rear_right[..4].iter().map(|p| p.y).sum::<f64>() / 4.0;
        assert_abs_diff_eq!(centre_y, -0.5 * geometry.axle_track, epsilon = 1e-12);
    }

    #[test]
    fn test_outline_rotates_with_pose() {
        let geometry = VehicleGeometry::default();
        let outline = vehicle_outline(&geometry, &Pose::new(1.0, 2.0, PI / 2.0), 0.0);
        // Rear-left corner (-overhang, +w/2) maps to (1 - w/2, 2 - overhang).
        assert_abs_diff_eq!(outline.body[0].x, 1.0 - 0.5 * geometry.overall_width, epsilon = 1e-9);
        assert_abs_diff_eq!(outline.body[0].y, 2.0 - geometry.rear_overhang, epsilon = 1e-9);
    }
}
