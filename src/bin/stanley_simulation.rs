//
// Path tracking simulation with Stanley steering control, proportional speed
// control and a kinematic bicycle model.
//
// usage: stanley_simulation [config.toml] [waypoints.csv]
//
// Without a waypoint file a built-in course is used. The result is written to
// img/path_tracking/stanley_simulation.png.

use std::env;
use std::error::Error;

use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use kbm_stanley::config::SimulationConfig;
use kbm_stanley::simulation::Simulation;
use kbm_stanley::utils::visualization::{colors, PathStyle, PointStyle, Visualizer};
use kbm_stanley::utils::waypoints::load_waypoints;
use kbm_stanley::{Path2D, Point2D, Pose, VehicleState};

const OUTPUT_DIR: &str = "img/path_tracking";
// Free space around the course [m]
const MAP_MARGIN: f64 = 10.0;

fn default_waypoints() -> Path2D {
    Path2D::from_points(
        [
            (0.0, 0.0),
            (30.0, 0.0),
            (50.0, 15.0),
            (45.0, 40.0),
            (20.0, 45.0),
            (0.0, 30.0),
            (-5.0, 10.0),
        ]
        .iter()
        .map(|&p| Point2D::from(p))
        .collect(),
    )
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let waypoints = match args.get(2) {
        Some(path) => load_waypoints(path)?,
        None => default_waypoints(),
    };

    let path = config.build_path(&waypoints)?;
    info!("Reference path: {} samples", path.len());

    let model = config.build_model()?;
    let tracker = config.build_tracker()?;
    let simulation = Simulation::new(model, tracker, &path, config.target_speed, config.speed_gain)?
        .with_goal_tolerance(config.goal_tolerance);

    let initial = VehicleState::at_rest(Pose::new(path.x[0], path.y[0], path.yaw[0]));

    // The trajectory is kept for drawing only.
    let mut trajectory_x = vec![initial.x()];
    let mut trajectory_y = vec![initial.y()];
    let mut last = None;
    for tick in simulation.run(initial, config.max_ticks) {
        let tick = tick?;
        trajectory_x.push(tick.state.x());
        trajectory_y.push(tick.state.y());
        last = Some(tick);
    }

    let last = match last {
        Some(tick) => tick,
        None => {
            info!("No ticks simulated");
            return Ok(());
        }
    };
    info!(
        "Finished at t = {:.2} s, speed {:.2} m/s, cross-track error {:.3} m",
        last.time, last.state.velocity, last.tracking.crosstrack_error
    );

    let mut vis = Visualizer::new();
    vis.set_title("Stanley Controller Path Tracking")
        .frame_xy(&path.x, &path.y, MAP_MARGIN);
    vis.plot_reference_path(&path)
        .plot_points_xy(
            &waypoints.x_coords(),
            &waypoints.y_coords(),
            &PointStyle::new(colors::WAYPOINT, "Waypoints"),
        )
        .plot_path_xy(
            &trajectory_x,
            &trajectory_y,
            &PathStyle::new(colors::TRAJECTORY, "Trajectory").with_line_width(1.0),
        )
        .plot_point(
            path.position(last.tracking.target_index),
            &PointStyle::new(colors::TARGET, "Target").with_symbol('+').with_size(2.0),
        )
        .plot_vehicle(&last.state, &config.vehicle);

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let output_path = format!("{}/stanley_simulation.png", OUTPUT_DIR);
    vis.save_png(&output_path, 800, 600)?;
    info!("Stanley simulation saved to: {}", output_path);
    Ok(())
}

fn main() {
    if let Err(e) = TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("logger init failed: {}", e);
    }

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
