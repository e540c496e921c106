use std::path::PathBuf;

use kbm_stanley::config::SimulationConfig;
use kbm_stanley::simulation::{Simulation, Tick};
use kbm_stanley::utils::waypoints::load_waypoints;
use kbm_stanley::{
    calc_spline_course, BoundaryCondition, KinematicBicycleModel, Pose, SimResult, StanleyConfig,
    StanleyController, VehicleGeometry, VehicleState,
};

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn test_crosstrack_error_converges_on_straight_path() {
    let path = calc_spline_course(&[0.0, 60.0, 120.0], &[0.0, 0.0, 0.0], 0.01, BoundaryCondition::Natural).unwrap();
    let geometry = VehicleGeometry::default();
    let model = KinematicBicycleModel::new(geometry, 0.02).unwrap();
    let gains = StanleyConfig {
        k: 8.0,
        k_soft: 1.0,
        k_yaw_rate: 0.0,
        k_damp_steer: 0.0,
    };
    let tracker = StanleyController::new(gains, &geometry).unwrap();
    let simulation = Simulation::new(model, tracker, &path, 5.0, 1.0).unwrap();

    let ticks: Vec<Tick> = simulation
        .run(VehicleState::new(0.0, 2.0, 0.0, 5.0), 500)
        .collect::<SimResult<_>>()
        .unwrap();
    assert_eq!(ticks.len(), 500);

    let signed: Vec<f64> = ticks.iter().map(|t| t.tracking.crosstrack_error).collect();
    let errors: Vec<f64> = signed.iter().map(|e| e.abs()).collect();
    assert!((errors[0] - 2.0).abs() < 1e-6);

    // Strictly shrinking on every tick until the error first changes sign.
    let first_crossing = signed
        .iter()
        .position(|e| e.signum() != signed[0].signum())
        .unwrap();
    assert!(first_crossing > 1);
    for pair in errors[..first_crossing].windows(2) {
        assert!(pair[1] < pair[0], "cross-track error grew before the first crossing");
    }

    // Sampled every half second. After the zero crossing the error overshoots by
    // a few millimetres, which the slack absorbs.
    let sampled: Vec<f64> = errors.iter().step_by(25).copied().collect();
    for pair in sampled.windows(2) {
        assert!(pair[1] <= pair[0] + 0.01, "cross-track error grew: {:?}", sampled);
    }
    assert!(sampled[1] < sampled[0]);
    assert!(*errors.last().unwrap() < 0.02, "final error {}", errors.last().unwrap());

    // Speed is held and the vehicle ends up pointing along the path.
    let last = ticks.last().unwrap();
    assert!((last.state.velocity - 5.0).abs() < 1e-9);
    assert!(last.state.yaw().abs() < 0.05);
    assert!(last.state.y().abs() < 0.1);
}

#[test]
fn test_follows_course_from_files() {
    let config = SimulationConfig::load(manifest_path("config/simulation.toml")).unwrap();
    let waypoints = load_waypoints(manifest_path("data/waypoints.csv")).unwrap();
    assert_eq!(waypoints.len(), 9);

    let path = config.build_path(&waypoints).unwrap();
    let model = config.build_model().unwrap();
    let tracker = config.build_tracker().unwrap();
    let simulation = Simulation::new(model, tracker, &path, config.target_speed, config.speed_gain)
        .unwrap()
        .with_goal_tolerance(config.goal_tolerance);

    let initial = VehicleState::at_rest(Pose::new(path.x[0], path.y[0], path.yaw[0]));
    let ticks: Vec<Tick> = simulation
        .run(initial, config.max_ticks)
        .collect::<SimResult<_>>()
        .unwrap();

    let last = ticks.last().unwrap();
    assert!(ticks.len() < config.max_ticks, "goal not reached");
    assert!(simulation.is_goal_reached(last));

    let max_error = ticks
        .iter()
        .map(|t| t.tracking.crosstrack_error.abs())
        .fold(0.0, f64::max);
    assert!(max_error < 1.0, "max cross-track error {}", max_error);

    let max_steer = config.vehicle.max_steer;
    assert!(ticks.iter().all(|t| t.state.steering_angle.abs() <= max_steer));
    assert!(ticks.iter().all(|t| t.state.yaw() > -std::f64::consts::PI && t.state.yaw() <= std::f64::consts::PI));
}

#[test]
fn test_reference_path_is_shared_across_threads() {
    let path = calc_spline_course(&[0.0, 20.0, 40.0], &[0.0, 5.0, 0.0], 0.05, BoundaryCondition::Natural).unwrap();
    let config = SimulationConfig::default();

    let handles: Vec<_> = [1.0, -1.0]
        .iter()
        .map(|&offset| {
            let path = path.clone();
            let config = config.clone();
            std::thread::spawn(move || {
                let simulation = Simulation::new(
                    config.build_model().unwrap(),
                    config.build_tracker().unwrap(),
                    &path,
                    5.0,
                    1.0,
                )
                .unwrap();
                simulation
                    .run(VehicleState::new(0.0, offset, path.yaw[0], 5.0), 200)
                    .last()
                    .unwrap()
                    .unwrap()
                    .state
            })
        })
        .collect();

    for handle in handles {
        let state = handle.join().unwrap();
        assert!(state.x() > 10.0);
    }
}
