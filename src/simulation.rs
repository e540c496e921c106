//! Tick driver tying the tracker and the motion model together
//!
//! One tick is: tracker -> speed control -> motion model. The driver owns no
//! vehicle state; the caller passes the current state in and gets the next one
//! back, so the same code serves a batch test harness and a render loop.

use log::{debug, info};

use crate::common::{ControlCommand, MotionModel, PathTracker, SimError, SimResult, TrackingResult, VehicleState};
use crate::path_planning::ReferencePath;

/// Proportional speed control, returns an acceleration command [m/s^2]
pub fn proportional_control(target: f64, current: f64, kp: f64) -> f64 {
    kp * (target - current)
}

/// Output of one simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Elapsed simulated time at the end of the tick [s]
    pub time: f64,
    /// Command that was applied during the tick
    pub command: ControlCommand,
    /// Tracker diagnostics computed from the state at the start of the tick
    pub tracking: TrackingResult,
    /// State at the end of the tick
    pub state: VehicleState,
}

/// Path tracking simulation over a shared, immutable reference path
pub struct Simulation<'a, M, T> {
    model: M,
    tracker: T,
    path: &'a ReferencePath,
    target_speed: f64,
    speed_gain: f64,
    goal_tolerance: f64,
}

impl<'a, M: MotionModel, T: PathTracker> Simulation<'a, M, T> {
    pub fn new(model: M, tracker: T, path: &'a ReferencePath, target_speed: f64, speed_gain: f64) -> SimResult<Self> {
        if path.is_empty() {
            return Err(SimError::InvalidPath("reference path is empty".to_string()));
        }
        if !(target_speed.is_finite() && speed_gain >= 0.0 && speed_gain.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "invalid speed control (target {}, gain {})",
                target_speed, speed_gain
            )));
        }
        Ok(Self {
            model,
            tracker,
            path,
            target_speed,
            speed_gain,
            goal_tolerance: 0.0,
        })
    }

    /// Also stop once the rear axle is this close to the last path sample [m]
    pub fn with_goal_tolerance(mut self, goal_tolerance: f64) -> Self {
        self.goal_tolerance = goal_tolerance;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn path(&self) -> &ReferencePath {
        self.path
    }

    /// Advance one tick from `state`
    pub fn step(&self, state: &VehicleState) -> SimResult<Tick> {
        let (steering_angle, tracking) = self.tracker.compute_steering(state, self.path)?;
        let acceleration = proportional_control(self.target_speed, state.velocity, self.speed_gain);
        let command = ControlCommand::new(acceleration, steering_angle);
        let next = self.model.propagate(state, &command);

        Ok(Tick {
            time: self.model.time_step(),
            command,
            tracking,
            state: next,
        })
    }

    /// True once the vehicle targets the last path sample or is within the goal
    /// tolerance of it
    pub fn is_goal_reached(&self, tick: &Tick) -> bool {
        let last = self.path.last_index();
        tick.tracking.target_index >= last
            || tick.state.pose.position().distance(&self.path.position(last)) < self.goal_tolerance
    }

    /// Lazily run ticks from `initial` until the goal is reached, an error
    /// occurs, or `max_ticks` ticks have been produced
    pub fn run(&self, initial: VehicleState, max_ticks: usize) -> Run<'_, 'a, M, T> {
        debug!("Running up to {} ticks over {} path samples", max_ticks, self.path.len());
        Run {
            simulation: self,
            state: initial,
            ticks: 0,
            max_ticks,
            finished: false,
        }
    }
}

/// Iterator over the ticks of a simulation run
pub struct Run<'s, 'a, M, T> {
    simulation: &'s Simulation<'a, M, T>,
    state: VehicleState,
    ticks: usize,
    max_ticks: usize,
    finished: bool,
}

impl<'s, 'a, M: MotionModel, T: PathTracker> Run<'s, 'a, M, T> {
    /// State after the last produced tick
    pub fn state(&self) -> &VehicleState {
        &self.state
    }
}

impl<'s, 'a, M: MotionModel, T: PathTracker> Iterator for Run<'s, 'a, M, T> {
    type Item = SimResult<Tick>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.ticks >= self.max_ticks {
            return None;
        }

        match self.simulation.step(&self.state) {
            Ok(mut tick) => {
                self.ticks += 1;
                tick.time = self.ticks as f64 * self.simulation.model.time_step();
                self.state = tick.state;
                if self.simulation.is_goal_reached(&tick) {
                    info!("Goal reached after {:.2} s", tick.time);
                    self.finished = true;
                }
                Some(Ok(tick))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::{calc_spline_course, BoundaryCondition};
    use crate::path_tracking::{StanleyConfig, StanleyController};
    use crate::vehicle::{KinematicBicycleModel, VehicleGeometry};
    use approx::assert_abs_diff_eq;

    fn straight_path(length: f64) -> ReferencePath {
        calc_spline_course(&[0.0, length], &[0.0, 0.0], 0.1, BoundaryCondition::Natural).unwrap()
    }

    fn simulation(path: &ReferencePath) -> Simulation<'_, KinematicBicycleModel, StanleyController> {
        let geometry = VehicleGeometry::default();
        let model = KinematicBicycleModel::new(geometry, 0.02).unwrap();
        let tracker = StanleyController::new(StanleyConfig::default(), &geometry).unwrap();
        Simulation::new(model, tracker, path, 5.0, 1.0).unwrap()
    }

    #[test]
    fn test_proportional_control() {
        assert_eq!(proportional_control(10.0, 4.0, 0.5), 3.0);
        assert_eq!(proportional_control(5.0, 5.0, 1.0), 0.0);
    }

    #[test]
    fn test_step_matches_manual_composition() {
        let path = straight_path(50.0);
        let sim = simulation(&path);
        let state = VehicleState::new(0.0, 1.0, 0.1, 3.0);

        let tick = sim.step(&state).unwrap();
        let (steering, tracking) = sim.tracker().compute_steering(&state, &path).unwrap();
        let expected = sim.model().update(&state, 2.0, steering);

        assert_eq!(tick.tracking, tracking);
        assert_abs_diff_eq!(tick.command.acceleration, 2.0, epsilon = 1e-12);
        assert_eq!(tick.state, expected);
    }

    #[test]
    fn test_run_stops_at_goal() {
        let path = straight_path(20.0);
        let sim = simulation(&path);
        let ticks: Vec<Tick> = sim
            .run(VehicleState::new(0.0, 0.0, 0.0, 5.0), 10_000)
            .collect::<SimResult<_>>()
            .unwrap();

        assert!(!ticks.is_empty());
        assert!(ticks.len() < 10_000);
        let last = ticks.last().unwrap();
        assert_eq!(last.tracking.target_index, path.last_index());
        assert_abs_diff_eq!(last.time, ticks.len() as f64 * 0.02, epsilon = 1e-9);
    }

    #[test]
    fn test_run_respects_max_ticks() {
        let path = straight_path(100.0);
        let sim = simulation(&path);
        let mut run = sim.run(VehicleState::new(0.0, 0.0, 0.0, 0.0), 10);
        assert_eq!(run.by_ref().count(), 10);
        assert!(run.state().x() > 0.0);
    }

    #[test]
    fn test_goal_tolerance() {
        let path = straight_path(20.0);
        let sim = simulation(&path).with_goal_tolerance(5.0);
        let ticks = sim.run(VehicleState::new(0.0, 0.0, 0.0, 5.0), 10_000).count();
        let plain = simulation(&path).run(VehicleState::new(0.0, 0.0, 0.0, 5.0), 10_000).count();
        assert!(ticks < plain);
    }

    #[test]
    fn test_rejects_empty_path() {
        let path = ReferencePath {
            x: vec![],
            y: vec![],
            yaw: vec![],
            curvature: vec![],
            s: vec![],
        };
        let geometry = VehicleGeometry::default();
        let model = KinematicBicycleModel::new(geometry, 0.02).unwrap();
        let tracker = StanleyController::new(StanleyConfig::default(), &geometry).unwrap();
        assert!(Simulation::new(model, tracker, &path, 5.0, 1.0).is_err());
    }
}
