use std::time::Duration;

use tracing::info;

use crate::config::DroneConfig;
use crate::error::{Result, SimError};
use crate::simulation::agent::Drone;
use crate::simulation::grid::{OccupancyGrid, Position};
use crate::simulation::motion::MotionController;
use crate::simulation::navigation::{ManualInput, NavPhase, NavigationPolicy, TickOutcome};
use crate::simulation::sensor::SensorArray;

/// Everything one run needs, owned in one place and handed to the run loop.
#[derive(Debug, Clone)]
pub struct SimulationState {
    grid: OccupancyGrid,
    drone: Drone,
    sensors: SensorArray,
    motion: MotionController,
    policy: NavigationPolicy,
    ticks: u64,
}

impl SimulationState {
    /// Places the drone on the traversable cell nearest the configured start.
    ///
    /// # Errors
    ///
    /// Returns `SimError::NoTraversableCell` if the grid has nowhere to stand,
    /// or a config error if `config` does not validate.
    pub fn new(grid: OccupancyGrid, config: &DroneConfig) -> Result<Self> {
        config.validate()?;

        let params = &config.drone;
        let start = grid
            .find_nearest_traversable(params.start_x, params.start_y)
            .ok_or(SimError::NoTraversableCell)?;
        if start != Position::new(params.start_x, params.start_y) {
            info!(
                requested = ?(params.start_x, params.start_y),
                placed = ?start,
                "start snapped to nearest traversable cell"
            );
        }

        let sensors = SensorArray::new(params.sensor_radius);
        Ok(Self {
            drone: Drone::new(&grid, start, params.facing),
            motion: MotionController::new(sensors),
            policy: NavigationPolicy::new(start, config.nav_settings()?),
            sensors,
            grid,
            ticks: 0,
        })
    }

    /// Runs one tick of navigation. `elapsed` is the time since the run began.
    pub fn tick(&mut self, elapsed: Duration, manual: ManualInput) -> TickOutcome {
        let outcome = self.policy.step(
            &self.grid,
            &mut self.drone,
            &self.sensors,
            &self.motion,
            elapsed,
            manual,
        );
        if outcome != TickOutcome::Finished {
            self.ticks += 1;
        }
        outcome
    }

    #[must_use]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    #[must_use]
    pub fn drone(&self) -> &Drone {
        &self.drone
    }

    #[must_use]
    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    #[must_use]
    pub fn phase(&self) -> NavPhase {
        self.policy.phase()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.policy.phase() == NavPhase::Finished
    }

    /// Ticks that explored, retraced or stalled. A tick whose outcome is
    /// `Finished` (run cap hit, already home, or already done) is not counted.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn coverage(&self) -> f64 {
        self.drone.coverage(&self.grid)
    }
}
