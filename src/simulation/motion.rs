//! Single-step movement with traversability checks.

use tracing::debug;

use crate::simulation::agent::Drone;
use crate::simulation::direction::Direction;
use crate::simulation::grid::OccupancyGrid;
use crate::simulation::sensor::SensorArray;
use crate::simulation::trail::TrailSource;

/// Validates and applies moves for a drone.
#[derive(Clone, Copy, Debug)]
pub struct MotionController {
    sensors: SensorArray,
}

impl MotionController {
    #[must_use]
    pub const fn new(sensors: SensorArray) -> Self {
        Self { sensors }
    }

    /// Moves the drone by `(dx, dy)` if the destination is traversable.
    ///
    /// On success the pre-move position is appended to the trail, the drone
    /// moves, and (outside of return mode) the sensor footprint around the new
    /// position is appended as observed cells. A rejected move changes nothing.
    pub fn move_by(&self, grid: &OccupancyGrid, drone: &mut Drone, dx: i32, dy: i32) -> bool {
        let Some(target) = drone
            .position
            .checked_offset(dx, dy)
            .filter(|&p| grid.contains(p))
        else {
            debug!(from = ?drone.position, dx, dy, "move rejected");
            return false;
        };

        drone.trail.push(drone.position, TrailSource::Visited);
        drone.position = target;

        if !drone.is_returning {
            for cell in self.sensors.footprint(grid, target) {
                drone.trail.push(cell, TrailSource::Observed);
            }
        }
        true
    }

    /// Turns the drone toward `direction` and moves `stride` cells that way.
    /// The heading changes even when the move is rejected.
    pub fn go(
        &self,
        grid: &OccupancyGrid,
        drone: &mut Drone,
        direction: Direction,
        stride: i32,
    ) -> bool {
        drone.facing = direction;
        let (dx, dy) = direction.scaled(stride);
        self.move_by(grid, drone, dx, dy)
    }
}
