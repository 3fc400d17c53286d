use crate::simulation::direction::Direction;
use crate::simulation::grid::{OccupancyGrid, Position};
use crate::simulation::sensor::SensorReading;
use crate::simulation::trail::Trail;

/// The drone flying over the maze.
///
/// Holds everything that changes as it moves: where it is, which way it
/// faces, what it has explored, and the latest range reading. Only the
/// motion controller and the navigation policy mutate it.
#[derive(Debug, Clone)]
pub struct Drone {
    pub position: Position,
    pub facing: Direction,
    pub trail: Trail,
    pub is_returning: bool,
    pub last_reading: SensorReading,
}

impl Drone {
    /// Creates a drone at `start` (already resolved to a traversable cell).
    #[must_use]
    pub fn new(grid: &OccupancyGrid, start: Position, facing: Direction) -> Self {
        Self {
            position: start,
            facing,
            trail: Trail::new(grid),
            is_returning: false,
            last_reading: SensorReading::default(),
        }
    }

    /// Share of the grid's traversable cells explored so far, in `[0, 1]`.
    #[must_use]
    pub fn coverage(&self, grid: &OccupancyGrid) -> f64 {
        let total = grid.traversable_count();
        if total == 0 {
            return 0.0;
        }
        (self.trail.explored_cells() as f64 / total as f64).min(1.0)
    }
}
