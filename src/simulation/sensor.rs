//! Simulated range sensors.
//!
//! Four axis-aligned rays are cast from the drone against the occupancy grid.
//! Each ray is an independent read-only query, so the four are fanned out with
//! `rayon::join` and reassembled in the fixed (right, left, up, down) order.

use std::fmt;

use rayon::prelude::*;

use crate::simulation::direction::Direction;
use crate::simulation::grid::{OccupancyGrid, Position};

/// Clear distance along each axis, in multiples of the stride that was sensed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SensorReading {
    pub right: u32,
    pub left: u32,
    pub up: u32,
    pub down: u32,
}

impl SensorReading {
    /// Returns the distance measured along `direction`.
    #[must_use]
    pub const fn along(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Right => self.right,
            Direction::Left => self.left,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Readings in sensor order (right, left, up, down).
    #[must_use]
    pub const fn as_array(&self) -> [u32; 4] {
        [self.right, self.left, self.up, self.down]
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "right: {}, left: {}, up: {}, down: {}",
            self.right, self.left, self.up, self.down
        )
    }
}

/// Casts a single ray from `origin` in steps of `(dx, dy)`.
///
/// Probing starts at distance 0 (the origin itself). The returned distance is
/// the first one whose probe leaves the grid or hits a wall. The ray gives up
/// early at `radius` and never walks past `max_step`. A probe whose coordinates
/// overflow `i32` counts as off the grid.
#[must_use]
pub fn cast_ray(
    grid: &OccupancyGrid,
    origin: Position,
    (dx, dy): (i32, i32),
    max_step: u32,
    radius: u32,
) -> u32 {
    let mut distance: u32 = 0;
    while distance < max_step {
        let d = distance as i32;
        let probe = dx
            .checked_mul(d)
            .zip(dy.checked_mul(d))
            .and_then(|(ox, oy)| origin.checked_offset(ox, oy));
        if !probe.is_some_and(|p| grid.contains(p)) {
            break;
        }
        if distance >= radius {
            return distance;
        }
        distance += 1;
    }
    distance
}

/// Four range sensors with a common sensing radius.
#[derive(Clone, Copy, Debug)]
pub struct SensorArray {
    radius: u32,
}

impl SensorArray {
    #[must_use]
    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// Senses along all four axes with the given stride (1 for cell-exact
    /// readings, the drone's velocity for coarse ones).
    #[must_use]
    pub fn sense(&self, grid: &OccupancyGrid, origin: Position, stride: i32) -> SensorReading {
        let max_step = grid.max_extent();
        let ray = |dir: Direction| cast_ray(grid, origin, dir.scaled(stride), max_step, self.radius);

        let ((right, left), (up, down)) = rayon::join(
            || rayon::join(|| ray(Direction::Right), || ray(Direction::Left)),
            || rayon::join(|| ray(Direction::Up), || ray(Direction::Down)),
        );

        SensorReading {
            right,
            left,
            up,
            down,
        }
    }

    /// Every traversable cell inside the unit-stride reading, along each ray,
    /// in sensor order. This is the area the sensors "paint" as observed.
    #[must_use]
    pub fn footprint(&self, grid: &OccupancyGrid, origin: Position) -> Vec<Position> {
        let reading = self.sense(grid, origin, 1);
        let samples: Vec<Position> = Direction::SENSOR_ORDER
            .iter()
            .flat_map(|&dir| {
                let (dx, dy) = dir.vector();
                (0..reading.along(dir) as i32)
                    .filter_map(move |i| origin.checked_offset(dx * i, dy * i))
            })
            .collect();

        samples
            .into_par_iter()
            .filter(|p| grid.contains(*p))
            .collect()
    }
}
