//! Reactive wall-following navigation.
//!
//! The policy is a three-phase state machine:
//! - **Exploring**: a fixed decision list over the four sensor readings,
//!   gated by directional bias flags. Every successful move records its undo.
//! - **Returning**: once the outward time budget is spent, undo directives are
//!   popped one per tick until the drone is back on its start cell.
//! - **Finished**: terminal; ticks become no-ops.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::simulation::agent::Drone;
use crate::simulation::direction::Direction;
use crate::simulation::grid::{OccupancyGrid, Position};
use crate::simulation::motion::MotionController;
use crate::simulation::sensor::{SensorArray, SensorReading};

/// Current phase of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavPhase {
    Exploring,
    Returning,
    Finished,
}

impl NavPhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exploring => "exploring",
            Self::Returning => "returning",
            Self::Finished => "finished",
        }
    }
}

/// Entry of the exploration decision list that fired on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Up,
    Right,
    Down,
    Left,
    /// Nothing was eligible; the drone is forced upward.
    DeadEnd,
}

impl Rule {
    /// Heading the rule moves the drone in.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Up | Self::DeadEnd => Direction::Up,
            Self::Right => Direction::Right,
            Self::Down => Direction::Down,
            Self::Left => Direction::Left,
        }
    }
}

/// Directional bias flags of the wall follower.
///
/// A cleared flag stops the matching rule from firing until some other rule
/// sets it again. Only the left rule ever re-arms `going_down`, and only the
/// right rule re-arms `going_up`. The asymmetry is kept as observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiasFlags {
    pub going_up: bool,
    pub going_right: bool,
    pub going_down: bool,
    pub going_left: bool,
}

impl Default for BiasFlags {
    fn default() -> Self {
        Self {
            going_up: true,
            going_right: true,
            going_down: true,
            going_left: true,
        }
    }
}

impl BiasFlags {
    /// Applies the first eligible rule to `reading` and updates the flags.
    ///
    /// Priority is up, right, down, left, then the dead-end fallback. A
    /// direction is eligible when its reading exceeds 1 (at least one clear
    /// stride ahead) and its flag is set.
    pub fn decide(&mut self, reading: &SensorReading) -> Rule {
        if reading.up > 1 && self.going_up {
            self.going_right = true;
            self.going_left = true;
            Rule::Up
        } else if reading.right > 1 && self.going_right {
            self.going_up = true;
            Rule::Right
        } else if reading.down > 1 && self.going_down {
            self.going_right = true;
            self.going_up = false;
            Rule::Down
        } else if reading.left > 1 && self.going_left {
            self.going_right = false;
            self.going_down = true;
            self.going_up = false;
            Rule::Left
        } else {
            self.going_up = false;
            self.going_down = false;
            self.going_right = false;
            self.going_left = true;
            Rule::DeadEnd
        }
    }
}

/// Undo directives recorded on the way out, consumed last-in first-out.
#[derive(Clone, Debug, Default)]
pub struct StepStack {
    steps: Vec<Direction>,
}

impl StepStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, undo: Direction) {
        self.steps.push(undo);
    }

    pub fn pop(&mut self) -> Option<Direction> {
        self.steps.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pending directives, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Direction] {
        &self.steps
    }
}

/// Arrow keys held for one tick. Manual moves run before the policy decides
/// and neither touch the bias flags nor record undo directives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl ManualInput {
    pub fn press(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
        }
    }

    /// Pressed directions in the order they are applied: left, right, up, down.
    pub fn pressed(self) -> impl Iterator<Item = Direction> {
        [
            (self.left, Direction::Left),
            (self.right, Direction::Right),
            (self.up, Direction::Up),
            (self.down, Direction::Down),
        ]
        .into_iter()
        .filter_map(|(held, dir)| held.then_some(dir))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// An exploration rule fired; `moved` is false when the move was rejected.
    Explored {
        rule: Rule,
        direction: Direction,
        moved: bool,
    },
    /// One undo directive was replayed.
    Retraced { direction: Direction, moved: bool },
    /// Returning with nothing left to replay; the drone waits in place.
    Stalled,
    Finished,
}

/// Strides and time budget of a run.
#[derive(Clone, Copy, Debug)]
pub struct NavSettings {
    pub velocity: i32,
    pub return_velocity: i32,
    pub outward: Duration,
    pub max_run: Duration,
}

/// The wall-following state machine.
#[derive(Clone, Debug)]
pub struct NavigationPolicy {
    phase: NavPhase,
    bias: BiasFlags,
    steps: StepStack,
    start: Position,
    settings: NavSettings,
    stalled: bool,
}

impl NavigationPolicy {
    #[must_use]
    pub fn new(start: Position, settings: NavSettings) -> Self {
        Self::with_bias(start, settings, BiasFlags::default())
    }

    /// Starts from explicit bias flags instead of all-set.
    #[must_use]
    pub fn with_bias(start: Position, settings: NavSettings, bias: BiasFlags) -> Self {
        Self {
            phase: NavPhase::Exploring,
            bias,
            steps: StepStack::new(),
            start,
            settings,
            stalled: false,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> NavPhase {
        self.phase
    }

    #[must_use]
    pub const fn bias(&self) -> BiasFlags {
        self.bias
    }

    #[must_use]
    pub const fn steps(&self) -> &StepStack {
        &self.steps
    }

    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub const fn settings(&self) -> &NavSettings {
        &self.settings
    }

    /// Advances the run by one tick. `elapsed` is wall time since the run began.
    pub fn step(
        &mut self,
        grid: &OccupancyGrid,
        drone: &mut Drone,
        sensors: &SensorArray,
        motion: &MotionController,
        elapsed: Duration,
        manual: ManualInput,
    ) -> TickOutcome {
        if self.phase == NavPhase::Finished {
            return TickOutcome::Finished;
        }
        if elapsed > self.settings.max_run {
            info!(?elapsed, "run time cap reached");
            return self.finish();
        }
        if self.phase == NavPhase::Exploring && elapsed > self.settings.outward {
            info!(
                ?elapsed,
                pending = self.steps.len(),
                "outward time spent, retracing"
            );
            self.phase = NavPhase::Returning;
            drone.is_returning = true;
        }

        match self.phase {
            NavPhase::Exploring => self.explore(grid, drone, sensors, motion, manual),
            NavPhase::Returning => self.retrace(grid, drone, sensors, motion),
            NavPhase::Finished => TickOutcome::Finished,
        }
    }

    fn explore(
        &mut self,
        grid: &OccupancyGrid,
        drone: &mut Drone,
        sensors: &SensorArray,
        motion: &MotionController,
        manual: ManualInput,
    ) -> TickOutcome {
        let velocity = self.settings.velocity;
        for direction in manual.pressed() {
            motion.go(grid, drone, direction, velocity);
        }

        let reading = sensors.sense(grid, drone.position, velocity);
        drone.last_reading = reading;
        trace!(%reading, "sensed");

        let rule = self.bias.decide(&reading);
        if rule == Rule::DeadEnd {
            debug!(position = ?drone.position, "dead end, forcing up");
        }

        let direction = rule.direction();
        let moved = motion.go(grid, drone, direction, velocity);
        if moved {
            self.steps.push(direction.opposite());
        }

        TickOutcome::Explored {
            rule,
            direction,
            moved,
        }
    }

    fn retrace(
        &mut self,
        grid: &OccupancyGrid,
        drone: &mut Drone,
        sensors: &SensorArray,
        motion: &MotionController,
    ) -> TickOutcome {
        if drone.position == self.start {
            return self.finish();
        }

        drone.last_reading = sensors.sense(grid, drone.position, self.settings.return_velocity);

        let Some(direction) = self.steps.pop() else {
            if !self.stalled {
                warn!(position = ?drone.position, "step stack exhausted before reaching start");
                self.stalled = true;
            }
            return TickOutcome::Stalled;
        };

        let moved = motion.go(grid, drone, direction, self.settings.velocity);
        if drone.position == self.start {
            self.finish();
        }
        TickOutcome::Retraced { direction, moved }
    }

    fn finish(&mut self) -> TickOutcome {
        if self.phase != NavPhase::Finished {
            info!(from = self.phase.label(), "run finished");
        }
        self.phase = NavPhase::Finished;
        TickOutcome::Finished
    }
}
