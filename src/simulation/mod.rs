pub mod agent;
pub mod direction;
pub mod grid;
pub mod loader;
pub mod motion;
pub mod navigation;
pub mod params;
pub mod sensor;
pub mod state;
pub mod trail;

pub use direction::Direction;
pub use grid::{OccupancyGrid, Position};
pub use navigation::{ManualInput, NavPhase, Rule, TickOutcome};
pub use state::SimulationState;
