//! Simulation hyperparameters.
//!
//! These are the defaults behind `DroneConfig`; a config file can override any of them.

pub const BINARY_THRESHOLD: u8 = 128;
pub const START_X: i32 = 125;
pub const START_Y: i32 = 125;
pub const VELOCITY: i32 = 2; // Cells per outward step
pub const RETURN_VELOCITY: i32 = 5; // Sensing stride while retracing
pub const SENSOR_RADIUS: u32 = 1200;
pub const OUTWARD_MINUTES: f64 = 4.0;
pub const MAX_RUN_MINUTES: f64 = 8.0;
pub const TICK_RATE_HZ: u32 = 300;
pub const FRAME_RATE_HZ: u32 = 30;
