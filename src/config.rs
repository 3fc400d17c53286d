//! Configuration loading for the maze drone.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::simulation::direction::Direction;
use crate::simulation::navigation::NavSettings;
use crate::simulation::params::{
    BINARY_THRESHOLD, FRAME_RATE_HZ, MAX_RUN_MINUTES, OUTWARD_MINUTES, RETURN_VELOCITY,
    SENSOR_RADIUS, START_X, START_Y, TICK_RATE_HZ, VELOCITY,
};

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DroneConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub drone: DroneParams,
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source image and binarization
#[derive(Clone, Debug, Deserialize)]
pub struct MapConfig {
    /// Maze image; any format the `image` crate decodes
    #[serde(default = "default_image_path")]
    pub image_path: PathBuf,

    /// Grayscale level a pixel must exceed to be traversable (default: 128)
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

/// Drone placement, strides and sensing
#[derive(Clone, Debug, Deserialize)]
pub struct DroneParams {
    /// Requested start column; snapped to the nearest traversable cell
    #[serde(default = "default_start_x")]
    pub start_x: i32,

    /// Requested start row
    #[serde(default = "default_start_y")]
    pub start_y: i32,

    /// Initial heading: up, down, left or right (default: up)
    #[serde(default = "default_facing")]
    pub facing: Direction,

    /// Cells per step (default: 2)
    #[serde(default = "default_velocity")]
    pub velocity: i32,

    /// Sensing stride while retracing (default: 5)
    #[serde(default = "default_return_velocity")]
    pub return_velocity: i32,

    /// Sensor range in cells (default: 1200)
    #[serde(default = "default_sensor_radius")]
    pub sensor_radius: u32,
}

/// Timing of a run
#[derive(Clone, Debug, Deserialize)]
pub struct MissionConfig {
    /// Time spent exploring before the return journey starts (minutes)
    #[serde(default = "default_outward_minutes")]
    pub outward_minutes: f64,

    /// Hard cap on the whole run (minutes)
    #[serde(default = "default_max_run_minutes")]
    pub max_run_minutes: f64,

    /// Simulation ticks per second (default: 300)
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,

    /// Terminal redraws per second (default: 30)
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log file; the terminal itself is owned by the renderer
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            image_path: default_image_path(),
            threshold: default_threshold(),
        }
    }
}

impl Default for DroneParams {
    fn default() -> Self {
        Self {
            start_x: default_start_x(),
            start_y: default_start_y(),
            facing: default_facing(),
            velocity: default_velocity(),
            return_velocity: default_return_velocity(),
            sensor_radius: default_sensor_radius(),
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            outward_minutes: default_outward_minutes(),
            max_run_minutes: default_max_run_minutes(),
            tick_rate_hz: default_tick_rate(),
            frame_rate_hz: default_frame_rate(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
        }
    }
}

// Default value functions
fn default_image_path() -> PathBuf {
    PathBuf::from("p11.png")
}
fn default_threshold() -> u8 {
    BINARY_THRESHOLD
}
fn default_start_x() -> i32 {
    START_X
}
fn default_start_y() -> i32 {
    START_Y
}
fn default_facing() -> Direction {
    Direction::Up
}
fn default_velocity() -> i32 {
    VELOCITY
}
fn default_return_velocity() -> i32 {
    RETURN_VELOCITY
}
fn default_sensor_radius() -> u32 {
    SENSOR_RADIUS
}
fn default_outward_minutes() -> f64 {
    OUTWARD_MINUTES
}
fn default_max_run_minutes() -> f64 {
    MAX_RUN_MINUTES
}
fn default_tick_rate() -> u32 {
    TICK_RATE_HZ
}
fn default_frame_rate() -> u32 {
    FRAME_RATE_HZ
}
fn default_log_path() -> PathBuf {
    PathBuf::from("maze_drone.log")
}

impl DroneConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, does not parse, or does not validate.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("Failed to read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, unknown facing names, or invalid values.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DroneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let drone = &self.drone;
        if drone.velocity <= 0 {
            return Err(SimError::Config("drone.velocity must be positive".into()));
        }
        if drone.return_velocity <= 0 {
            return Err(SimError::Config(
                "drone.return_velocity must be positive".into(),
            ));
        }
        if drone.sensor_radius == 0 {
            return Err(SimError::Config("drone.sensor_radius must be positive".into()));
        }

        let mission = &self.mission;
        let settings = self.nav_settings()?;
        if settings.outward > settings.max_run {
            return Err(SimError::Config(format!(
                "mission.outward_minutes ({}) exceeds mission.max_run_minutes ({})",
                mission.outward_minutes, mission.max_run_minutes
            )));
        }
        if mission.tick_rate_hz == 0 || mission.frame_rate_hz == 0 {
            return Err(SimError::Config(
                "mission tick and frame rates must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Navigation strides and time budget derived from this config.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` if either mission duration is not a positive
    /// number of minutes that fits in a `Duration`.
    pub fn nav_settings(&self) -> Result<NavSettings> {
        Ok(NavSettings {
            velocity: self.drone.velocity,
            return_velocity: self.drone.return_velocity,
            outward: minutes("mission.outward_minutes", self.mission.outward_minutes)?,
            max_run: minutes("mission.max_run_minutes", self.mission.max_run_minutes)?,
        })
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.mission.tick_rate_hz.max(1)))
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.mission.frame_rate_hz.max(1)))
    }
}

fn minutes(name: &str, value: f64) -> Result<Duration> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimError::Config(format!(
            "{name} must be a positive number of minutes, got {value}"
        )));
    }
    Duration::try_from_secs_f64(value * 60.0)
        .map_err(|_| SimError::Config(format!("{name} is too large, got {value}")))
}
