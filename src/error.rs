//! Error types for the maze drone simulation.

use thiserror::Error;

/// Startup and configuration failures.
///
/// Rejected moves and an exhausted step stack are ordinary results of a tick,
/// so they never show up here.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("occupancy grid is empty")]
    EmptyGrid,

    #[error("occupancy grid is not rectangular: row {row} has {found} cells, expected {expected}")]
    NonRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("occupancy grid has no traversable cell to place the drone on")]
    NoTraversableCell,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
