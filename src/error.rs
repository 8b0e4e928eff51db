//! Crate error type

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid bounds: lo {lo} is greater than hi {hi}")]
    InvalidBounds { lo: f64, hi: f64 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid obstacle #{index}: {reason}")]
    InvalidObstacle { index: usize, reason: String },

    #[error("Spawn point ({x}, {y}) lies inside an obstacle")]
    SpawnBlocked { x: f64, y: f64 },

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
