//! Crate-wide error type.

use thiserror::Error;

/// Errors raised by the solver and its collaborators.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Configuration Error: {0}")]
    InvalidConfig(String),

    #[error("Invalid Tour: {0}")]
    InvalidTour(String),

    #[error("Dimension Mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Population is full (capacity {capacity})")]
    PopulationFull { capacity: usize },

    #[error("Population index {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Engine Error: {0}")]
    Engine(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SolverError>;
