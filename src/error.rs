//! Error types for the CampusQuest crate

use thiserror::Error;

use crate::types::Cell;

/// Main error type for the CampusQuest crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid grid dimensions {height}x{width} (each side must be 2-15)")]
    InvalidDimensions { height: usize, width: usize },

    #[error("cell {cell} is out of bounds for a {height}x{width} grid")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cell {cell} is already occupied")]
    CellOccupied { cell: Cell },

    #[error("landmark name must not be empty")]
    EmptyLandmarkName,

    #[error("landmark '{name}' already exists")]
    DuplicateLandmark { name: String },

    #[error("unknown landmark '{name}'")]
    UnknownLandmark { name: String },

    #[error("start landmark '{name}' is locked")]
    StartLandmarkLocked { name: String },

    #[error("landmark '{name}' cannot be both start and target")]
    StartIsTarget { name: String },

    #[error("layout has no start landmark")]
    MissingStart,

    #[error("layout defines more than one {role} landmark")]
    DuplicateRole { role: &'static str },

    #[error("no target landmark configured")]
    MissingTarget,

    #[error("no algorithm has been trained yet")]
    NotTrained,

    #[error("no path found from {start}; train more")]
    NoPath { start: Cell },

    #[error("invalid algorithm '{input}'. Expected one of: {expected}")]
    ParseAlgorithm { input: String, expected: String },

    #[error("invalid action '{input}'. Expected one of: {expected}")]
    ParseAction { input: String, expected: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
