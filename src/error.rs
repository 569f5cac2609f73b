use std::fmt;

use crate::types::Position;

/// Result type for Waze operations
pub type Result<T> = std::result::Result<T, WazeError>;

/// Main error type for the Waze library
#[derive(Debug, Clone, PartialEq)]
pub enum WazeError {
    /// Start/end outside the grid, or equal to each other
    InvalidEndpoints {
        start: Position,
        end: Position,
        reason: String,
    },

    /// Coordinate access outside the grid
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },

    /// The agent stands on a tile with no legal move
    NoValidAction {
        position: Position,
    },

    /// Greedy walk exceeded its step bound
    PolicyDidNotConverge {
        max_steps: usize,
    },

    /// The carver could not connect the end tile
    EndUnreachable {
        attempts: usize,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Serialization/deserialization errors
    Serialization(String),
}

impl fmt::Display for WazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WazeError::InvalidEndpoints { start, end, reason } => {
                write!(f, "Invalid endpoints start={} end={}: {}", start, end, reason)
            }
            WazeError::OutOfBounds { position, rows, cols } => {
                write!(f, "Position {} is outside the {}x{} grid", position, rows, cols)
            }
            WazeError::NoValidAction { position } => {
                write!(f, "No valid action available at {}", position)
            }
            WazeError::PolicyDidNotConverge { max_steps } => {
                write!(f, "Greedy policy did not reach the end within {} steps", max_steps)
            }
            WazeError::EndUnreachable { attempts } => {
                write!(f, "End tile could not be connected after {} attempts", attempts)
            }
            WazeError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            WazeError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for WazeError {}

impl From<serde_json::Error> for WazeError {
    fn from(err: serde_json::Error) -> Self {
        WazeError::Serialization(err.to_string())
    }
}

// Helper functions for common error patterns
impl WazeError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        WazeError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_endpoints<S: Into<String>>(start: Position, end: Position, reason: S) -> Self {
        WazeError::InvalidEndpoints {
            start,
            end,
            reason: reason.into(),
        }
    }
}
