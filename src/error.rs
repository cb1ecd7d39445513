//! Error types for the ACO solver.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AcoError {
    /// The distance matrix is not square (or one of its rows is ragged)
    #[error("distance matrix is not square: row {row} has {cols} columns, expected {rows}")]
    ShapeMismatch { rows: usize, row: usize, cols: usize },
    #[error("distance matrix has no nodes")]
    EmptyMatrix,
    /// Off-diagonal distance that cannot produce a finite heuristic value
    #[error("degenerate distance {value} between distinct nodes {from} and {to}: off-diagonal distances must be finite and strictly positive")]
    DegenerateDistance { from: usize, to: usize, value: f64 },
    #[error("invalid mode {0}: expected 0 (minimize) or 1 (maximize)")]
    InvalidMode(i32),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AcoError>;

impl AcoError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
