//! The crate's error type.
//!
//! Every error is raised while a simulation is being set up. Once built,
//! stepping a [Simulation](crate::Simulation) cannot fail.

use crate::Cell;
use thiserror::Error;

/// Errors produced while validating a grid, trip or configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("grid row {row} has {got} cells, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid marker {marker:?} at {cell}, expected 0 (open) or 1 (blocked)")]
    InvalidMarker { cell: Cell, marker: String },

    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Cell),

    #[error("cell {0} is blocked")]
    BlockedCell(Cell),

    #[error("phase duration must be positive")]
    ZeroPhaseDuration,

    #[error("lookahead depth must be positive")]
    ZeroLookaheadDepth,

    #[cfg(feature = "serde")]
    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;
