//! Precondition errors reported by [`Sorter`](crate::Sorter).
//!
//! Every variant is detected before any algorithmic work starts, so a failed
//! call never leaves the output rank slice partially written.

use thiserror::Error;

/// Error type for sorter construction and sort calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SortError {
    /// The rank slice must have one slot per point.
    #[error("point count {points} does not match rank slice length {ranks}")]
    LengthMismatch {
        /// Number of points passed in.
        points: usize,
        /// Length of the output rank slice.
        ranks: usize,
    },

    /// More points than the sorter was sized for.
    #[error("{got} points exceed the sorter capacity of {max}")]
    TooManyPoints {
        /// Number of points passed in.
        got: usize,
        /// Capacity declared at construction.
        max: usize,
    },

    /// Point dimension larger than the sorter was sized for.
    #[error("dimension {got} exceeds the sorter capacity of {max}")]
    DimensionTooLarge {
        /// Dimension of the points.
        got: usize,
        /// Capacity declared at construction.
        max: usize,
    },

    /// All points must share the dimension of the first one.
    #[error("point {index} has dimension {got}, expected {expected}")]
    InconsistentDimension {
        /// Index of the offending point.
        index: usize,
        /// Dimension of point 0.
        expected: usize,
        /// Dimension of the offending point.
        got: usize,
    },

    /// NaN or infinite coordinate.
    #[error("point {index} has a non-finite value at coordinate {coordinate}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
        /// Coordinate holding the non-finite value.
        coordinate: usize,
    },

    /// An algorithm configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
