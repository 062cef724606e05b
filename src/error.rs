//! Error type shared by [`Series`](crate::Series) operations.

use thiserror::Error;

use crate::format::FormatError;
use crate::reshape::ReshapeError;
use crate::value::ValueKind;

/// Convenience alias for series-oriented results.
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Errors propagated by series operations.
///
/// A failed call never leaves the series with columns of unequal length; the
/// series stays usable after any of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// A series was created without any column names.
    #[error("series requires at least one column name")]
    Initialization,
    /// A column name is already taken.
    #[error("'{0}' already defined as key to series")]
    DuplicateColumn(String),
    /// A column name does not exist.
    #[error("'{0}' not defined as key to series")]
    UnknownColumn(String),
    /// A column value sequence disagrees with the series length.
    #[error("values length {found} mismatch length of series {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Reshape(#[from] ReshapeError),
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Sort keys of incompatible types met in one comparison.
    #[error("column '{column}' cannot order {left} against {right}")]
    Comparison {
        column: String,
        left: ValueKind,
        right: ValueKind,
    },
    #[error("row {index} out of bounds for length {len}")]
    RowOutOfBounds { index: usize, len: usize },
}

impl SeriesError {
    pub fn length_mismatch(expected: usize, found: usize) -> Self {
        SeriesError::LengthMismatch { expected, found }
    }

    pub fn row_out_of_bounds(index: usize, len: usize) -> Self {
        SeriesError::RowOutOfBounds { index, len }
    }
}
