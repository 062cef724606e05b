//! Core data structures for the RustSeries project.
//!
//! This crate provides:
//! - [`Series`]: a column-based table that keeps every column the same length and
//!   reads rows back by index, with appends, column re-typing and joint sorting.
//! - [`reshape_rows`]: turns positional or keyed [`Row`]s into named columns.
//! - [`format_values`]: converts a column of [`Value`]s to another [`ValueKind`].
//! - [`read_delimited`]: reads CSV-style files into raw records for loading.
//!
//! [`Value::Null`] is the missing-value marker used wherever a row did not
//! provide a field.

pub mod column;
pub mod error;
pub mod format;
pub mod reader;
pub mod reshape;
pub mod series;
pub mod value;

pub use column::Column;
pub use error::{SeriesError, SeriesResult};
pub use format::{format_values, FormatError};
pub use reader::{read_delimited, read_records, ReaderError, ReaderOptions};
pub use reshape::{reshape_rows, ColumnMap, ReshapeError, Row, Selection, Selector};
pub use series::{Series, SortOrder};
pub use value::{Value, ValueKind};
