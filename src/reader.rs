//! Reading of delimiter-separated value files into raw records.
//!
//! The reader only splits records; it neither types values nor builds a
//! [`Series`](crate::Series). Records convert into positional rows through
//! `Row::from(Vec<String>)`.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, Trim};
use log::debug;
use thiserror::Error;

/// Errors raised while reading delimited files.
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("file \"{}\" does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read \"{}\": {error}", .path.display())]
    Io { path: PathBuf, error: io::Error },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Dialect options for [`read_delimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    pub delimiter: u8,
    pub quote: u8,
    /// Two consecutive quotes inside a quoted field stand for one quote.
    pub double_quote: bool,
    pub escape: Option<u8>,
    /// Accept records of differing lengths.
    pub flexible: bool,
    /// Strip surrounding whitespace from every field.
    pub trim: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            double_quote: true,
            escape: None,
            flexible: true,
            trim: false,
        }
    }
}

impl ReaderOptions {
    /// Options for tab separated files.
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    fn reader<R: Read>(&self, input: R) -> Reader<R> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .escape(self.escape)
            .flexible(self.flexible)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .has_headers(false)
            .from_reader(input)
    }
}

/// Reads all records from `input`.
///
/// With `has_header` the first record is returned as the keys and excluded
/// from the data; otherwise the keys are `"0".."n-1"` for the width of the
/// first record. Empty input gives no keys and no records.
pub fn read_records<R: Read>(
    input: R,
    has_header: bool,
    options: &ReaderOptions,
) -> Result<(Vec<String>, Vec<Vec<String>>), ReaderError> {
    let mut reader = options.reader(input);
    let mut records = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<String>>()));

    let mut keys = Vec::new();
    if has_header {
        if let Some(header) = records.next() {
            keys = header?;
        }
    }
    let rows = records.collect::<Result<Vec<_>, _>>()?;

    if !has_header {
        if let Some(first) = rows.first() {
            keys = (0..first.len()).map(|idx| idx.to_string()).collect();
        }
    }
    Ok((keys, rows))
}

/// Reads the delimited file at `path`.
///
/// See [`read_records`] for header handling.
pub fn read_delimited(
    path: impl AsRef<Path>,
    has_header: bool,
    options: &ReaderOptions,
) -> Result<(Vec<String>, Vec<Vec<String>>), ReaderError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => ReaderError::NotFound(path.to_path_buf()),
        _ => ReaderError::Io {
            path: path.to_path_buf(),
            error,
        },
    })?;
    let (keys, rows) = read_records(BufReader::new(file), has_header, options)?;
    debug!(
        "read {} records with {} keys from {}",
        rows.len(),
        keys.len(),
        path.display()
    );
    Ok((keys, rows))
}
