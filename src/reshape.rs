//! Row-major to column-major reshaping.
//!
//! Rows come either as positional sequences or as keyed records. A
//! [`Selection`] decides which target columns are produced and where each one
//! reads from; [`reshape_rows`] then builds one equally long value sequence per
//! target, substituting [`Value::Null`] for every field a row does not have.

use log::trace;
use thiserror::Error;

use crate::value::Value;

/// A single input record.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Values addressed by position.
    Positional(Vec<Value>),
    /// Values addressed by field name, in insertion order.
    Keyed(Vec<(String, Value)>),
}

impl Row {
    /// Builds a positional row.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Row::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Builds a keyed row. Later duplicates of a key shadow earlier ones.
    pub fn keyed<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut result: Vec<(String, Value)> = Vec::new();
        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            match result.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => result.push((key, value)),
            }
        }
        Row::Keyed(result)
    }

    fn shape(&self) -> Shape {
        match self {
            Row::Positional(_) => Shape::Positional,
            Row::Keyed(_) => Shape::Keyed,
        }
    }

    /// Implicit selectors for this row: every position, or every key.
    fn implicit_targets(&self) -> Vec<(String, Selector)> {
        match self {
            Row::Positional(values) => (0..values.len())
                .map(|idx| (idx.to_string(), Selector::Position(idx)))
                .collect(),
            Row::Keyed(fields) => fields
                .iter()
                .map(|(key, _)| (key.clone(), Selector::Key(key.clone())))
                .collect(),
        }
    }

    /// Extracts the selected field, or `Null` when the row has no such field.
    fn select(&self, selector: &Selector) -> Value {
        let found = match (self, selector) {
            (Row::Positional(values), Selector::Position(idx)) => values.get(*idx),
            (Row::Keyed(fields), Selector::Key(key)) => fields
                .iter()
                .find(|(field, _)| field == key)
                .map(|(_, value)| value),
            _ => None,
        };
        found.cloned().unwrap_or_default()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::Positional(values)
    }
}

impl From<Vec<String>> for Row {
    fn from(record: Vec<String>) -> Self {
        Row::Positional(record.into_iter().map(Value::Str).collect())
    }
}

impl From<Vec<(String, Value)>> for Row {
    fn from(fields: Vec<(String, Value)>) -> Self {
        Row::keyed(fields)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Positional,
    Keyed,
}

/// Where a target column reads from inside a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Position(usize),
    Key(String),
}

impl From<usize> for Selector {
    fn from(position: usize) -> Self {
        Selector::Position(position)
    }
}

impl From<&str> for Selector {
    fn from(key: &str) -> Self {
        Selector::Key(key.to_string())
    }
}

impl From<String> for Selector {
    fn from(key: String) -> Self {
        Selector::Key(key)
    }
}

/// Declares which target columns a reshape produces.
///
/// Positional `names` take position `i` (or the key of the same name for
/// keyed rows). Explicit `columns` map a target to a [`Selector`] and take
/// precedence over a positional name for the same target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    names: Vec<String>,
    columns: Vec<(String, Selector)>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selection from positional target names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            columns: Vec::new(),
        }
    }

    /// Maps `target` to an explicit source field.
    pub fn column(mut self, target: impl Into<String>, selector: impl Into<Selector>) -> Self {
        self.columns.push((target.into(), selector.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.columns.is_empty()
    }

    /// Resolves the selection against a batch shape into ordered
    /// `(target, selector)` pairs with unique targets.
    fn resolve(&self, shape: Shape) -> Vec<(String, Selector)> {
        let mut resolved: Vec<(String, Selector)> = Vec::new();
        let mut assign = |target: &str, selector: Selector| {
            match resolved.iter_mut().find(|(existing, _)| existing == target) {
                Some(slot) => slot.1 = selector,
                None => resolved.push((target.to_string(), selector)),
            }
        };
        for (idx, name) in self.names.iter().enumerate() {
            let selector = match shape {
                Shape::Positional => Selector::Position(idx),
                Shape::Keyed => Selector::Key(name.clone()),
            };
            assign(name.as_str(), selector);
        }
        for (target, selector) in &self.columns {
            assign(target.as_str(), selector.clone());
        }
        resolved
    }
}

/// Errors raised while reshaping rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReshapeError {
    /// A row does not have the shape established by the first row of the batch.
    #[error("row {index} is {found} but the batch is {expected}")]
    MixedShapes {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl Shape {
    fn as_str(self) -> &'static str {
        match self {
            Shape::Positional => "positional",
            Shape::Keyed => "keyed",
        }
    }
}

/// Column-major result of [`reshape_rows`]: target names in order, each with
/// one value per input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    columns: Vec<(String, Vec<Value>)>,
}

impl ColumnMap {
    /// Returns the values gathered for `target`.
    pub fn get(&self, target: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(name, _)| name == target)
            .map(|(_, values)| values.as_slice())
    }

    /// Removes and returns the values gathered for `target`.
    pub fn take(&mut self, target: &str) -> Option<Vec<Value>> {
        let idx = self.columns.iter().position(|(name, _)| name == target)?;
        Some(self.columns.remove(idx).1)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.columns.iter().any(|(name, _)| name == target)
    }

    /// Number of target columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of rows held by every column (0 when there are no columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Target names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl IntoIterator for ColumnMap {
    type Item = (String, Vec<Value>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Value>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Converts `rows` into named columns as described by `selection`.
///
/// With an empty selection every position (or every key of the first keyed
/// row) becomes a column. Fields missing from a row become [`Value::Null`].
/// Empty input yields an empty column per selected target, or no columns at
/// all when nothing was selected.
pub fn reshape_rows(rows: &[Row], selection: &Selection) -> Result<ColumnMap, ReshapeError> {
    let Some(first) = rows.first() else {
        let columns = selection
            .resolve(Shape::Positional)
            .into_iter()
            .map(|(target, _)| (target, Vec::new()))
            .collect();
        return Ok(ColumnMap { columns });
    };

    let shape = first.shape();
    if let Some(index) = rows.iter().position(|row| row.shape() != shape) {
        return Err(ReshapeError::MixedShapes {
            index,
            expected: shape.as_str(),
            found: rows[index].shape().as_str(),
        });
    }

    let targets = if selection.is_empty() {
        first.implicit_targets()
    } else {
        selection.resolve(shape)
    };
    trace!(
        "reshaping {} {} rows into {} columns",
        rows.len(),
        shape.as_str(),
        targets.len()
    );

    let columns = targets
        .into_iter()
        .map(|(target, selector)| {
            let values = rows.iter().map(|row| row.select(&selector)).collect();
            (target, values)
        })
        .collect();
    Ok(ColumnMap { columns })
}
