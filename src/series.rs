use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use log::{debug, warn};

use crate::column::Column;
use crate::error::{SeriesError, SeriesResult};
use crate::format::format_values;
use crate::reshape::{reshape_rows, ColumnMap, Row, Selection};
use crate::value::{Value, ValueKind};

/// Direction used by [`Series::sort_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Interprets a textual flag: anything starting with `d` (any case) is
    /// descending, everything else ascending.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim_start().to_ascii_lowercase().starts_with('d') {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(flag: &str) -> Result<Self, Self::Err> {
        Ok(SortOrder::from_flag(flag))
    }
}

/// Column-based table whose rows can be read back by index.
///
/// Every column always holds exactly [`Series::len`] values. Column names that
/// parse as numbers are stored with a leading `_`, so `"1"` becomes `"_1"`;
/// every method taking a column name applies the same rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    columns: Vec<Column>,
    row_count: usize,
}

/// Maps numeric-looking names onto their stored form.
fn column_key(name: &str) -> String {
    if name.parse::<f64>().is_ok() {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

impl Series {
    /// Creates an empty series with the given column names, in order.
    pub fn new<I, S>(names: I) -> SeriesResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns: Vec<Column> = Vec::new();
        for name in names {
            let key = column_key(name.as_ref());
            if columns.iter().any(|column| column.name() == key) {
                return Err(SeriesError::DuplicateColumn(key));
            }
            columns.push(Column::new(key));
        }
        if columns.is_empty() {
            return Err(SeriesError::Initialization);
        }
        Ok(Self {
            columns,
            row_count: 0,
        })
    }

    /// Removes every row, keeping the columns.
    pub fn clear(&mut self) {
        self.row_count = 0;
        for column in &mut self.columns {
            column.clear();
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = column_key(name);
        self.columns.iter().position(|c| c.name() == key)
    }

    fn find_mut(&mut self, name: &str) -> SeriesResult<&mut Column> {
        let idx = self
            .position(name)
            .ok_or_else(|| SeriesError::UnknownColumn(column_key(name)))?;
        Ok(&mut self.columns[idx])
    }

    /// Returns the values of column `name`.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.position(name).map(|idx| self.columns[idx].values())
    }

    /// Returns the cells of column `name` for in-place edits.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut [Value]> {
        let idx = self.position(name)?;
        Some(self.columns[idx].values_mut())
    }

    /// Replaces the whole contents of an existing column.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> SeriesResult<()> {
        let expected = self.row_count;
        let column = self.find_mut(name)?;
        if values.len() != expected {
            return Err(SeriesError::length_mismatch(expected, values.len()));
        }
        column.replace(values);
        Ok(())
    }

    /// Returns the row at `index`, one value per column in column order.
    pub fn row(&self, index: usize) -> SeriesResult<Vec<Value>> {
        if index >= self.row_count {
            return Err(SeriesError::row_out_of_bounds(index, self.row_count));
        }
        Ok(self
            .columns
            .iter()
            .map(|column| column.values()[index].clone())
            .collect())
    }

    /// Returns every row in order.
    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.indices()
            .map(|index| {
                self.columns
                    .iter()
                    .map(|column| column.values()[index].clone())
                    .collect()
            })
            .collect()
    }

    /// Returns the row indices `0..len`.
    pub fn indices(&self) -> Range<usize> {
        0..self.row_count
    }

    /// Falls back to the series' own column names when nothing was selected.
    fn effective_selection(&self, selection: &Selection) -> Selection {
        if selection.is_empty() {
            Selection::names(self.columns.iter().map(|c| c.name().to_string()))
        } else {
            selection.clone()
        }
    }

    /// Reshapes `rows` and keys the result by stored column names.
    fn reshape(&self, rows: &[Row], selection: &Selection) -> SeriesResult<ColumnMap> {
        let selection = self.effective_selection(selection);
        Ok(reshape_rows(rows, &selection)?)
    }

    /// Takes the values meant for `column` out of `map`, trying the raw target
    /// name first and then its numeric-name form.
    fn take_for(map: &mut ColumnMap, column: &str) -> Option<Vec<Value>> {
        if let Some(values) = map.take(column) {
            return Some(values);
        }
        let target = map.names().find(|target| column_key(target) == column)?;
        let target = target.to_string();
        map.take(&target)
    }

    /// Replaces the contents of the series with `rows`.
    ///
    /// Columns not covered by `selection` are filled with [`Value::Null`]. When
    /// no column of the series is covered at all, the series is left empty.
    pub fn load_rows(&mut self, rows: &[Row], selection: &Selection) -> SeriesResult<()> {
        let mut map = self.reshape(rows, selection)?;
        let new_len = map.row_count();

        let mut matched = false;
        for column in &mut self.columns {
            match Self::take_for(&mut map, column.name()) {
                Some(values) => {
                    column.replace(values);
                    matched = true;
                }
                None => column.fill(Value::Null, new_len),
            }
        }

        if matched {
            self.row_count = new_len;
        } else {
            warn!("load matched no column of the series; series left empty");
            self.clear();
        }
        debug!(
            "loaded {} rows into {} columns",
            self.row_count,
            self.columns.len()
        );
        Ok(())
    }

    /// Appends a single row to the end of the series.
    ///
    /// Columns not covered by `selection` receive [`Value::Null`]. When no
    /// column is covered the series is left unchanged.
    pub fn append_row(&mut self, row: impl Into<Row>, selection: &Selection) -> SeriesResult<()> {
        let rows = [row.into()];
        let mut map = self.reshape(&rows, selection)?;
        let added = map.row_count();

        let matched: Vec<Option<Vec<Value>>> = self
            .columns
            .iter()
            .map(|column| Self::take_for(&mut map, column.name()))
            .collect();
        if matched.iter().all(Option::is_none) {
            warn!("appended row matched no column of the series; row dropped");
            return Ok(());
        }

        for (column, values) in self.columns.iter_mut().zip(matched) {
            match values {
                Some(values) => column.extend(values),
                None => column.pad(added),
            }
        }
        self.row_count += added;
        debug!("appended {} row(s), series now has {}", added, self.row_count);
        Ok(())
    }

    /// Sets column `name` to `len` copies of `value`, creating it at the end
    /// if it does not exist yet. Existing contents are replaced.
    pub fn initialize_column(&mut self, name: &str, value: Value) {
        let len = self.row_count;
        match self.position(name) {
            Some(idx) => self.columns[idx].fill(value, len),
            None => {
                let key = column_key(name);
                debug!("initialized new column '{}' with {} rows", key, len);
                self.columns.push(Column::filled(key, value, len));
            }
        }
    }

    /// Adds a new column holding `values`.
    pub fn append_column(&mut self, name: &str, values: Vec<Value>) -> SeriesResult<()> {
        if self.position(name).is_some() {
            return Err(SeriesError::DuplicateColumn(column_key(name)));
        }
        if values.len() != self.row_count {
            return Err(SeriesError::length_mismatch(self.row_count, values.len()));
        }
        let key = column_key(name);
        debug!("appended column '{}'", key);
        self.columns.push(Column::with_values(key, values));
        Ok(())
    }

    /// Converts every value of column `name` to `kind`.
    ///
    /// `hint` is passed through to [`format_values`]. The column is only
    /// replaced once every value converted successfully.
    pub fn format_column(
        &mut self,
        name: &str,
        kind: ValueKind,
        hint: Option<&str>,
    ) -> SeriesResult<()> {
        let column = self.find_mut(name)?;
        let formatted = format_values(column.values(), kind, hint)?;
        column.replace(formatted);
        debug!("formatted column '{}' as {}", column.name(), kind);
        Ok(())
    }

    /// Sorts all columns jointly by the values of `keys`.
    ///
    /// The first key is the primary one. `order` reverses the key comparison
    /// only: rows whose keys compare equal keep their current relative order
    /// in either direction, so a descending sort does not reverse ties.
    ///
    /// Every key column must hold mutually comparable values (numbers,
    /// strings or timestamps, plus `Null`); otherwise nothing is reordered
    /// and [`SeriesError::Comparison`] names the column and the clashing kinds.
    pub fn sort_by(&mut self, keys: &[&str], order: SortOrder) -> SeriesResult<()> {
        let key_columns = keys
            .iter()
            .map(|name| {
                self.position(name)
                    .map(|idx| &self.columns[idx])
                    .ok_or_else(|| SeriesError::UnknownColumn(column_key(name)))
            })
            .collect::<SeriesResult<Vec<&Column>>>()?;
        for column in &key_columns {
            check_comparable(column)?;
        }

        let mut permutation: Vec<usize> = self.indices().collect();
        permutation.sort_by(|&a, &b| {
            let keyed = compare_rows(&key_columns, a, b);
            let keyed = match order {
                SortOrder::Ascending => keyed,
                SortOrder::Descending => keyed.reverse(),
            };
            keyed.then(a.cmp(&b))
        });

        for column in &mut self.columns {
            column.permute(&permutation);
        }
        debug!("sorted {} rows by {:?} ({:?})", self.row_count, keys, order);
        Ok(())
    }
}

/// Fails unless every non-null value of `column` can be ordered against the
/// first non-null one. Comparability is an equivalence over non-null values,
/// so one pass finds any clash.
fn check_comparable(column: &Column) -> SeriesResult<()> {
    let mut present = column.values().iter().filter(|value| !value.is_null());
    let Some(first) = present.next() else {
        return Ok(());
    };
    match present.find(|value| first.compare(value).is_none()) {
        Some(other) => Err(SeriesError::Comparison {
            column: column.name().to_string(),
            left: first.kind(),
            right: other.kind(),
        }),
        None => Ok(()),
    }
}

/// Compares rows `a` and `b` key column by key column. Key columns have
/// passed [`check_comparable`].
fn compare_rows(key_columns: &[&Column], a: usize, b: usize) -> Ordering {
    key_columns
        .iter()
        .map(|column| {
            let values = column.values();
            values[a].compare(&values[b]).unwrap_or(Ordering::Equal)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Renders the series as a padded text table.
impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|column| column.values().iter().map(ToString::to_string).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&rendered)
            .map(|(column, cells)| {
                cells
                    .iter()
                    .map(String::len)
                    .fold(column.name().len(), usize::max)
            })
            .collect();

        for (idx, (column, width)) in self.columns.iter().zip(&widths).enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:<width$}", column.name(), width = *width)?;
        }
        f.write_str("\n")?;
        for (idx, width) in widths.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&"-".repeat(*width))?;
        }
        for row in self.indices() {
            f.write_str("\n")?;
            for (idx, (cells, width)) in rendered.iter().zip(&widths).enumerate() {
                if idx > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{:<width$}", cells[row], width = *width)?;
            }
        }
        Ok(())
    }
}
