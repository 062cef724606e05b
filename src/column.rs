use crate::value::Value;

/// A named column of [`Value`]s owned by a [`Series`](crate::Series).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Creates an empty column with the given `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Creates a column that takes ownership of `values`.
    pub fn with_values(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates a column holding `len` copies of `value`.
    pub fn filled(name: impl Into<String>, value: Value, len: usize) -> Self {
        Self::with_values(name, vec![value; len])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Mutable view of the cells; the slice cannot change the column length.
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Returns the value at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Replaces the entire contents of the column.
    pub fn replace(&mut self, values: Vec<Value>) {
        self.values = values;
    }

    /// Replaces the contents with `len` copies of `value`.
    pub fn fill(&mut self, value: Value, len: usize) {
        self.values.clear();
        self.values.resize(len, value);
    }

    /// Appends `values` after the existing contents.
    pub fn extend(&mut self, values: Vec<Value>) {
        self.values.extend(values);
    }

    /// Appends `count` missing-value markers.
    pub fn pad(&mut self, count: usize) {
        self.values.resize(self.values.len() + count, Value::Null);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Reorders the column so that position `i` holds the value previously
    /// found at `order[i]`.
    ///
    /// `order` must be a permutation of `0..self.len()`.
    pub fn permute(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.values.len());
        let mut previous = std::mem::take(&mut self.values);
        self.values = order
            .iter()
            .map(|&idx| std::mem::take(&mut previous[idx]))
            .collect();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn permute_moves_values() {
        let mut column = Column::with_values("c", vec![10.into(), 20.into(), 30.into()]);
        column.permute(&[2, 0, 1]);
        assert_eq!(
            column.values(),
            &[Value::Int(30), Value::Int(10), Value::Int(20)]
        );
    }

    #[test]
    fn fill_resets_instead_of_appending() {
        let mut column = Column::with_values("c", vec![1.into(), 2.into()]);
        column.fill(Value::Double(0.0), 2);
        assert_eq!(column.values(), &[Value::Double(0.0), Value::Double(0.0)]);
        column.pad(1);
        assert_eq!(column.len(), 3);
        assert!(column.values()[2].is_null());
    }
}
