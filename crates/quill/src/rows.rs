//! Shaped query results
//!
//! A read query's raw rows are reshaped once, at fetch time, into ordered
//! column-name-to-value mappings. Every view offered afterwards is a pure
//! projection over that one fetch; none of them runs further SQL.

use indexmap::IndexMap;
use quill_core::Value;

/// One fetched row as an ordered mapping from declared column name to value.
///
/// Built positionally: the i-th fetched value is paired with the i-th
/// declared column name. The cursor's own column metadata is never
/// consulted.
pub type RowMap = IndexMap<String, Value>;

/// All rows fetched by one invocation of a read query.
#[derive(Debug, Clone)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<RowMap>,
}

impl RowSet {
    pub(crate) fn new(columns: &[String], raw_rows: Vec<Vec<Value>>) -> Self {
        let rows = raw_rows
            .into_iter()
            .map(|values| columns.iter().cloned().zip(values).collect::<RowMap>())
            .collect();
        Self {
            columns: columns.to_vec(),
            rows,
        }
    }

    /// Declared column names, in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows as mappings
    pub fn rows(&self) -> &[RowMap] {
        &self.rows
    }

    /// All rows as mappings, consuming the set
    pub fn into_rows(self) -> Vec<RowMap> {
        self.rows
    }

    /// The first row as a mapping; an empty mapping when nothing came back
    pub fn first_row(&self) -> RowMap {
        self.rows.first().cloned().unwrap_or_default()
    }

    /// The first row's value for the first declared column
    pub fn first_value(&self) -> Option<Value> {
        let first = self.columns.first()?;
        self.rows.first()?.get(first).cloned()
    }

    /// The first declared column's value from every row, in row order
    pub fn column(&self) -> Vec<Value> {
        let Some(first) = self.columns.first() else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(first).cloned())
            .collect()
    }

    /// The first row's values, in declaration order
    pub fn first_tuple(&self) -> Vec<Value> {
        self.rows
            .first()
            .map(|row| row.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every row's values, in declaration order
    pub fn tuples(&self) -> Vec<Vec<Value>> {
        self.rows
            .iter()
            .map(|row| row.values().cloned().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<String> {
        vec!["id".to_string(), "title".to_string()]
    }

    fn sample() -> RowSet {
        RowSet::new(&columns(), vec![
            vec![Value::Int64(1), Value::Text("first".into())],
            vec![Value::Int64(2), Value::Text("second".into())],
        ])
    }

    #[test]
    fn rows_are_mapped_positionally() {
        let set = sample();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rows()[0]["id"], Value::Int64(1));
        assert_eq!(set.rows()[1]["title"], Value::Text("second".into()));
    }

    #[test]
    fn empty_set_views() {
        let set = RowSet::new(&columns(), Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.first_row(), RowMap::new());
        assert_eq!(set.first_value(), None);
        assert_eq!(set.column(), Vec::<Value>::new());
        assert_eq!(set.first_tuple(), Vec::<Value>::new());
        assert_eq!(set.tuples(), Vec::<Vec<Value>>::new());
    }

    #[test]
    fn first_value_and_column_use_first_declared_column() {
        let set = sample();
        assert_eq!(set.first_value(), Some(Value::Int64(1)));
        assert_eq!(set.column(), vec![Value::Int64(1), Value::Int64(2)]);
    }

    #[test]
    fn tuples_preserve_declaration_order() {
        let set = sample();
        assert_eq!(set.first_tuple(), vec![
            Value::Int64(1),
            Value::Text("first".into())
        ]);
        assert_eq!(set.tuples().len(), 2);
    }

    #[test]
    fn wildcard_sets_have_no_named_columns() {
        // A wildcard select declares no columns; rows carry values the
        // mapping cannot name, so the shaped views see nothing.
        let set = RowSet::new(&[], vec![vec![Value::Int64(7)]]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.first_row(), RowMap::new());
        assert_eq!(set.first_value(), None);
        assert_eq!(set.column(), Vec::<Value>::new());
    }

    #[test]
    fn extra_row_values_beyond_declared_columns_are_dropped() {
        let set = RowSet::new(&["id".to_string()], vec![vec![
            Value::Int64(1),
            Value::Text("spare".into()),
        ]]);
        assert_eq!(set.rows()[0].len(), 1);
        assert_eq!(set.first_tuple(), vec![Value::Int64(1)]);
    }
}
