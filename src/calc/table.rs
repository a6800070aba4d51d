//! Column-extensible table over a contiguous row index

use crate::error::{CalcError, CalcResult};
use crate::series::Series;
use std::collections::HashMap;

/// Named columns of equal length, kept in insertion order.
///
/// The first column written fixes the row count `N`; every later column must
/// have exactly `N` rows. Columns can be overwritten but never removed.
#[derive(Debug, Clone, Default)]
pub struct ColumnTable {
    columns: Vec<(String, Series)>,
    index: HashMap<String, usize>,
    rows: Option<usize>,
}

impl ColumnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a column
    pub fn set_column(&mut self, name: impl Into<String>, values: Series) -> CalcResult<()> {
        let name = name.into();
        match self.rows {
            Some(expected) if values.len() != expected => {
                return Err(CalcError::DimensionMismatch {
                    column: name,
                    expected,
                    actual: values.len(),
                });
            }
            None if values.is_empty() => return Err(CalcError::EmptyTable { column: name }),
            None => self.rows = Some(values.len()),
            Some(_) => {}
        }

        match self.index.get(&name) {
            Some(&position) => self.columns[position].1 = values,
            None => {
                self.index.insert(name.clone(), self.columns.len());
                self.columns.push((name, values));
            }
        }
        Ok(())
    }

    pub fn get_column(&self, name: &str) -> CalcResult<&Series> {
        self.index
            .get(name)
            .map(|&position| &self.columns[position].1)
            .ok_or_else(|| CalcError::ColumnNotFound(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of rows, zero until the first column is written
    pub fn row_count(&self) -> usize {
        self.rows.unwrap_or(0)
    }

    /// Row count once established by the first column
    pub fn established_rows(&self) -> Option<usize> {
        self.rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.columns.iter().map(|(name, values)| (name.as_str(), values))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_sets_row_count() {
        let mut table = ColumnTable::new();
        assert_eq!(table.established_rows(), None);

        table.set_column("a", Series::from(vec![1.0, 2.0, 3.0])).unwrap();
        assert_eq!(table.row_count(), 3);

        let err = table.set_column("b", Series::from(vec![1.0])).unwrap_err();
        assert_eq!(
            err,
            CalcError::DimensionMismatch {
                column: "b".to_string(),
                expected: 3,
                actual: 1,
            }
        );
        assert!(!table.has_column("b"));
    }

    #[test]
    fn test_empty_first_column_rejected() {
        let mut table = ColumnTable::new();
        assert!(matches!(
            table.set_column("t", Series::default()),
            Err(CalcError::EmptyTable { .. })
        ));
        assert_eq!(table.established_rows(), None);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut table = ColumnTable::new();
        table.set_column("a", Series::full(2, 1.0)).unwrap();
        table.set_column("b", Series::full(2, 2.0)).unwrap();
        table.set_column("a", Series::full(2, 5.0)).unwrap();

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.get_column("a").unwrap().get(1), Some(5.0));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_column() {
        let table = ColumnTable::new();
        assert_eq!(
            table.get_column("q(x1)"),
            Err(CalcError::ColumnNotFound("q(x1)".to_string()))
        );
    }
}
