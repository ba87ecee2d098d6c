use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::SamplerError;

pub use crate::types::{Cell, ColumnName, Row};

/// In-memory table with named columns and nullable text cells.
///
/// Every row has exactly one cell per column. Column names are unique and
/// non-empty. The sampler only reads the category and session columns; all
/// other cells pass through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<ColumnName>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given column schema.
    pub fn new<I, S>(columns: I) -> Result<Self, SamplerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnName>,
    {
        let columns: Vec<ColumnName> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for name in &columns {
            if name.is_empty() {
                return Err(SamplerError::Configuration(
                    "column names must not be empty".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(SamplerError::Configuration(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a table and append `rows`, validating each row's width.
    pub fn with_rows<I, S, R>(columns: I, rows: R) -> Result<Self, SamplerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnName>,
        R: IntoIterator<Item = Row>,
    {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a table whose shape is already known to be consistent.
    pub(crate) fn from_parts(columns: Vec<ColumnName>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    /// Append one row. Fails when the row width does not match the schema.
    pub fn push_row(&mut self, row: Row) -> Result<(), SamplerError> {
        if row.len() != self.columns.len() {
            return Err(SamplerError::Configuration(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Resolve every name in `names`, reporting all missing columns at once.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>, SamplerError> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push((*name).to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(SamplerError::MissingColumn(missing));
        }
        Ok(indices)
    }

    /// Non-null value at (`row_idx`, `column_idx`).
    pub fn value(&self, row_idx: usize, column_idx: usize) -> Option<&str> {
        self.rows
            .get(row_idx)
            .and_then(|row| cell_value(row, column_idx))
    }

    /// Zero-row table sharing this table's schema.
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    /// New table holding the rows at `indices`, in the order given.
    ///
    /// Out-of-range indices are skipped.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|idx| self.rows.get(*idx).cloned())
                .collect(),
        }
    }

    /// Number of distinct non-null values in `column_idx` across `row_indices`.
    pub(crate) fn distinct_count(&self, row_indices: &[usize], column_idx: usize) -> usize {
        row_indices
            .iter()
            .filter_map(|idx| self.value(*idx, column_idx))
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Borrow a non-null cell. Empty strings are treated as values, not nulls.
pub fn cell_value(row: &Row, column_idx: usize) -> Option<&str> {
    row.get(column_idx).and_then(|cell| cell.as_deref())
}

/// Convenience constructor for a row of present values.
pub fn row_of<I, S>(values: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(|value| Some(value.into())).collect()
}
