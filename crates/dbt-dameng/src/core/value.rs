//! Query results as returned to the host.
//!
//! Values are carried as text, the way the ODBC text buffers deliver them;
//! the host casts them when it needs typed values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw outcome of one statement on a driver session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    /// Statement kind reported by the driver (e.g. "SELECT", "INSERT").
    pub statement: Option<String>,
    /// Rows fetched for a query, or rows affected by DML.
    pub row_count: i64,
    /// Result set, empty when the statement produced none.
    pub table: ResultTable,
}

/// A tabular result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column names in result order.
    pub column_names: Vec<String>,
    /// Row values in column order; `None` is SQL NULL.
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultTable {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { column_names, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Value at `row` for the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// All rows as column-name → value maps.
    pub fn to_records(&self) -> Vec<BTreeMap<String, Option<String>>> {
        self.rows
            .iter()
            .map(|row| {
                self.column_names
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}
