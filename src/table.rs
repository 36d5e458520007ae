use std::collections::HashSet;

use crate::error::{EtlError, Result};

/// A string-typed table as it comes out of the raw CSV members. Missing or
/// blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, step: &'static str, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| EtlError::Schema {
            step,
            column: name.to_string(),
        })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Removes every named column. All of them must be present.
    pub fn drop_columns(self, step: &'static str, names: &[&str]) -> Result<Table> {
        let mut doomed = HashSet::with_capacity(names.len());
        for name in names {
            doomed.insert(self.require_column(step, name)?);
        }

        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|idx| !doomed.contains(idx))
            .collect();
        let headers = keep.iter().map(|&idx| self.headers[idx].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|mut row| keep.iter().map(|&idx| row[idx].take()).collect())
            .collect();

        Ok(Table { headers, rows })
    }

    /// Replaces missing cells of the named columns with `value`.
    pub fn fill_missing(self, step: &'static str, names: &[&str], value: &str) -> Result<Table> {
        let mut cols = Vec::with_capacity(names.len());
        for name in names {
            cols.push(self.require_column(step, name)?);
        }

        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                for &col in &cols {
                    if row[col].is_none() {
                        row[col] = Some(value.to_string());
                    }
                }
                row
            })
            .collect();

        Ok(Table {
            headers: self.headers,
            rows,
        })
    }
}

/// Blank or whitespace-only cells count as missing.
pub fn normalize_cell(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
