//! In-memory tables.
//!
//! [`RawTable`] holds the text exactly as read; [`NormalizedTable`] holds the
//! typed cells produced by the cleaning pipeline. Both keep the header order of
//! the input, and a normalized table always has the same shape as the raw
//! table it came from.

use std::collections::HashSet;

use thiserror::Error;

use crate::data::{Cell, render_cell};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row {row} has {found} field(s) but the header defines {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("duplicate header '{0}'")]
    DuplicateHeader(String),
    #[error("column '{0}' not found in input headers")]
    MissingColumn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut seen = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(TableError::DuplicateHeader(header.clone()));
            }
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(TableError::RaggedRow {
                    row: idx + 1,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
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

    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn column<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = &'a str> + use<'a>, TableError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    pub(crate) fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == headers.len()));
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Cell> + use<'a>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn rendered_rows(&self, null_marker: &str) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| render_cell(cell, null_marker)).collect())
            .collect()
    }

    /// Renders every cell back to text, producing a table that can be cleaned again.
    pub fn to_raw(&self, null_marker: &str) -> RawTable {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rendered_rows(null_marker),
        }
    }
}
