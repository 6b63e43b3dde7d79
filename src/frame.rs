//! In-memory tabular record set
//!
//! A [`Frame`] is an ordered list of column names and rows of optional
//! string cells. CSV files decode into frames, frames are concatenated and
//! enriched, and the result is coerced into Arrow through an explicit
//! schema. Cells stay untyped until that last step.

use crate::error::{Error, Result};

/// Row of optional cells, aligned with the frame's columns
pub type Row = Vec<Option<String>>;

/// Tabular record set with named string columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Frame {
    /// Create an empty frame with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a frame from columns and rows, checking row widths
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut frame = Self::new(columns);
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the frame has neither columns nor rows
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, or a missing-column error
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::missing_column(name))?;
        Ok(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// Single cell
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Other(format!(
                "Row has {} cells but frame has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append another frame's rows below this one
    ///
    /// Columns are unioned by name: columns only in `other` are added at the
    /// end and back-filled with nulls, and cells missing from `other` are
    /// null. No deduplication happens.
    pub fn concat(&mut self, other: Frame) {
        if self.is_empty() {
            *self = other;
            return;
        }

        for column in &other.columns {
            if !self.has_column(column) {
                self.columns.push(column.clone());
                for row in &mut self.rows {
                    row.push(None);
                }
            }
        }

        let mapping: Vec<usize> = other
            .columns
            .iter()
            .filter_map(|c| self.column_index(c))
            .collect();
        let width = self.columns.len();

        self.rows.reserve(other.rows.len());
        for row in other.rows {
            let mut aligned = vec![None; width];
            for (cell, &target) in row.into_iter().zip(&mapping) {
                aligned[target] = cell;
            }
            self.rows.push(aligned);
        }
    }

    /// Remove a column, or fail if it does not exist
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::missing_column(name))?;
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        Ok(())
    }

    /// Append a column with one value per row
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Option<String>>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::Other(format!("Column '{name}' already exists")));
        }
        if values.len() != self.rows.len() {
            return Err(Error::Other(format!(
                "Column '{name}' has {} values but frame has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}
