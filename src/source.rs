//! Source tables: the logs a process run produces.
//!
//! [`SourceTable`] is the read-only view the conversion consumes. [`LogTable`]
//! is the in-memory log rows are appended to while a run progresses, and
//! [`ProcessLogs`] is the set of named logs a run registered, including the
//! rule for picking one when no name is configured.

use std::collections::HashSet;

use anyhow::{Result, ensure};
use log::info;

use crate::{
    data::{LogValue, MISSING_TOKEN, format_for_kind},
    error::{ConversionError, RetrievalError},
    kind::ColumnKind,
};

pub trait SourceTable {
    fn column_count(&self) -> usize;

    fn column_name(&self, column: usize) -> &str;

    fn is_date(&self, column: usize) -> bool;

    fn is_date_time(&self, column: usize) -> bool;

    fn is_numerical(&self, column: usize) -> bool;

    fn row_count(&self) -> usize;

    /// Numeric value of a cell; unknown values are NaN.
    fn value(&self, row: usize, column: usize) -> Result<f64, RetrievalError>;

    fn value_as_string(&self, row: usize, column: usize) -> Result<String, RetrievalError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogColumn {
    pub name: String,
    pub kind: ColumnKind,
}

impl LogColumn {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogTable {
    name: String,
    columns: Vec<LogColumn>,
    rows: Vec<Vec<LogValue>>,
}

impl LogTable {
    pub fn new(name: impl Into<String>, columns: Vec<LogColumn>) -> Result<Self> {
        let name = name.into();
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            ensure!(
                seen.insert(column.name.as_str()),
                "Log '{name}' declares column '{}' more than once",
                column.name
            );
        }
        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[LogColumn] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn add_row(&mut self, row: Vec<LogValue>) -> Result<()> {
        ensure!(
            row.len() == self.columns.len(),
            "Log '{}' expects {} value(s) per row but received {}",
            self.name,
            self.columns.len(),
            row.len()
        );
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<LogValue>] {
        &self.rows
    }

    fn cell(&self, row: usize, column: usize) -> Result<&LogValue, RetrievalError> {
        let values = self.rows.get(row).ok_or(RetrievalError::RowOutOfRange {
            row,
            rows: self.rows.len(),
        })?;
        values.get(column).ok_or(RetrievalError::ColumnOutOfRange {
            column,
            columns: self.columns.len(),
        })
    }

    fn kind(&self, column: usize) -> ColumnKind {
        self.columns
            .get(column)
            .map(|c| c.kind)
            .unwrap_or_default()
    }
}

impl SourceTable for LogTable {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, column: usize) -> &str {
        &self.columns[column].name
    }

    fn is_date(&self, column: usize) -> bool {
        self.kind(column).is_date()
    }

    fn is_date_time(&self, column: usize) -> bool {
        self.kind(column).is_date_time()
    }

    fn is_numerical(&self, column: usize) -> bool {
        self.kind(column).is_numerical()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: usize) -> Result<f64, RetrievalError> {
        match self.cell(row, column)? {
            LogValue::Number(n) => Ok(*n),
            LogValue::Missing => Ok(f64::NAN),
            LogValue::Text(s) => Err(RetrievalError::NotNumeric { value: s.clone() }),
        }
    }

    fn value_as_string(&self, row: usize, column: usize) -> Result<String, RetrievalError> {
        Ok(match self.cell(row, column)? {
            LogValue::Text(s) => s.clone(),
            LogValue::Missing => MISSING_TOKEN.to_string(),
            LogValue::Number(n) => format_for_kind(*n, self.kind(column)),
        })
    }
}

/// Named logs registered by a process run, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ProcessLogs {
    tables: Vec<LogTable>,
}

impl ProcessLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a log; a log with the same name is replaced in place.
    pub fn register(&mut self, table: LogTable) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LogTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LogTable> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Picks the log to convert: the named one, or the first registered log
    /// when no name is given. A name that matches nothing never falls back.
    pub fn resolve(&self, selector: Option<&str>) -> Result<&LogTable, ConversionError> {
        match selector.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => self.get(name).ok_or_else(|| ConversionError::NoSourceTable {
                requested: Some(name.to_string()),
            }),
            None => {
                let first = self
                    .tables
                    .first()
                    .ok_or(ConversionError::NoSourceTable { requested: None })?;
                info!(
                    "No log name was specified, using first data table found ('{}')",
                    first.name
                );
                Ok(first)
            }
        }
    }
}
