//! Loading process logs from delimited text files.
//!
//! Column kinds come either from a YAML kind file or from sampling the data:
//! a column is a date column if every sampled value parses as a date, else a
//! date-time column, else numeric, else categorical. Cells are then parsed
//! according to their column's kind into a [`LogTable`].

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    data::{MISSING_TOKEN, parse_log_value, parse_naive_date, parse_naive_datetime},
    io_utils,
    kind::ColumnKind,
    source::{LogColumn, LogTable},
};

pub const DEFAULT_SAMPLE_ROWS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindEntry {
    pub name: String,
    pub kind: ColumnKind,
}

/// Declared column kinds of a log, persisted as YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogKindFile {
    pub columns: Vec<KindEntry>,
}

impl LogKindFile {
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating kind file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing kind file YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening kind file {path:?}"))?;
        let reader = BufReader::new(file);
        let kinds = serde_yaml::from_reader(reader).context("Parsing kind file YAML")?;
        Ok(kinds)
    }

    fn columns_for(&self, headers: &[String]) -> Result<Vec<LogColumn>> {
        headers
            .iter()
            .map(|header| {
                self.kind_of(header)
                    .map(|kind| LogColumn::new(header.as_str(), kind))
                    .ok_or_else(|| anyhow!("Kind file does not declare column '{header}'"))
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions<'a> {
    pub delimiter: Option<u8>,
    pub kinds: Option<&'a LogKindFile>,
    pub sample_rows: usize,
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self {
            delimiter: None,
            kinds: None,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

#[derive(Debug, Clone)]
struct KindCandidate {
    possible_date: bool,
    possible_datetime: bool,
    possible_numeric: bool,
    observed: bool,
}

impl KindCandidate {
    fn new() -> Self {
        Self {
            possible_date: true,
            possible_datetime: true,
            possible_numeric: true,
            observed: false,
        }
    }

    fn observe(&mut self, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == MISSING_TOKEN {
            return;
        }
        self.observed = true;
        if self.possible_date && parse_naive_date(trimmed).is_err() {
            self.possible_date = false;
        }
        if self.possible_datetime && parse_naive_datetime(trimmed).is_err() {
            self.possible_datetime = false;
        }
        if self.possible_numeric && trimmed.parse::<f64>().is_err() {
            self.possible_numeric = false;
        }
    }

    fn decide(&self) -> ColumnKind {
        if !self.observed {
            ColumnKind::Categorical
        } else if self.possible_date {
            ColumnKind::Date
        } else if self.possible_datetime {
            ColumnKind::DateTime
        } else if self.possible_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }
}

/// Infers column kinds from the header row and up to `sample_rows` data rows
/// (0 samples every row).
pub fn infer_kinds(headers: &[String], rows: &[Vec<String>], sample_rows: usize) -> LogKindFile {
    let mut candidates = vec![KindCandidate::new(); headers.len()];
    let limit = if sample_rows == 0 {
        rows.len()
    } else {
        sample_rows.min(rows.len())
    };
    for row in &rows[..limit] {
        for (candidate, value) in candidates.iter_mut().zip(row) {
            candidate.observe(value);
        }
    }
    let columns = headers
        .iter()
        .zip(&candidates)
        .map(|(name, candidate)| KindEntry {
            name: name.clone(),
            kind: candidate.decide(),
        })
        .collect();
    LogKindFile { columns }
}

fn read_records(path: &Path, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = reader
        .headers()
        .with_context(|| format!("Reading header row of {path:?}"))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() {
        bail!("Log file {path:?} has no columns");
    }
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

/// Infers the kinds of a log file without loading it into a table.
pub fn infer_kinds_from_path(path: &Path, delimiter: Option<u8>, sample_rows: usize) -> Result<LogKindFile> {
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let (headers, rows) = read_records(path, delimiter)?;
    Ok(infer_kinds(&headers, &rows, sample_rows))
}

pub fn load_log(name: &str, path: &Path, options: &LoadOptions<'_>) -> Result<LogTable> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let (headers, rows) = read_records(path, delimiter)?;

    let inferred;
    let kinds = match options.kinds {
        Some(kinds) => kinds,
        None => {
            inferred = infer_kinds(&headers, &rows, options.sample_rows);
            &inferred
        }
    };
    let columns = kinds
        .columns_for(&headers)
        .with_context(|| format!("Assigning column kinds for {path:?}"))?;
    debug!(
        "Column kinds for '{name}': {:?}",
        columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.kind))
            .collect::<Vec<_>>()
    );

    let mut table = LogTable::new(name, columns.clone())?;
    for (row_idx, row) in rows.iter().enumerate() {
        let values = row
            .iter()
            .zip(&columns)
            .map(|(raw, column)| {
                parse_log_value(raw, column.kind)
                    .with_context(|| format!("Row {}, column '{}'", row_idx + 2, column.name))
            })
            .collect::<Result<Vec<_>>>()?;
        table.add_row(values)?;
    }
    info!(
        "Loaded log '{name}' from {path:?}: {} column(s), {} row(s)",
        columns.len(),
        rows.len()
    );
    Ok(table)
}
