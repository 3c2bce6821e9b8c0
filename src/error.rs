//! Error types for log retrieval and table conversion.
//!
//! The conversion core reports failures through [`ConversionError`]; source
//! tables report per-cell failures through [`RetrievalError`], which the
//! builder wraps with the row and column it was reading.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RetrievalError {
    #[error("Row {row} is out of range (log has {rows} row(s))")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Column {column} is out of range (log has {columns} column(s))")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("Value '{value}' is not numeric")]
    NotNumeric { value: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("{}", no_source_message(.requested.as_deref()))]
    NoSourceTable { requested: Option<String> },

    #[error("Failed to read row {row}, column '{column}': {source}")]
    ValueRetrieval {
        row: usize,
        column: String,
        #[source]
        source: RetrievalError,
    },

    #[error("Conversion cancelled after {rows_completed} row(s)")]
    Cancelled { rows_completed: usize },
}

fn no_source_message(requested: Option<&str>) -> String {
    match requested {
        Some(name) => format!("No log named '{name}' is available to convert"),
        None => "No log is available to convert; supply a log or a log name".to_string(),
    }
}
