//! Conversion of a source log into an [`ExampleTable`].
//!
//! The build is two passes over the source: a schema pass that types every
//! column, then a row pass that copies numeric and temporal cells verbatim and
//! encodes nominal cells through each column's mapping. Rows are visited top
//! to bottom and columns left to right, which fixes the category codes.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::{debug, info};

use crate::{
    error::ConversionError,
    example_table::{Attribute, ExampleTable},
    kind::{AttributeType, infer_attribute_type},
    source::{ProcessLogs, SourceTable},
};

/// Cooperative cancellation flag checked between rows.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    cancel: Option<CancellationToken>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build<S>(&self, source: Option<&S>) -> Result<ExampleTable, ConversionError>
    where
        S: SourceTable + ?Sized,
    {
        let source = source.ok_or(ConversionError::NoSourceTable { requested: None })?;

        let mut attributes = schema_pass(source);
        debug!(
            "Typed {} attribute(s): {:?}",
            attributes.len(),
            attributes
                .iter()
                .map(|a| format!("{}:{}", a.name(), a.value_type()))
                .collect::<Vec<_>>()
        );

        let row_count = source.row_count();
        let mut rows = Vec::with_capacity(row_count);
        for row_idx in 0..row_count {
            if let Some(token) = &self.cancel
                && token.is_cancelled()
            {
                return Err(ConversionError::Cancelled {
                    rows_completed: row_idx,
                });
            }
            rows.push(encode_row(source, &mut attributes, row_idx)?);
        }

        Ok(ExampleTable::from_parts(attributes, rows))
    }
}

fn schema_pass<S>(source: &S) -> Vec<Attribute>
where
    S: SourceTable + ?Sized,
{
    (0..source.column_count())
        .map(|column| {
            Attribute::new(
                source.column_name(column),
                infer_attribute_type(source, column),
            )
        })
        .collect()
}

fn encode_row<S>(
    source: &S,
    attributes: &mut [Attribute],
    row: usize,
) -> Result<Vec<f64>, ConversionError>
where
    S: SourceTable + ?Sized,
{
    let mut data = Vec::with_capacity(attributes.len());
    for (column, attribute) in attributes.iter_mut().enumerate() {
        let retrieval_error = |err| ConversionError::ValueRetrieval {
            row,
            column: source.column_name(column).to_string(),
            source: err,
        };
        let value = match (attribute.value_type(), attribute.mapping_mut()) {
            (AttributeType::Nominal, Some(mapping)) => {
                let label = source
                    .value_as_string(row, column)
                    .map_err(retrieval_error)?;
                mapping.map_string(&label) as f64
            }
            _ => source.value(row, column).map_err(retrieval_error)?,
        };
        data.push(value);
    }
    Ok(data)
}

/// Resolves a log by its optional name and converts it.
pub fn convert(
    logs: &ProcessLogs,
    log_name: Option<&str>,
    cancel: Option<CancellationToken>,
) -> Result<ExampleTable, ConversionError> {
    let source = logs.resolve(log_name)?;
    info!(
        "Converting log '{}' ({} column(s), {} row(s))",
        source.name(),
        source.column_count(),
        source.row_count()
    );
    let builder = match cancel {
        Some(token) => TableBuilder::new().with_cancellation(token),
        None => TableBuilder::new(),
    };
    builder.build(Some(source))
}
