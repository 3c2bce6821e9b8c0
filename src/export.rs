//! Writing example tables out: CSV with decoded cells, JSON with raw codes,
//! and an elastic text preview for the terminal.

use std::{borrow::Cow, fmt::Write as _, io::Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::example_table::{Attribute, ExampleTable};

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Serialize)]
struct TableDocument<'a> {
    attributes: &'a [Attribute],
    rows: Vec<Vec<Option<f64>>>,
}

pub fn write_csv<W: Write>(table: &ExampleTable, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    writer
        .write_record(table.attributes().iter().map(Attribute::name))
        .context("Writing header row")?;
    for (idx, row) in table.rows().iter().enumerate() {
        let cells = table
            .attributes()
            .iter()
            .zip(row)
            .map(|(attribute, value)| attribute.display_value(*value).unwrap_or_default());
        writer
            .write_record(cells)
            .with_context(|| format!("Writing row {}", idx + 1))?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

pub fn to_json(table: &ExampleTable) -> Result<String> {
    let document = TableDocument {
        attributes: table.attributes(),
        rows: table
            .rows()
            .iter()
            .map(|row| row.iter().map(|v| (!v.is_nan()).then_some(*v)).collect())
            .collect(),
    };
    serde_json::to_string_pretty(&document).context("Serializing table to JSON")
}

pub fn write_table<W: Write>(table: &ExampleTable, mut writer: W, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(table, writer, b','),
        OutputFormat::Json => {
            let json = to_json(table)?;
            writeln!(writer, "{json}").context("Writing JSON output")?;
            writer.flush().context("Flushing JSON output")
        }
    }
}

/// Renders the first `limit` rows (all rows when `limit` is 0) as an aligned
/// text table with `name (type)` headers.
pub fn render_preview(table: &ExampleTable, limit: usize) -> String {
    let headers = table
        .attributes()
        .iter()
        .map(|a| format!("{} ({})", a.name(), a.value_type()))
        .collect::<Vec<_>>();
    let take = if limit == 0 { table.row_count() } else { limit };
    let rows = table
        .rows()
        .iter()
        .take(take)
        .map(|row| {
            table
                .attributes()
                .iter()
                .zip(row)
                .map(|(attribute, value)| {
                    attribute
                        .display_value(*value)
                        .unwrap_or_else(|| "?".to_string())
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    render_rows(&headers, &rows)
}

pub fn render_rows(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(sanitize_cell(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_line(headers.iter().map(String::as_str), &widths));
    let separators = widths.iter().map(|w| "-".repeat((*w).max(3))).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(separators.iter().map(String::as_str), &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row.iter().map(String::as_str), &widths));
    }
    output
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", sanitize_cell(cell), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::TableBuilder,
        data::LogValue,
        kind::ColumnKind,
        source::{LogColumn, LogTable},
    };

    fn table() -> ExampleTable {
        let mut log = LogTable::new(
            "run",
            vec![
                LogColumn::new("day", ColumnKind::Date),
                LogColumn::new("cpu", ColumnKind::Numeric),
                LogColumn::new("status", ColumnKind::Categorical),
            ],
        )
        .unwrap();
        log.add_row(vec![LogValue::Number(0.0), LogValue::Number(0.5), "ok".into()])
            .unwrap();
        log.add_row(vec![LogValue::Number(86_400_000.0), LogValue::Missing, "fail".into()])
            .unwrap();
        TableBuilder::new().build(Some(&log)).unwrap()
    }

    #[test]
    fn csv_decodes_labels_and_dates() {
        let mut buffer = Vec::new();
        write_csv(&table(), &mut buffer, b',').unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["day,cpu,status", "1970-01-01,0.5,ok", "1970-01-02,,fail"]
        );
    }

    #[test]
    fn json_keeps_codes_and_nulls_unknowns() {
        let json = to_json(&table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["attributes"][0]["type"], "date");
        assert!(value["attributes"][0].get("labels").is_none());
        assert_eq!(value["attributes"][2]["labels"], serde_json::json!(["ok", "fail"]));
        assert_eq!(value["rows"][1][1], serde_json::Value::Null);
        assert_eq!(value["rows"][1][2], 1.0);
    }

    #[test]
    fn preview_aligns_columns_and_limits_rows() {
        let rendered = render_preview(&table(), 1);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "day (date)  cpu (real)  status (nominal)");
        assert_eq!(lines[2], "1970-01-01  0.5         ok");
    }

    #[test]
    fn render_rows_replaces_control_characters() {
        let rendered = render_rows(&["note".to_string()], &[vec!["a\nb".to_string()]]);
        assert_eq!(rendered.lines().nth(2), Some("a b"));
    }
}
