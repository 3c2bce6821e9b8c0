use std::fmt;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::kind::ColumnKind;

/// Token a log uses to print an unknown value.
pub const MISSING_TOKEN: &str = "?";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LogValue {
    Number(f64),
    Text(String),
    Missing,
}

impl LogValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, LogValue::Missing)
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        LogValue::Number(value)
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Number(n) => write!(f, "{}", format_number(*n)),
            LogValue::Text(s) => f.write_str(s),
            LogValue::Missing => f.write_str(MISSING_TOKEN),
        }
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

pub fn date_to_millis(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64
}

pub fn datetime_to_millis(datetime: NaiveDateTime) -> f64 {
    datetime.and_utc().timestamp_millis() as f64
}

pub fn millis_to_datetime(millis: f64) -> Option<NaiveDateTime> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.naive_utc())
}

pub fn format_date_millis(millis: f64) -> Option<String> {
    millis_to_datetime(millis).map(|dt| dt.format("%Y-%m-%d").to_string())
}

pub fn format_datetime_millis(millis: f64) -> Option<String> {
    millis_to_datetime(millis).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Formats a numeric cell the way a log of the given kind prints it.
pub fn format_for_kind(value: f64, kind: ColumnKind) -> String {
    if value.is_nan() {
        return MISSING_TOKEN.to_string();
    }
    let formatted = match kind {
        ColumnKind::Date => format_date_millis(value),
        ColumnKind::DateTime => format_datetime_millis(value),
        _ => None,
    };
    formatted.unwrap_or_else(|| format_number(value))
}

/// Parses a raw CSV field into a cell of the given column kind.
pub fn parse_log_value(raw: &str, kind: ColumnKind) -> Result<LogValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING_TOKEN {
        return Ok(LogValue::Missing);
    }
    let parsed = match kind {
        ColumnKind::Categorical => LogValue::Text(raw.to_string()),
        ColumnKind::Numeric => {
            let parsed: f64 = trimmed
                .parse()
                .with_context(|| format!("Failed to parse '{trimmed}' as number"))?;
            LogValue::Number(parsed)
        }
        ColumnKind::Date => LogValue::Number(date_to_millis(parse_naive_date(trimmed)?)),
        ColumnKind::DateTime => {
            LogValue::Number(datetime_to_millis(parse_naive_datetime(trimmed)?))
        }
    };
    Ok(parsed)
}
