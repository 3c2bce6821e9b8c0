//! Column kinds reported by process logs and the attribute types they become.
//!
//! A log column describes itself through three predicates (date, date-time,
//! numerical). [`infer_attribute_type()`] folds them into exactly one
//! [`AttributeType`], checking them in a fixed order so a column that answers
//! yes to several predicates still resolves deterministically.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::source::SourceTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnKind {
    Date,
    DateTime,
    Numeric,
    #[default]
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Date => "date",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["date", "datetime", "numeric", "categorical"]
    }

    pub fn is_date(&self) -> bool {
        matches!(self, ColumnKind::Date)
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, ColumnKind::DateTime)
    }

    pub fn is_numerical(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "date" => Ok(ColumnKind::Date),
            "datetime" | "date-time" | "date_time" | "timestamp" => Ok(ColumnKind::DateTime),
            "numeric" | "numerical" | "number" | "real" | "float" | "integer" => {
                Ok(ColumnKind::Numeric)
            }
            "categorical" | "nominal" | "string" | "text" => Ok(ColumnKind::Categorical),
            _ => Err(anyhow!(
                "Unknown column kind '{value}'. Supported kinds: {}",
                ColumnKind::variants().join(", ")
            )),
        }
    }
}

impl Serialize for ColumnKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        ColumnKind::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

/// Value domain of an attribute in a finished example table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Date,
    DateTime,
    Real,
    Nominal,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Date => "date",
            AttributeType::DateTime => "date_time",
            AttributeType::Real => "real",
            AttributeType::Nominal => "nominal",
        }
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, AttributeType::Nominal)
    }

    /// Resolves the predicate answers of a column; the first match wins.
    pub fn from_predicates(is_date: bool, is_date_time: bool, is_numerical: bool) -> Self {
        if is_date {
            AttributeType::Date
        } else if is_date_time {
            AttributeType::DateTime
        } else if is_numerical {
            AttributeType::Real
        } else {
            AttributeType::Nominal
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ColumnKind> for AttributeType {
    fn from(kind: ColumnKind) -> Self {
        AttributeType::from_predicates(kind.is_date(), kind.is_date_time(), kind.is_numerical())
    }
}

pub fn infer_attribute_type<S>(source: &S, column: usize) -> AttributeType
where
    S: SourceTable + ?Sized,
{
    AttributeType::from_predicates(
        source.is_date(column),
        source.is_date_time(column),
        source.is_numerical(column),
    )
}
