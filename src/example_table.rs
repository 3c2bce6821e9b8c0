//! The immutable, strongly-typed table a conversion produces.
//!
//! An [`ExampleTable`] owns its [`Attribute`]s (and through them the nominal
//! [`CategoryMapping`]s) plus a dense row-major `f64` store. Rows refer to
//! attributes by position only.

use serde::Serialize;

use crate::{
    data::{format_date_millis, format_datetime_millis, format_number},
    kind::AttributeType,
    mapping::CategoryMapping,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    name: String,
    #[serde(rename = "type")]
    value_type: AttributeType,
    #[serde(rename = "labels", skip_serializing_if = "Option::is_none")]
    mapping: Option<CategoryMapping>,
}

impl Attribute {
    /// Creates an attribute; nominal attributes start with an empty mapping.
    pub fn new(name: impl Into<String>, value_type: AttributeType) -> Self {
        let mapping = value_type.is_nominal().then(CategoryMapping::new);
        Self {
            name: name.into(),
            value_type,
            mapping,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> AttributeType {
        self.value_type
    }

    pub fn is_nominal(&self) -> bool {
        self.value_type.is_nominal()
    }

    pub fn mapping(&self) -> Option<&CategoryMapping> {
        self.mapping.as_ref()
    }

    pub(crate) fn mapping_mut(&mut self) -> Option<&mut CategoryMapping> {
        self.mapping.as_mut()
    }

    /// Renders a stored cell; `None` marks an unknown value.
    pub fn display_value(&self, value: f64) -> Option<String> {
        if value.is_nan() {
            return None;
        }
        match self.value_type {
            AttributeType::Date => format_date_millis(value),
            AttributeType::DateTime => format_datetime_millis(value),
            AttributeType::Real => Some(format_number(value)),
            AttributeType::Nominal => self
                .mapping
                .as_ref()
                .and_then(|m| m.label_for_value(value))
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExampleTable {
    attributes: Vec<Attribute>,
    rows: Vec<Vec<f64>>,
}

impl ExampleTable {
    pub(crate) fn from_parts(attributes: Vec<Attribute>, rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == attributes.len()));
        Self { attributes, rows }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn value(&self, row: usize, attribute: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(attribute)).copied()
    }

    /// Decoded label of a nominal cell.
    pub fn label(&self, row: usize, attribute: usize) -> Option<&str> {
        let value = self.value(row, attribute)?;
        self.attributes
            .get(attribute)?
            .mapping()?
            .label_for_value(value)
    }

    /// Compares two tables cell by cell on their bit patterns, so NaN cells
    /// compare equal to NaN cells.
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
            && self.rows.len() == other.rows.len()
            && self.rows.iter().zip(&other.rows).all(|(left, right)| {
                left.len() == right.len()
                    && left
                        .iter()
                        .zip(right)
                        .all(|(a, b)| a.to_bits() == b.to_bits())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExampleTable {
        let mut status = Attribute::new("status", AttributeType::Nominal);
        let mapping = status.mapping_mut().unwrap();
        mapping.map_string("ok");
        mapping.map_string("fail");
        ExampleTable::from_parts(
            vec![Attribute::new("cpu", AttributeType::Real), status],
            vec![vec![0.5, 0.0], vec![f64::NAN, 1.0]],
        )
    }

    #[test]
    fn only_nominal_attributes_carry_mappings() {
        assert!(Attribute::new("x", AttributeType::Real).mapping().is_none());
        assert!(Attribute::new("x", AttributeType::Date).mapping().is_none());
        let nominal = Attribute::new("x", AttributeType::Nominal);
        assert!(nominal.mapping().is_some_and(CategoryMapping::is_empty));
    }

    #[test]
    fn accessors_are_positional() {
        let table = sample();
        assert_eq!(table.attribute_count(), 2);
        assert_eq!(table.attribute_index("status"), Some(1));
        assert_eq!(table.value(0, 0), Some(0.5));
        assert_eq!(table.label(1, 1), Some("fail"));
        assert_eq!(table.label(0, 0), None);
        assert_eq!(table.row(3), None);
    }

    #[test]
    fn display_value_decodes_by_type() {
        let table = sample();
        let status = table.attribute(1).unwrap();
        assert_eq!(status.display_value(0.0).as_deref(), Some("ok"));
        assert_eq!(status.display_value(f64::NAN), None);
        let day = Attribute::new("day", AttributeType::Date);
        assert_eq!(day.display_value(86_400_000.0).as_deref(), Some("1970-01-02"));
        let cpu = table.attribute(0).unwrap();
        assert_eq!(cpu.display_value(2.0).as_deref(), Some("2"));
    }

    #[test]
    fn bitwise_eq_treats_nan_cells_as_equal() {
        let left = sample();
        let right = sample();
        assert_ne!(left, right);
        assert!(left.bitwise_eq(&right));
    }
}
