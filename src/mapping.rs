//! Per-column string-to-code mapping for nominal attributes.
//!
//! Codes are handed out in first-seen order starting at zero and are never
//! reused or renumbered. A mapping is only mutated while its table is being
//! built; the finished [`ExampleTable`](crate::example_table::ExampleTable)
//! hands out shared references only.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryMapping {
    labels: Vec<String>,
    #[serde(skip)]
    codes: HashMap<String, usize>,
}

impl CategoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code for `value`, allocating the next code when unseen.
    pub fn map_string(&mut self, value: &str) -> usize {
        if let Some(code) = self.codes.get(value) {
            return *code;
        }
        let code = self.labels.len();
        self.labels.push(value.to_string());
        self.codes.insert(value.to_string(), code);
        code
    }

    pub fn code_of(&self, value: &str) -> Option<usize> {
        self.codes.get(value).copied()
    }

    pub fn label(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Decodes a stored cell; NaN and non-integral values have no label.
    pub fn label_for_value(&self, value: f64) -> Option<&str> {
        if value.is_nan() || value < 0.0 || value.fract() != 0.0 {
            return None;
        }
        self.label(value as usize)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
