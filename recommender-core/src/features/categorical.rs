//! Categorical Field Set - Attributes that are one-hot encoded

use serde::{Deserialize, Serialize};

/// Missing marker used when a categorical field is absent
pub const DEFAULT_MISSING_MARKER: &str = "missing";

/// Default categorical attributes of a user profile
pub const DEFAULT_CATEGORICAL_FIELDS: &[&str] = &[
    "Gender",
    "Lifestyle",
    "Habit 01",
    "Habit 02",
    "Habit 03",
    "Habit 04",
    "Habit 05",
    "Habit 06",
];

/// Fixed set of attribute names to one-hot encode, plus the marker value
/// that stands in for an absent field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalFields {
    fields: Vec<String>,
    missing_marker: String,
}

impl CategoricalFields {
    /// Duplicates are dropped, first occurrence wins
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields.into_iter().map(Into::into) {
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Self {
            fields: unique,
            missing_marker: DEFAULT_MISSING_MARKER.to_string(),
        }
    }

    pub fn with_missing_marker(mut self, marker: impl Into<String>) -> Self {
        self.missing_marker = marker.into();
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn missing_marker(&self) -> &str {
        &self.missing_marker
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Column name for a field/value pair
    pub fn column_name(&self, field: &str, value: &str) -> String {
        format!("{}_{}", field, value)
    }

    /// Column name of the "is missing" indicator for a field
    pub fn missing_column(&self, field: &str) -> String {
        self.column_name(field, &self.missing_marker)
    }

    /// Split a one-hot column name into `(field, value)`
    ///
    /// Picks the longest categorical field that prefixes the name, so
    /// `Habit 01_Pray` resolves to `Habit 01` even if `Habit 0` is also
    /// categorical. Returns `None` for pass-through columns.
    pub fn split_column<'a>(&self, column: &'a str) -> Option<(&str, &'a str)> {
        self.fields
            .iter()
            .filter_map(|field| {
                column
                    .strip_prefix(field.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|value| (field.as_str(), value))
            })
            .max_by_key(|(field, _)| field.len())
    }
}

impl Default for CategoricalFields {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORICAL_FIELDS.iter().copied())
    }
}
