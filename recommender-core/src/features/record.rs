//! Raw Record - Incoming attribute map before alignment

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar attribute value as received from a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FeatureValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }

    /// Numeric coercion used for pass-through features
    ///
    /// Numbers pass as-is, numeric strings are parsed, booleans map to 1/0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Null => None,
            FeatureValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Category label used to name one-hot columns (`<field>_<label>`)
    ///
    /// `None` for null, which the aligner maps to the missing marker.
    pub fn category_label(&self) -> Option<String> {
        match self {
            FeatureValue::Null => None,
            FeatureValue::Bool(true) => Some("True".to_string()),
            FeatureValue::Bool(false) => Some("False".to_string()),
            FeatureValue::Number(n) => Some(format_number(*n)),
            FeatureValue::Text(s) => Some(s.clone()),
        }
    }

    /// Alternative spellings of the label a training export may have used
    ///
    /// Integral numbers match both `2` and `2.0` (pandas float columns).
    pub fn label_aliases(&self) -> Vec<String> {
        match self {
            FeatureValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                vec![format!("{:.1}", n)]
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Null => write!(f, "null"),
            other => write!(f, "{}", other.category_label().unwrap_or_default()),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

/// Integral values render without a fractional part (`3`, not `3.0`)
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ============================================================================
// RAW RECORD
// ============================================================================

/// Attribute name → value, supplied per request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FeatureValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FeatureValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Value for a field; null values count as absent
    pub fn get(&self, field: &str) -> Option<&FeatureValue> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<FeatureValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
