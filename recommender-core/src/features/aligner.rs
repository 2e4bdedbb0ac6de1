//! Feature Aligner - Raw record → schema-ordered feature vector
//!
//! The aligner never fails. Policy for awkward input:
//! - categorical field absent or null → its `<field>_<missing marker>` column
//! - categorical value unknown to the schema → no column set (zero contribution)
//! - schema column not produced by the record → 0.0
//! - pass-through field absent → 0.0, non-numeric → NaN
//!
//! The plan classifying every schema position is built once per
//! (schema, categorical fields) pair; nothing is inferred per request.

use std::collections::HashMap;

use super::categorical::CategoricalFields;
use super::layout::TargetSchema;
use super::record::RawRecord;
use super::vector::FeatureVector;

// ============================================================================
// ALIGNMENT PLAN
// ============================================================================

/// What a single schema position is filled from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Copied from a numeric record field
    Numeric(String),
    /// One-hot indicator for `field == value`
    OneHot { field: String, value: String },
    /// Bare categorical field name; one-hot encoding consumes it, so it stays 0
    Consumed(String),
}

/// Counts describing how a schema maps onto the categorical field set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub numeric: usize,
    pub one_hot: usize,
    /// Categorical fields that own no schema column at all
    pub fields_without_columns: Vec<String>,
    /// Categorical fields whose missing indicator is not in the schema
    pub fields_without_missing_column: Vec<String>,
}

/// Aligns raw records against a fixed target schema
#[derive(Debug, Clone)]
pub struct FeatureAligner {
    schema: TargetSchema,
    categorical: CategoricalFields,
    slots: Vec<Slot>,
    /// field → value → schema position
    one_hot_index: HashMap<String, HashMap<String, usize>>,
}

impl FeatureAligner {
    pub fn new(schema: TargetSchema, categorical: CategoricalFields) -> Self {
        let mut one_hot_index: HashMap<String, HashMap<String, usize>> = categorical
            .fields()
            .iter()
            .map(|f| (f.clone(), HashMap::new()))
            .collect();

        let slots = schema
            .names()
            .iter()
            .enumerate()
            .map(|(position, name)| {
                if categorical.contains(name) {
                    return Slot::Consumed(name.clone());
                }
                match categorical.split_column(name) {
                    Some((field, value)) => {
                        if let Some(values) = one_hot_index.get_mut(field) {
                            values.insert(value.to_string(), position);
                        }
                        Slot::OneHot {
                            field: field.to_string(),
                            value: value.to_string(),
                        }
                    }
                    None => Slot::Numeric(name.clone()),
                }
            })
            .collect();

        Self {
            schema,
            categorical,
            slots,
            one_hot_index,
        }
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    pub fn categorical(&self) -> &CategoricalFields {
        &self.categorical
    }

    /// Per-position plan, in schema order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Names of pass-through numeric fields
    pub fn numeric_fields(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Numeric(field) => Some(field.as_str()),
            _ => None,
        })
    }

    pub fn summary(&self) -> PlanSummary {
        let numeric = self.numeric_fields().count();
        let one_hot = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::OneHot { .. }))
            .count();

        let mut fields_without_columns = Vec::new();
        let mut fields_without_missing_column = Vec::new();
        for field in self.categorical.fields() {
            let values = self.one_hot_index.get(field);
            if values.map_or(true, |v| v.is_empty()) {
                fields_without_columns.push(field.clone());
            } else if !values.is_some_and(|v| v.contains_key(self.categorical.missing_marker())) {
                fields_without_missing_column.push(field.clone());
            }
        }

        PlanSummary {
            numeric,
            one_hot,
            fields_without_columns,
            fields_without_missing_column,
        }
    }

    /// Category label the record carries for `field` (missing marker if absent)
    ///
    /// When the schema only knows an alias of the label (`2.0` for `2`),
    /// the alias is used.
    fn label_for(&self, record: &RawRecord, field: &str) -> String {
        let Some(value) = record.get(field) else {
            return self.categorical.missing_marker().to_string();
        };
        let Some(label) = value.category_label() else {
            return self.categorical.missing_marker().to_string();
        };

        let known = self.one_hot_index.get(field);
        if known.is_some_and(|values| values.contains_key(&label)) {
            return label;
        }
        value
            .label_aliases()
            .into_iter()
            .find(|alias| known.is_some_and(|values| values.contains_key(alias)))
            .unwrap_or(label)
    }

    /// Align a record: output length and order always match the schema
    pub fn align(&self, record: &RawRecord) -> FeatureVector {
        let mut vector = FeatureVector::zeroed(&self.schema);

        for (position, slot) in self.slots.iter().enumerate() {
            if let Slot::Numeric(field) = slot {
                let value = match record.get(field) {
                    Some(v) => v.as_number().map(|n| n as f32).unwrap_or(f32::NAN),
                    None => 0.0,
                };
                vector.set(position, value);
            }
        }

        for field in self.categorical.fields() {
            let label = self.label_for(record, field);
            if let Some(&position) = self.one_hot_index.get(field).and_then(|v| v.get(&label)) {
                vector.set(position, 1.0);
            }
        }

        vector
    }

    /// Categorical values in `record` that have no column in the schema
    ///
    /// They contribute nothing to the aligned vector; callers may log them.
    pub fn unseen_categories(&self, record: &RawRecord) -> Vec<(String, String)> {
        self.categorical
            .fields()
            .iter()
            .filter_map(|field| {
                let label = self.label_for(record, field);
                let known = self
                    .one_hot_index
                    .get(field)
                    .is_some_and(|values| values.contains_key(&label));
                (!known).then(|| (field.clone(), label))
            })
            .collect()
    }
}

/// Align `record` against `schema`, one-hot encoding `categorical` fields
///
/// Stateless convenience form; use [`FeatureAligner`] to reuse the plan.
pub fn align(
    record: &RawRecord,
    categorical: &CategoricalFields,
    schema: &TargetSchema,
) -> FeatureVector {
    FeatureAligner::new(schema.clone(), categorical.clone()).align(record)
}
