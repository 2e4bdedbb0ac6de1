//! User Profile - API payload → raw record
//!
//! Clients send `{age, gender, lifestyle, habits: [...]}`; the model was
//! trained on `Age`, `Gender`, `Lifestyle` and six `Habit NN` slots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecommendError;
use crate::features::{FeatureValue, RawRecord};

/// Top-level keys every recommendation request must carry
pub const REQUIRED_FIELDS: &[&str] = &["age", "gender", "lifestyle", "habits"];

/// Record field names the profile maps onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFields {
    pub age: String,
    pub gender: String,
    pub lifestyle: String,
    /// One record field per habit slot, filled in order
    pub habit_slots: Vec<String>,
}

impl Default for ProfileFields {
    fn default() -> Self {
        Self {
            age: "Age".to_string(),
            gender: "Gender".to_string(),
            lifestyle: "Lifestyle".to_string(),
            habit_slots: (1..=6).map(|i| format!("Habit {:02}", i)).collect(),
        }
    }
}

/// Profile as submitted by a client
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub age: FeatureValue,
    pub gender: FeatureValue,
    pub lifestyle: FeatureValue,
    pub habits: Vec<String>,
}

/// Top-level required keys absent from `body`, in declaration order
///
/// Presence is what counts: a key holding `null` is not missing.
pub fn missing_required_fields(body: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| !body.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

impl UserProfile {
    /// Parse a request object; callers check required keys first
    pub fn from_json_object(body: &Map<String, Value>) -> Result<Self, RecommendError> {
        Ok(Self {
            age: scalar(body, "age")?,
            gender: scalar(body, "gender")?,
            lifestyle: scalar(body, "lifestyle")?,
            habits: habits(body.get("habits"))?,
        })
    }

    /// Trimmed, non-blank habits in submission order
    pub fn filled_habits(&self) -> Vec<&str> {
        self.habits
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect()
    }

    /// Non-blank habits that do not fit into the slots
    pub fn surplus_habits(&self, fields: &ProfileFields) -> usize {
        self.filled_habits()
            .len()
            .saturating_sub(fields.habit_slots.len())
    }

    /// Map onto record fields; surplus habits are dropped, empty slots stay absent
    pub fn to_record(&self, fields: &ProfileFields) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert(fields.age.clone(), self.age.clone());
        record.insert(fields.gender.clone(), self.gender.clone());
        record.insert(fields.lifestyle.clone(), self.lifestyle.clone());

        let habits = self.filled_habits();
        for (slot, habit) in fields.habit_slots.iter().zip(&habits) {
            record.insert(slot.clone(), *habit);
        }

        let surplus = self.surplus_habits(fields);
        if surplus > 0 {
            log::debug!(
                "Profile has {} habits, only {} slots used ({} dropped)",
                habits.len(),
                fields.habit_slots.len(),
                surplus
            );
        }

        record
    }
}

fn scalar(body: &Map<String, Value>, field: &str) -> Result<FeatureValue, RecommendError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(FeatureValue::Null),
        Some(Value::Bool(b)) => Ok(FeatureValue::Bool(*b)),
        Some(Value::Number(n)) => n.as_f64().map(FeatureValue::Number).ok_or_else(|| {
            RecommendError::InvalidField {
                field: field.to_string(),
                reason: format!("number {} out of range", n),
            }
        }),
        Some(Value::String(s)) => Ok(FeatureValue::Text(s.clone())),
        Some(other) => Err(RecommendError::InvalidField {
            field: field.to_string(),
            reason: format!("expected a scalar, got {}", type_name(other)),
        }),
    }
}

fn habits(value: Option<&Value>) -> Result<Vec<String>, RecommendError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(RecommendError::InvalidField {
                    field: "habits".to_string(),
                    reason: format!("expected strings, got {}", type_name(other)),
                }),
            })
            .collect(),
        Some(other) => Err(RecommendError::InvalidField {
            field: "habits".to_string(),
            reason: format!("expected a list of strings, got {}", type_name(other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_required_fields() {
        let body = object(json!({"age": 50, "lifestyle": "Worker", "habits": []}));
        assert_eq!(missing_required_fields(&body), vec!["gender".to_string()]);

        let empty = object(json!({}));
        assert_eq!(missing_required_fields(&empty), REQUIRED_FIELDS.to_vec());

        let null_gender = object(json!({"age": 1, "gender": null, "lifestyle": "x", "habits": []}));
        assert!(missing_required_fields(&null_gender).is_empty());
    }

    #[test]
    fn test_profile_to_record() {
        let body = object(json!({
            "age": 50,
            "gender": "Female",
            "lifestyle": "Worker",
            "habits": [" Inbox Zero ", "Pray"]
        }));
        let profile = UserProfile::from_json_object(&body).unwrap();
        let record = profile.to_record(&ProfileFields::default());

        assert_eq!(record.get("Age"), Some(&FeatureValue::Number(50.0)));
        assert_eq!(record.get("Gender"), Some(&FeatureValue::from("Female")));
        assert_eq!(record.get("Habit 01"), Some(&FeatureValue::from("Inbox Zero")));
        assert_eq!(record.get("Habit 02"), Some(&FeatureValue::from("Pray")));
        assert_eq!(record.get("Habit 03"), None);
    }

    #[test]
    fn test_surplus_habits_dropped() {
        let profile = UserProfile {
            habits: (0..9).map(|i| format!("h{}", i)).collect(),
            ..Default::default()
        };
        let record = profile.to_record(&ProfileFields::default());
        assert_eq!(record.get("Habit 06"), Some(&FeatureValue::from("h5")));
        assert!(record.iter().all(|(k, _)| !k.contains("07")));
    }

    #[test]
    fn test_blank_habits_not_counted_as_surplus() {
        let mut habits: Vec<String> = (0..6).map(|i| format!("h{}", i)).collect();
        habits.extend(["", "  ", "\t"].map(String::from));
        let profile = UserProfile {
            habits,
            ..Default::default()
        };
        let fields = ProfileFields::default();

        assert_eq!(profile.filled_habits().len(), 6);
        assert_eq!(profile.surplus_habits(&fields), 0);

        let record = profile.to_record(&fields);
        assert_eq!(record.get("Habit 06"), Some(&FeatureValue::from("h5")));

        let crowded = UserProfile {
            habits: (0..8).map(|i| format!("h{}", i)).chain([String::new()]).collect(),
            ..Default::default()
        };
        assert_eq!(crowded.surplus_habits(&fields), 2);
    }

    #[test]
    fn test_single_string_habit() {
        let body = object(json!({"habits": "Pray"}));
        let profile = UserProfile::from_json_object(&body).unwrap();
        assert_eq!(profile.habits, vec!["Pray".to_string()]);
    }

    #[test]
    fn test_invalid_types_rejected() {
        let bad_habits = object(json!({"habits": {"a": 1}}));
        assert!(matches!(
            UserProfile::from_json_object(&bad_habits),
            Err(RecommendError::InvalidField { field, .. }) if field == "habits"
        ));

        let bad_item = object(json!({"habits": ["Pray", 3]}));
        assert!(UserProfile::from_json_object(&bad_item).is_err());

        let bad_age = object(json!({"age": [50]}));
        assert!(matches!(
            UserProfile::from_json_object(&bad_age),
            Err(RecommendError::InvalidField { field, .. }) if field == "age"
        ));
    }
}
