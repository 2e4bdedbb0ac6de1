//! Integration Tests for Feature Alignment
//!
//! Checks the aligner policies against a realistic training-time schema.

#[cfg(test)]
mod integration_tests {
    use crate::features::{
        align, CategoricalFields, FeatureAligner, FeatureValue, RawRecord, Slot, TargetSchema,
    };

    const HABITS: &[&str] = &["Inbox Zero", "Pray", "Be Grateful", "Cook Dinner"];

    /// Schema shaped like a one-hot encoded training frame
    fn training_schema() -> TargetSchema {
        let mut names = vec!["Age".to_string()];
        for gender in ["Female", "Male", "missing"] {
            names.push(format!("Gender_{}", gender));
        }
        for lifestyle in ["Student", "Worker", "missing"] {
            names.push(format!("Lifestyle_{}", lifestyle));
        }
        for slot in 1..=6 {
            for habit in HABITS.iter().copied().chain(["missing"]) {
                names.push(format!("Habit {:02}_{}", slot, habit));
            }
        }
        TargetSchema::new(names).unwrap()
    }

    fn full_record() -> RawRecord {
        RawRecord::new()
            .with("Age", 50i64)
            .with("Gender", "Female")
            .with("Lifestyle", "Worker")
            .with("Habit 01", "Inbox Zero")
            .with("Habit 02", "Pray")
            .with("Habit 03", "Be Grateful")
            .with("Habit 04", "Cook Dinner")
            .with("Habit 05", "Pray")
            .with("Habit 06", "Be Grateful")
    }

    fn value(schema: &TargetSchema, vector: &[f32], name: &str) -> f32 {
        vector[schema.index_of(name).unwrap()]
    }

    #[test]
    fn test_output_matches_schema_length() {
        let schema = training_schema();
        let categorical = CategoricalFields::default();

        for record in [full_record(), RawRecord::new(), RawRecord::new().with("Extra", 1i64)] {
            let vector = align(&record, &categorical, &schema);
            assert_eq!(vector.len(), schema.len());
            assert!(vector.validate(&schema).is_ok());
        }
    }

    #[test]
    fn test_full_record_encoding() {
        let schema = training_schema();
        let vector = align(&full_record(), &CategoricalFields::default(), &schema);
        let v = vector.as_slice();

        assert_eq!(value(&schema, v, "Age"), 50.0);
        assert_eq!(value(&schema, v, "Gender_Female"), 1.0);
        assert_eq!(value(&schema, v, "Gender_Male"), 0.0);
        assert_eq!(value(&schema, v, "Gender_missing"), 0.0);
        assert_eq!(value(&schema, v, "Lifestyle_Worker"), 1.0);
        assert_eq!(value(&schema, v, "Habit 01_Inbox Zero"), 1.0);
        assert_eq!(value(&schema, v, "Habit 01_Pray"), 0.0);
        assert_eq!(value(&schema, v, "Habit 05_Pray"), 1.0);

        // Exactly one indicator per categorical field
        let ones = v.iter().filter(|x| **x == 1.0).count();
        assert_eq!(ones, 8);
    }

    #[test]
    fn test_alignment_is_deterministic() {
        let schema = training_schema();
        let categorical = CategoricalFields::default();
        let record = full_record();

        let first = align(&record, &categorical, &schema);
        let second = align(&record, &categorical, &schema);
        assert_eq!(first, second);

        let aligner = FeatureAligner::new(schema, categorical);
        assert_eq!(aligner.align(&record), first);
    }

    #[test]
    fn test_absent_field_equals_missing_marker() {
        let schema = training_schema();
        let categorical = CategoricalFields::default();

        let base = RawRecord::new().with("Age", 30i64).with("Lifestyle", "Student");
        let explicit = base.clone().with("Gender", "missing");
        let null = base.clone().with("Gender", FeatureValue::Null);

        let absent_vec = align(&base, &categorical, &schema);
        assert_eq!(absent_vec, align(&explicit, &categorical, &schema));
        assert_eq!(absent_vec, align(&null, &categorical, &schema));
        assert_eq!(value(&schema, absent_vec.as_slice(), "Gender_missing"), 1.0);
    }

    #[test]
    fn test_unseen_category_zeroes_field_only() {
        let schema = training_schema();
        let categorical = CategoricalFields::default();

        let known = full_record();
        let unseen = full_record().with("Habit 03", "Learn Rust");
        let blank = full_record().with("Habit 03", FeatureValue::Null);

        let unseen_vec = align(&unseen, &categorical, &schema);
        let blank_vec = align(&blank, &categorical, &schema);
        let known_vec = align(&known, &categorical, &schema);

        for (i, name) in schema.names().iter().enumerate() {
            if name.starts_with("Habit 03_") {
                assert_eq!(unseen_vec.values[i], 0.0, "{} should be zero", name);
            } else {
                assert_eq!(unseen_vec.values[i], blank_vec.values[i], "{} differs", name);
                assert_eq!(unseen_vec.values[i], known_vec.values[i], "{} differs", name);
            }
        }
    }

    #[test]
    fn test_unseen_categories_reported() {
        let aligner = FeatureAligner::new(training_schema(), CategoricalFields::default());
        let record = full_record().with("Gender", "Other");
        assert_eq!(
            aligner.unseen_categories(&record),
            vec![("Gender".to_string(), "Other".to_string())]
        );
        assert!(aligner.unseen_categories(&full_record()).is_empty());
    }

    #[test]
    fn test_extra_fields_dropped() {
        let schema = training_schema();
        let categorical = CategoricalFields::default();
        let with_extra = full_record().with("Favourite colour", "Blue").with("Score", 9i64);

        assert_eq!(
            align(&with_extra, &categorical, &schema),
            align(&full_record(), &categorical, &schema)
        );
    }

    #[test]
    fn test_numeric_pass_through() {
        let schema = training_schema();
        let categorical = CategoricalFields::default();

        let absent = align(&RawRecord::new(), &categorical, &schema);
        assert_eq!(value(&schema, absent.as_slice(), "Age"), 0.0);

        let text = align(&RawRecord::new().with("Age", "41"), &categorical, &schema);
        assert_eq!(value(&schema, text.as_slice(), "Age"), 41.0);

        let garbage = align(&RawRecord::new().with("Age", "old"), &categorical, &schema);
        assert!(value(&schema, garbage.as_slice(), "Age").is_nan());
    }

    #[test]
    fn test_numeric_category_label() {
        let schema = TargetSchema::new(["Level_1", "Level_2", "Level_missing"]).unwrap();
        let categorical = CategoricalFields::new(["Level"]);
        let vector = align(&RawRecord::new().with("Level", 2i64), &categorical, &schema);
        assert_eq!(vector.values, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_float_category_label_matches_float_columns() {
        let schema = TargetSchema::new(["Level_2.0", "Level_3.0", "Level_nan"]).unwrap();
        let categorical = CategoricalFields::new(["Level"]).with_missing_marker("nan");

        let float = align(&RawRecord::new().with("Level", 2.0), &categorical, &schema);
        assert_eq!(float.values, vec![1.0, 0.0, 0.0]);

        let int = align(&RawRecord::new().with("Level", 3i64), &categorical, &schema);
        assert_eq!(int.values, vec![0.0, 1.0, 0.0]);

        let aligner = FeatureAligner::new(schema, categorical);
        assert!(aligner.unseen_categories(&RawRecord::new().with("Level", 2.0)).is_empty());
    }

    #[test]
    fn test_custom_missing_marker() {
        let schema = TargetSchema::new(["Age", "Gender_Female", "Gender_nan"]).unwrap();
        let categorical = CategoricalFields::new(["Gender"]).with_missing_marker("nan");
        let vector = align(&RawRecord::new(), &categorical, &schema);
        assert_eq!(vector.values, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bare_categorical_column_consumed() {
        let schema = TargetSchema::new(["Gender", "Gender_Female"]).unwrap();
        let aligner = FeatureAligner::new(schema, CategoricalFields::new(["Gender"]));
        assert_eq!(aligner.slots()[0], Slot::Consumed("Gender".to_string()));

        let vector = aligner.align(&RawRecord::new().with("Gender", "Female"));
        assert_eq!(vector.values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_plan_summary() {
        let aligner = FeatureAligner::new(training_schema(), CategoricalFields::default());
        let summary = aligner.summary();
        assert_eq!(summary.numeric, 1);
        assert_eq!(summary.one_hot, 6 + 6 * (HABITS.len() + 1));
        assert!(summary.fields_without_columns.is_empty());
        assert!(summary.fields_without_missing_column.is_empty());

        let sparse = FeatureAligner::new(
            TargetSchema::new(["Age", "Gender_Female"]).unwrap(),
            CategoricalFields::new(["Gender", "Lifestyle"]),
        );
        let summary = sparse.summary();
        assert_eq!(summary.fields_without_columns, vec!["Lifestyle".to_string()]);
        assert_eq!(summary.fields_without_missing_column, vec!["Gender".to_string()]);
    }
}
