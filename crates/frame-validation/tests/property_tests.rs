//! Property tests for the detection rules

use frame_validation::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::Int),
        (-1000.0f64..1000.0).prop_map(Value::Float),
        "[a-z0-9-]{0,8}".prop_map(Value::String),
    ]
}

fn column() -> impl Strategy<Value = Column> {
    prop::collection::vec(cell(), 0..40).prop_map(|cells| Column::new(cells))
}

fn indexes(error: &FieldError, column: &Column) -> Vec<RowIndex> {
    error
        .to_report(Some(FrameData::from(column)))
        .unwrap()
        .indexes
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) if !f.is_nan() => Some(*f),
        _ => None,
    }
}

proptest! {
    #[test]
    fn min_value_selects_rows_below_limit(column in column(), limit in -1000i64..1000) {
        let expected: Vec<RowIndex> = column
            .iter()
            .filter(|(_, v)| numeric(v).map_or(false, |n| n < limit as f64))
            .map(|(idx, _)| idx.clone())
            .collect();
        prop_assert_eq!(indexes(&FieldError::min_value(limit), &column), expected);
    }

    #[test]
    fn max_value_selects_rows_above_limit(column in column(), limit in -1000i64..1000) {
        let expected: Vec<RowIndex> = column
            .iter()
            .filter(|(_, v)| numeric(v).map_or(false, |n| n > limit as f64))
            .map(|(idx, _)| idx.clone())
            .collect();
        prop_assert_eq!(indexes(&FieldError::max_value(limit), &column), expected);
    }

    #[test]
    fn length_checks_compare_char_counts(column in column(), limit in 0usize..10) {
        let shorter: Vec<RowIndex> = column
            .iter()
            .filter(|(_, v)| v.as_str().map_or(false, |s| s.chars().count() < limit))
            .map(|(idx, _)| idx.clone())
            .collect();
        let longer: Vec<RowIndex> = column
            .iter()
            .filter(|(_, v)| v.as_str().map_or(false, |s| s.chars().count() > limit))
            .map(|(idx, _)| idx.clone())
            .collect();
        prop_assert_eq!(indexes(&FieldError::min_length(limit), &column), shorter);
        prop_assert_eq!(indexes(&FieldError::max_length(limit), &column), longer);
    }

    #[test]
    fn null_not_allowed_selects_exactly_nulls(column in column()) {
        let expected: Vec<RowIndex> = column
            .iter()
            .filter(|(_, v)| v.is_null())
            .map(|(idx, _)| idx.clone())
            .collect();
        prop_assert_eq!(indexes(&FieldError::NullNotAllowed, &column), expected);
        prop_assert!(indexes(&FieldError::NullNotAllowed, &column.without_nulls()).is_empty());
    }

    #[test]
    fn field_required_never_has_indexes(column in column()) {
        prop_assert!(FieldError::FieldRequired.to_report(None).unwrap().indexes.is_empty());
        prop_assert!(indexes(&FieldError::FieldRequired, &column).is_empty());
    }

    #[test]
    fn reports_are_idempotent(column in column()) {
        let error = FieldError::NonNumericValue;
        let first = error.to_report(Some(FrameData::from(&column))).unwrap();
        let second = error.to_report(Some(FrameData::from(&column))).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn duplicates_exclude_first_occurrence(
        rows in prop::collection::vec((0i64..3, 0i64..3, 0i64..3), 0..30)
    ) {
        let records: Vec<Vec<i64>> = rows.iter().map(|(a, b, c)| vec![*a, *b, *c]).collect();
        let table = Table::from_records(["a", "b", "c"], records).unwrap();

        let mut seen = HashSet::new();
        let expected: Vec<RowIndex> = rows
            .iter()
            .enumerate()
            .filter(|(_, (a, b, _))| !seen.insert((*a, *b)))
            .map(|(i, _)| RowIndex::from(i))
            .collect();

        let report = FieldError::non_unique_together(["a", "b"])
            .to_report(Some(FrameData::from(&table)))
            .unwrap();
        prop_assert_eq!(report.indexes, expected);
    }

    #[test]
    fn accumulator_preserves_call_order(picks in prop::collection::vec(0usize..4, 0..20)) {
        let column = Column::new(vec![Value::Null, Value::from(""), Value::Int(-1)]);
        let variants = [
            FieldError::NullNotAllowed,
            FieldError::BlankNotAllowed,
            FieldError::min_value(0),
            FieldError::FieldRequired,
        ];

        let mut errors = FieldErrors::new();
        for pick in &picks {
            errors.record(&variants[*pick], Some(FrameData::from(&column))).unwrap();
        }

        let expected: Vec<ErrorCode> = picks.iter().map(|pick| variants[*pick].code()).collect();
        prop_assert_eq!(errors.len(), picks.len());
        prop_assert_eq!(errors.codes(), expected);
    }
}
