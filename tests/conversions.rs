use chrono::{NaiveDate, TimeDelta};

use column_inference::convert_one;
use column_inference::types::{Cell, Column, Complex128, DataType, Value};
use column_inference::{FailureReason, InferenceError};

fn column(cells: Vec<Cell>) -> Column {
    Column::new("c", cells)
}

#[test]
fn invalid_conversions_fail_without_force() {
    let cases: Vec<(&str, Vec<Cell>)> = vec![
        ("datetime64[ns]", vec!["2024-03-19T01:30:54Z".into(), "19/03/2024 12:30:45".into()]),
        ("datetime64[ns]", vec!["2024-03-19T01:30:54Z".into(), "Foo".into(), Cell::Integer(1)]),
        (
            "datetime64[ns]",
            vec!["2024-03-19T01:30:54Z".into(), "2022-12-19T12:12:45Z".into(), Cell::Integer(1)],
        ),
        ("datetime64[ns]", vec!["2024-03-19T01:30:54Z".into(), "2022-14-19T12:12:45Z".into()]),
        ("int16", vec!["32768".into(), "-32769".into()]),
        ("int32", vec!["2147483648".into(), "-2147483649".into()]),
        ("int64", vec!["9223372036854775808".into(), "-9223372036854775809".into()]),
        ("float32", vec!["1.5".into(), "text".into(), Cell::Absent]),
        ("float64", vec!["1.5".into(), "text".into(), Cell::Absent]),
        ("complex128", vec!["1.5+2j".into(), "text".into(), Cell::Absent]),
        ("timedelta64[ns]", vec!["1:00:00".into(), "text".into(), Cell::Absent]),
        ("datetime64[ns]", vec!["2024-03-19".into(), "text".into(), Cell::Absent]),
        ("category", vec!["a".into(), "b".into(), "c".into()]),
        (
            "bool",
            vec![
                "foo".into(),
                "false".into(),
                "True".into(),
                "False".into(),
                Cell::Integer(1),
                Cell::Integer(0),
            ],
        ),
        ("bool", vec!["Foo".into(), "Alice".into(), "Boo".into()]),
        ("bool", vec![Cell::Integer(10), Cell::Integer(100), Cell::Integer(1000)]),
        ("bool", vec![Cell::Integer(0), Cell::Integer(1), Cell::Integer(1000)]),
    ];

    for (type_name, cells) in cases {
        let err = convert_one(&column(cells.clone()), type_name, false).unwrap_err();
        assert!(
            matches!(err, InferenceError::ConversionFailure { .. }),
            "{type_name} {cells:?}: {err}"
        );
    }
}

#[test]
fn out_of_range_integers_fail_even_when_forced() {
    for (type_name, low, high) in [
        ("int8", "-129", "128"),
        ("int16", "-32769", "32768"),
        ("int32", "-2147483649", "2147483648"),
        ("int64", "-9223372036854775809", "9223372036854775808"),
    ] {
        let err = convert_one(&column(vec![high.into(), low.into()]), type_name, true).unwrap_err();
        assert!(
            matches!(err.reason(), Some(FailureReason::OutOfRange { row: 0, .. })),
            "{type_name}: {err}"
        );
    }
}

#[test]
fn mixed_boolean_encodings() {
    let cells = vec![
        "true".into(),
        "false".into(),
        "T".into(),
        "F".into(),
        Cell::Integer(0),
        Cell::Integer(1),
        Cell::Boolean(true),
        Cell::Boolean(false),
    ];
    let out = convert_one(&column(cells), "bool", false).unwrap();
    let expected: Vec<Value> = [true, false, true, false, false, true, true, false]
        .into_iter()
        .map(Value::Bool)
        .collect();
    assert_eq!(out.values, expected);
}

#[test]
fn missing_tokens_become_null_for_every_type() {
    for type_name in ["bool", "int32", "float64", "timedelta64[ns]", "object"] {
        let out = convert_one(&column(vec!["N/A".into(), "-999".into(), Cell::Absent]), type_name, false).unwrap();
        assert_eq!(out.null_count(), 3, "{type_name}");
    }
}

#[test]
fn float32_narrowing_needs_force() {
    let col = column(vec!["0.1".into(), "2.5".into()]);
    let err = convert_one(&col, "float32", false).unwrap_err();
    assert!(matches!(err.reason(), Some(FailureReason::NotValuePreserving { row: 0, .. })));

    let out = convert_one(&col, "float32", true).unwrap();
    assert_eq!(out.values, vec![Value::Float32(0.1), Value::Float32(2.5)]);
}

#[test]
fn fractional_floats_truncate_only_when_forced() {
    let col = column(vec![Cell::Float(1.9), Cell::Float(-1.9), Cell::Absent]);
    assert!(convert_one(&col, "int32", false).is_err());
    let out = convert_one(&col, "int32", true).unwrap();
    assert_eq!(out.values, vec![Value::Int32(1), Value::Int32(-1), Value::Null]);
}

#[test]
fn high_cardinality_category_needs_force() {
    let col = column(vec!["a".into(), "b".into(), "c".into()]);
    let err = convert_one(&col, "category", false).unwrap_err();
    assert!(matches!(err.reason(), Some(FailureReason::RatioExceeded { .. })));
    let out = convert_one(&col, "category", true).unwrap();
    assert_eq!(out.categories(), vec!["a", "b", "c"]);
}

#[test]
fn complex_values() {
    let col = column(vec!["1.5+2j".into(), "3.5-4j".into(), "5+6j".into()]);
    let out = convert_one(&col, "complex128", false).unwrap();
    assert_eq!(out.data_type, DataType::Complex128);
    assert_eq!(
        out.values,
        vec![
            Value::Complex(Complex128::new(1.5, 2.0)),
            Value::Complex(Complex128::new(3.5, -4.0)),
            Value::Complex(Complex128::new(5.0, 6.0)),
        ]
    );
}

#[test]
fn timedelta_values() {
    let col = column(vec!["1h30min".into(), "1D".into(), Cell::Absent, "3".into()]);
    let out = convert_one(&col, "timedelta64[ns]", false).unwrap();
    assert_eq!(
        out.values,
        vec![
            Value::Timedelta(TimeDelta::minutes(90)),
            Value::Timedelta(TimeDelta::days(1)),
            Value::Null,
            Value::Timedelta(TimeDelta::nanoseconds(3)),
        ]
    );
}

#[test]
fn datetime_values() {
    let col = column(vec!["2024-03-19".into(), "2024-03-20".into(), Cell::Absent]);
    let out = convert_one(&col, "datetime64[ns]", false).unwrap();
    let midnight = |d: u32| {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap()
    };
    assert_eq!(
        out.values,
        vec![Value::Datetime(midnight(19)), Value::Datetime(midnight(20)), Value::Null]
    );
}

#[test]
fn unknown_type_names() {
    let col = column(vec!["1".into()]);
    for name in ["foo", "", "INT8", "datetime", "str"] {
        assert!(matches!(
            convert_one(&col, name, true),
            Err(InferenceError::UnknownType { .. })
        ));
    }
}
