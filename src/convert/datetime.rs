//! Timestamp conversion with per-column format inference.
//!
//! The first non-absent cell selects a [`DateFormat`] from [`CANDIDATE_FORMATS`] (first match
//! wins); every other cell must parse with that same format. A column that mixes formats, or
//! mixes text with numbers, therefore fails as a whole instead of being parsed cell by cell.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{ConversionResult, FailureReason};
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

use super::{convert_cells, unparsable, unsupported, ConvertOptions};

/// A timestamp layout a column can be parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// RFC 3339 / ISO 8601 with a `Z` or `±HH:MM` offset. Yields [`Value::DatetimeTz`].
    Rfc3339,
    /// A `strftime` layout with date and time. Yields [`Value::Datetime`].
    DateTime(&'static str),
    /// A `strftime` layout with a date only, at midnight. Yields [`Value::Datetime`].
    Date(&'static str),
    /// Integer nanoseconds since the Unix epoch (UTC). Yields [`Value::Datetime`].
    EpochNanos,
}

/// Text layouts tried, in order, against a column's first value.
///
/// Month-first slash dates precede day-first ones, so `03/04/2024` reads as March 4th while
/// `19/03/2024` can only be day-first.
pub const CANDIDATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc3339,
    DateFormat::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    DateFormat::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    DateFormat::DateTime("%Y-%m-%dT%H:%M"),
    DateFormat::DateTime("%Y-%m-%d %H:%M"),
    DateFormat::Date("%Y-%m-%d"),
    DateFormat::DateTime("%Y/%m/%d %H:%M:%S"),
    DateFormat::Date("%Y/%m/%d"),
    DateFormat::DateTime("%b %d %Y %H:%M:%S"),
    DateFormat::DateTime("%B %d %Y %H:%M:%S"),
    DateFormat::Date("%b %d %Y"),
    DateFormat::Date("%B %d %Y"),
    DateFormat::Date("%d %b %Y"),
    DateFormat::Date("%d %B %Y"),
    DateFormat::DateTime("%m/%d/%Y %H:%M:%S"),
    DateFormat::DateTime("%d/%m/%Y %H:%M:%S"),
    DateFormat::Date("%m/%d/%Y"),
    DateFormat::Date("%d/%m/%Y"),
];

impl DateFormat {
    /// Parse one cell with this format.
    pub fn parse(&self, cell: &Cell) -> Option<Value> {
        match (self, cell) {
            (DateFormat::EpochNanos, Cell::Integer(nanos)) => {
                Some(Value::Datetime(DateTime::from_timestamp_nanos(*nanos).naive_utc()))
            }
            (DateFormat::EpochNanos, _) => None,
            (text_format, Cell::Text(s)) => text_format.parse_text(s.trim()),
            _ => None,
        }
    }

    fn parse_text(&self, text: &str) -> Option<Value> {
        match self {
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(text).ok().map(Value::DatetimeTz),
            DateFormat::DateTime(layout) => NaiveDateTime::parse_from_str(text, layout)
                .ok()
                .map(Value::Datetime),
            DateFormat::Date(layout) => NaiveDate::parse_from_str(text, layout)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(Value::Datetime),
            DateFormat::EpochNanos => None,
        }
    }

    /// Pick the format for a column from its first non-absent cell.
    pub fn infer(cell: &Cell) -> Option<DateFormat> {
        match cell {
            Cell::Integer(_) => Some(DateFormat::EpochNanos),
            Cell::Text(s) => {
                let text = s.trim();
                CANDIDATE_FORMATS
                    .iter()
                    .copied()
                    .find(|f| f.parse_text(text).is_some())
            }
            _ => None,
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Rfc3339 => f.write_str("rfc3339"),
            DateFormat::DateTime(layout) | DateFormat::Date(layout) => f.write_str(layout),
            DateFormat::EpochNanos => f.write_str("epoch nanoseconds"),
        }
    }
}

/// Convert a column to [`DataType::Datetime`].
///
/// Offset-carrying values become [`Value::DatetimeTz`]; all others [`Value::Datetime`]. Force
/// mode changes nothing.
pub fn to_datetime(column: &Column, _options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    let mut format: Option<DateFormat> = None;

    convert_cells(column, DataType::Datetime, |row, cell| {
        let selected = match format {
            Some(selected) => selected,
            None => {
                let inferred = match cell {
                    Cell::Text(_) | Cell::Integer(_) => DateFormat::infer(cell)
                        .ok_or_else(|| unparsable(row, cell, "no known datetime format"))?,
                    other => return Err(unsupported(row, other)),
                };
                *format.insert(inferred)
            }
        };

        selected.parse(cell).ok_or_else(|| FailureReason::FormatMismatch {
            row,
            raw: cell.to_text(),
            format: selected.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveTime, TimeZone};

    use super::*;

    fn naive(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> Value {
        Value::Datetime(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(hh, mm, ss).unwrap()),
        )
    }

    fn convert(cells: Vec<Cell>) -> ConversionResult<TypedColumn> {
        to_datetime(&Column::new("t", cells), &ConvertOptions::strict())
    }

    #[test]
    fn iso_dates() {
        let out = convert(vec!["2024-03-19".into(), "2024-03-20".into(), "2024-03-21".into()]).unwrap();
        assert_eq!(out.data_type, DataType::Datetime);
        assert_eq!(
            out.values,
            vec![
                naive(2024, 3, 19, 0, 0, 0),
                naive(2024, 3, 20, 0, 0, 0),
                naive(2024, 3, 21, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn utc_timestamps_with_nulls() {
        let out = convert(vec![
            "2024-03-19T01:30:54Z".into(),
            "2022-12-19T12:12:45Z".into(),
            Cell::Absent,
        ])
        .unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            out.values[0],
            Value::DatetimeTz(utc.with_ymd_and_hms(2024, 3, 19, 1, 30, 54).unwrap())
        );
        assert_eq!(out.values[2], Value::Null);
    }

    #[test]
    fn offset_timestamps_keep_their_offset() {
        let out = convert(vec![
            "2024-03-19T12:30:45+03:00".into(),
            "2021-06-19T14:30:45+03:00".into(),
        ])
        .unwrap();
        let plus3 = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(
            out.values[1],
            Value::DatetimeTz(plus3.with_ymd_and_hms(2021, 6, 19, 14, 30, 45).unwrap())
        );
    }

    #[test]
    fn naive_iso_timestamps() {
        let out = convert(vec!["2024-03-19T12:30:45".into(), "2022-12-19T12:12:45".into()]).unwrap();
        assert_eq!(out.values[0], naive(2024, 3, 19, 12, 30, 45));
    }

    #[test]
    fn month_name_timestamps() {
        let out = convert(vec!["Mar 19 2024 12:30:45".into(), "Mar 19 2014 12:35:45".into()]).unwrap();
        assert_eq!(out.values[1], naive(2014, 3, 19, 12, 35, 45));
    }

    #[test]
    fn day_first_slash_timestamps() {
        let out = convert(vec!["19/03/2024 12:30:45".into(), "15/02/2021 11:32:15".into()]).unwrap();
        assert_eq!(
            out.values,
            vec![naive(2024, 3, 19, 12, 30, 45), naive(2021, 2, 15, 11, 32, 15)]
        );
    }

    #[test]
    fn ambiguous_slash_dates_are_month_first() {
        assert_eq!(
            DateFormat::infer(&"03/04/2024".into()),
            Some(DateFormat::Date("%m/%d/%Y"))
        );
    }

    #[test]
    fn mixed_formats_fail() {
        let err = convert(vec!["2024-03-19T01:30:54Z".into(), "19/03/2024 12:30:45".into()]).unwrap_err();
        assert!(matches!(err.reason(), Some(FailureReason::FormatMismatch { row: 1, .. })));
    }

    #[test]
    fn text_mixed_with_numbers_fails() {
        let err = convert(vec!["2024-03-19T01:30:54Z".into(), "Foo".into(), Cell::Integer(1)]).unwrap_err();
        assert!(matches!(err.reason(), Some(FailureReason::FormatMismatch { row: 1, .. })));

        let err = convert(vec![
            "2024-03-19T01:30:54Z".into(),
            "2022-12-19T12:12:45Z".into(),
            Cell::Integer(1),
        ])
        .unwrap_err();
        assert!(matches!(err.reason(), Some(FailureReason::FormatMismatch { row: 2, .. })));
    }

    #[test]
    fn invalid_calendar_values_fail() {
        let err = convert(vec!["2024-03-19T01:30:54Z".into(), "2022-14-19T12:12:45Z".into()]).unwrap_err();
        assert!(matches!(err.reason(), Some(FailureReason::FormatMismatch { row: 1, .. })));
    }

    #[test]
    fn unknown_first_value_fails() {
        let err = convert(vec!["text".into(), "2024-03-19".into()]).unwrap_err();
        assert!(matches!(err.reason(), Some(FailureReason::Unparsable { row: 0, .. })));

        let err = convert(vec!["2024-03-19".into(), "text".into(), Cell::Absent]).unwrap_err();
        assert!(matches!(err.reason(), Some(FailureReason::FormatMismatch { row: 1, .. })));
    }

    #[test]
    fn integer_columns_are_epoch_nanoseconds() {
        let out = convert(vec![Cell::Integer(0), Cell::Integer(86_400_000_000_000)]).unwrap();
        assert_eq!(
            out.values,
            vec![naive(1970, 1, 1, 0, 0, 0), naive(1970, 1, 2, 0, 0, 0)]
        );
    }

    #[test]
    fn leading_nulls_do_not_pick_the_format() {
        let out = convert(vec![Cell::Absent, "n/a".into(), "2024-03-19".into()]).unwrap();
        assert_eq!(out.values[2], naive(2024, 3, 19, 0, 0, 0));
    }
}
