//! 32/64-bit floating-point conversion.

use crate::error::{ConversionResult, FailureReason};
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

use super::{convert_cells, unparsable, ConvertOptions};

/// A cell read as `f64`, remembering the exact integer it came from (if any) so the
/// value-preservation check can compare against it instead of an already-rounded `f64`.
struct Parsed {
    value: f64,
    exact_int: Option<i64>,
}

fn float_value(row: usize, cell: &Cell) -> Result<Parsed, FailureReason> {
    match cell {
        Cell::Float(f) => Ok(Parsed {
            value: *f,
            exact_int: None,
        }),
        Cell::Integer(i) => Ok(Parsed {
            value: *i as f64,
            exact_int: Some(*i),
        }),
        Cell::Boolean(b) => Ok(Parsed {
            value: if *b { 1.0 } else { 0.0 },
            exact_int: None,
        }),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(|value| Parsed {
                value,
                exact_int: None,
            })
            .map_err(|e| unparsable(row, cell, e.to_string())),
        Cell::Absent => Err(unparsable(row, cell, "absent cell")),
    }
}

fn matches_integer(value: f64, exact: i64) -> bool {
    value.is_finite() && value as i128 == i128::from(exact)
}

/// Convert a column to [`DataType::Float32`].
///
/// Non-force mode requires the narrowed `f32` to widen back to exactly the parsed value, so
/// `0.1` is rejected (and inference moves on to `float64`) while `1.5` is accepted.
pub fn to_float32(column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_cells(column, DataType::Float32, |row, cell| {
        let parsed = float_value(row, cell)?;
        let narrowed = parsed.value as f32;
        if !options.force {
            let widened = f64::from(narrowed);
            let preserved = match parsed.exact_int {
                Some(i) => matches_integer(widened, i),
                None => widened == parsed.value || (widened.is_nan() && parsed.value.is_nan()),
            };
            if !preserved {
                return Err(FailureReason::NotValuePreserving {
                    row,
                    raw: cell.to_text(),
                });
            }
        }
        Ok(Value::Float32(narrowed))
    })
}

/// Convert a column to [`DataType::Float64`].
///
/// Parsed text is already the widest representation; only integer cells beyond 2^53 can lose
/// precision, and non-force mode rejects them.
pub fn to_float64(column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_cells(column, DataType::Float64, |row, cell| {
        let parsed = float_value(row, cell)?;
        if !options.force {
            if let Some(i) = parsed.exact_int {
                if !matches_integer(parsed.value, i) {
                    return Err(FailureReason::NotValuePreserving {
                        row,
                        raw: cell.to_text(),
                    });
                }
            }
        }
        Ok(Value::Float64(parsed.value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertFn;

    #[test]
    fn simple_decimals_fit_float32() {
        let col = Column::from_values("f", ["1.5", "2.5", "3.5"]);
        let out = to_float32(&col, &ConvertOptions::strict()).unwrap();
        assert_eq!(
            out.values,
            vec![Value::Float32(1.5), Value::Float32(2.5), Value::Float32(3.5)]
        );
    }

    #[test]
    fn inexact_decimals_need_float64_unless_forced() {
        let col = Column::from_values("f", ["0.1", "2.5"]);
        let err = to_float32(&col, &ConvertOptions::strict()).unwrap_err();
        assert!(matches!(err.reason(), Some(FailureReason::NotValuePreserving { row: 0, .. })));

        let out = to_float32(&col, &ConvertOptions::forced()).unwrap();
        assert_eq!(out.values[0], Value::Float32(0.1));

        let out = to_float64(&col, &ConvertOptions::strict()).unwrap();
        assert_eq!(out.values, vec![Value::Float64(0.1), Value::Float64(2.5)]);
    }

    #[test]
    fn float32_overflow_is_not_value_preserving() {
        let col = Column::from_values("f", ["1e300"]);
        assert!(to_float32(&col, &ConvertOptions::strict()).is_err());
        let out = to_float32(&col, &ConvertOptions::forced()).unwrap();
        assert_eq!(out.values, vec![Value::Float32(f32::INFINITY)]);
    }

    #[test]
    fn large_integers_lose_precision_in_float64() {
        let col = Column::new("f", vec![Cell::Integer(i64::MAX)]);
        assert!(to_float64(&col, &ConvertOptions::strict()).is_err());
        assert!(to_float64(&col, &ConvertOptions::forced()).is_ok());

        let col = Column::new("f", vec![Cell::Integer(1 << 53)]);
        assert!(to_float64(&col, &ConvertOptions::strict()).is_ok());
    }

    #[test]
    fn text_with_missing_values_fails_on_text() {
        for convert in [to_float32 as ConvertFn, to_float64] {
            let col = Column::new("f", vec!["1.5".into(), "text".into(), Cell::Absent]);
            let err = convert(&col, &ConvertOptions::forced()).unwrap_err();
            assert!(matches!(err.reason(), Some(FailureReason::Unparsable { row: 1, .. })));
        }
    }

    #[test]
    fn exponent_and_whitespace_parse() {
        let col = Column::from_values("f", [" 1e3 ", "-2.5E-1"]);
        let out = to_float64(&col, &ConvertOptions::strict()).unwrap();
        assert_eq!(out.values, vec![Value::Float64(1000.0), Value::Float64(-0.25)]);
    }
}
