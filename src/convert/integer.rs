//! Fixed-width signed integer conversion with exact bounds.
//!
//! Every cell is first read as an `i128`, which is wide enough to hold any literal that fits a
//! 64-bit target and to detect overflow on it. The bounds check is then exact for each width.

use std::num::IntErrorKind;

use crate::error::{ConversionResult, FailureReason};
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

use super::{convert_cells, unparsable, ConvertOptions};

/// An integer target: its type, its inclusive bounds, and how to box an in-range value.
#[derive(Debug, Clone, Copy)]
pub struct IntTarget {
    pub data_type: DataType,
    pub min: i128,
    pub max: i128,
    wrap: fn(i128) -> Value,
}

// Callers of `wrap` have already checked `min..=max`.
fn wrap_i8(v: i128) -> Value {
    Value::Int8(v as i8)
}

fn wrap_i16(v: i128) -> Value {
    Value::Int16(v as i16)
}

fn wrap_i32(v: i128) -> Value {
    Value::Int32(v as i32)
}

fn wrap_i64(v: i128) -> Value {
    Value::Int64(v as i64)
}

pub const INT8: IntTarget = IntTarget {
    data_type: DataType::Int8,
    min: i8::MIN as i128,
    max: i8::MAX as i128,
    wrap: wrap_i8,
};

pub const INT16: IntTarget = IntTarget {
    data_type: DataType::Int16,
    min: i16::MIN as i128,
    max: i16::MAX as i128,
    wrap: wrap_i16,
};

pub const INT32: IntTarget = IntTarget {
    data_type: DataType::Int32,
    min: i32::MIN as i128,
    max: i32::MAX as i128,
    wrap: wrap_i32,
};

pub const INT64: IntTarget = IntTarget {
    data_type: DataType::Int64,
    min: i64::MIN as i128,
    max: i64::MAX as i128,
    wrap: wrap_i64,
};

pub fn to_int8(column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_integer(column, options, &INT8)
}

pub fn to_int16(column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_integer(column, options, &INT16)
}

pub fn to_int32(column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_integer(column, options, &INT32)
}

pub fn to_int64(column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_integer(column, options, &INT64)
}

/// Convert a column to the integer type described by `target`.
///
/// - Text must be an integer literal (surrounding whitespace allowed).
/// - Booleans are `0`/`1`.
/// - Floats must be finite. A fractional float fails unless `options.force` is set, in which
///   case it is truncated toward zero.
/// - Every value must lie in `target.min..=target.max`, forced or not.
pub fn convert_integer(
    column: &Column,
    options: &ConvertOptions,
    target: &IntTarget,
) -> ConversionResult<TypedColumn> {
    convert_cells(column, target.data_type, |row, cell| {
        let v = integer_value(row, cell, options.force, target)?;
        if v < target.min || v > target.max {
            return Err(out_of_range(row, cell, target));
        }
        Ok((target.wrap)(v))
    })
}

fn integer_value(
    row: usize,
    cell: &Cell,
    force: bool,
    target: &IntTarget,
) -> Result<i128, FailureReason> {
    match cell {
        Cell::Integer(i) => Ok(i128::from(*i)),
        Cell::Boolean(b) => Ok(i128::from(*b)),
        Cell::Float(f) => {
            if !f.is_finite() {
                return Err(unparsable(row, cell, "non-finite float has no integer value"));
            }
            let truncated = f.trunc();
            if truncated != *f && !force {
                return Err(FailureReason::NotValuePreserving {
                    row,
                    raw: cell.to_text(),
                });
            }
            // Saturating cast; anything saturated is far outside every target's range.
            Ok(truncated as i128)
        }
        Cell::Text(s) => s.trim().parse::<i128>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(row, cell, target),
            _ => unparsable(row, cell, e.to_string()),
        }),
        Cell::Absent => Err(unparsable(row, cell, "absent cell")),
    }
}

fn out_of_range(row: usize, cell: &Cell, target: &IntTarget) -> FailureReason {
    FailureReason::OutOfRange {
        row,
        raw: cell.to_text(),
        min: target.min,
        max: target.max,
    }
}
