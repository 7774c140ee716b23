//! Categorical conversion, gated on the column's uniqueness ratio.

use std::collections::HashSet;

use crate::error::{ConversionResult, FailureReason, InferenceError};
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

use super::{convert_cells, ConvertOptions};

/// Hashable identity of a raw cell.
///
/// Numbers compare by value across kinds: `Integer(1)`, `Float(1.0)` and `Boolean(true)` are
/// one value, as are `0.0` and `-0.0` and every NaN. Text never equals a number, so `"1"` and
/// `1` stay distinct.
#[derive(PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Text(&'a str),
    Integer(i64),
    Float(u64),
    Absent,
}

impl<'a> From<&'a Cell> for CellKey<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Text(s) => CellKey::Text(s),
            Cell::Integer(i) => CellKey::Integer(*i),
            Cell::Boolean(b) => CellKey::Integer(i64::from(*b)),
            Cell::Float(f) => float_key(*f),
            Cell::Absent => CellKey::Absent,
        }
    }
}

fn float_key(f: f64) -> CellKey<'static> {
    if f.is_nan() {
        return CellKey::Float(f64::NAN.to_bits());
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return CellKey::Integer(f as i64);
    }
    CellKey::Float(f.to_bits())
}

/// Distinct raw values divided by row count, measured before normalization.
///
/// An empty column has ratio `0.0`.
pub fn uniqueness_ratio(cells: &[Cell]) -> f64 {
    if cells.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<CellKey<'_>> = cells.iter().map(CellKey::from).collect();
    distinct.len() as f64 / cells.len() as f64
}

/// Convert a column to [`DataType::Category`].
///
/// Non-force mode accepts the column only if its [`uniqueness_ratio`] is at most
/// `options.category_threshold`; force mode skips the check. Labels are the cells' canonical
/// text.
pub fn to_category(column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    if !options.force {
        let ratio = uniqueness_ratio(&column.cells);
        if ratio > options.category_threshold {
            return Err(InferenceError::conversion(
                &column.name,
                DataType::Category,
                FailureReason::RatioExceeded {
                    ratio,
                    threshold: options.category_threshold,
                },
            ));
        }
    }

    convert_cells(column, DataType::Category, |_, cell| {
        Ok(Value::Category(cell.to_text()))
    })
}
