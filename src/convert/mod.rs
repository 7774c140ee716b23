//! Per-type converters.
//!
//! Every converter has the [`ConvertFn`] signature: it reads a raw [`Column`], applies
//! [`crate::normalize::normalize`], and either produces a new [`TypedColumn`] or fails with
//! [`InferenceError::ConversionFailure`]. Converters never mutate their input.
//!
//! [`ConvertOptions::force`] relaxes value-preservation checks (lossy narrowing that a caller
//! explicitly asked for). It never relaxes hard validity rules such as integer bounds or
//! lexical tables.

pub mod boolean;
pub mod category;
pub mod complex;
pub mod datetime;
pub mod float;
pub mod integer;
pub mod object;
pub mod timedelta;

use crate::error::{ConversionResult, FailureReason, InferenceError};
use crate::normalize::normalize;
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

/// Uniqueness ratio at or below which a column is accepted as categorical.
pub const DEFAULT_CATEGORY_THRESHOLD: f64 = 0.5;

/// Signature shared by all converters.
pub type ConvertFn = fn(&Column, &ConvertOptions) -> ConversionResult<TypedColumn>;

/// Per-call conversion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Accept lossy coercions that automatic inference would reject.
    pub force: bool,
    /// Maximum distinct/rows ratio for [`DataType::Category`] (ignored when forcing).
    pub category_threshold: f64,
}

impl ConvertOptions {
    /// Value-preserving conversion, as used by automatic inference.
    pub fn strict() -> Self {
        Self {
            force: false,
            category_threshold: DEFAULT_CATEGORY_THRESHOLD,
        }
    }

    /// Forced conversion, as used for explicit caller-supplied types.
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::strict()
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// The converter implementing `data_type`.
pub fn converter_for(data_type: DataType) -> ConvertFn {
    match data_type {
        DataType::Bool => boolean::to_bool,
        DataType::Category => category::to_category,
        DataType::Int8 => integer::to_int8,
        DataType::Int16 => integer::to_int16,
        DataType::Int32 => integer::to_int32,
        DataType::Int64 => integer::to_int64,
        DataType::Float32 => float::to_float32,
        DataType::Float64 => float::to_float64,
        DataType::Complex128 => complex::to_complex128,
        DataType::Timedelta => timedelta::to_timedelta,
        DataType::Datetime => datetime::to_datetime,
        DataType::Object => object::to_object,
    }
}

/// Normalize `column`, map absent cells to [`Value::Null`] and every other cell through
/// `convert`. The first failing cell aborts the conversion.
pub(crate) fn convert_cells<F>(
    column: &Column,
    data_type: DataType,
    mut convert: F,
) -> ConversionResult<TypedColumn>
where
    F: FnMut(usize, &Cell) -> Result<Value, FailureReason>,
{
    let values = normalize(&column.cells)
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            Cell::Absent => Ok(Value::Null),
            other => convert(row, other),
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|reason| InferenceError::conversion(&column.name, data_type, reason))?;

    Ok(TypedColumn::new(column.name.clone(), data_type, values))
}

pub(crate) fn unparsable(row: usize, cell: &Cell, message: impl Into<String>) -> FailureReason {
    FailureReason::Unparsable {
        row,
        raw: cell.to_text(),
        message: message.into(),
    }
}

pub(crate) fn unsupported(row: usize, cell: &Cell) -> FailureReason {
    FailureReason::UnsupportedCell {
        row,
        kind: cell.kind(),
        raw: cell.to_text(),
    }
}
