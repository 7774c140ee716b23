//! Generic/untyped conversion. The universal fallback: it cannot fail.

use crate::error::ConversionResult;
use crate::normalize::normalize;
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

use super::ConvertOptions;

/// Convert a column to [`DataType::Object`].
///
/// Only missing-value normalization is applied; each cell keeps its natural value.
pub fn object_column(column: &Column) -> TypedColumn {
    let values = normalize(&column.cells)
        .into_iter()
        .map(|cell| match cell {
            Cell::Text(s) => Value::Text(s),
            Cell::Integer(i) => Value::Int64(i),
            Cell::Float(f) => Value::Float64(f),
            Cell::Boolean(b) => Value::Bool(b),
            Cell::Absent => Value::Null,
        })
        .collect();
    TypedColumn::new(column.name.clone(), DataType::Object, values)
}

/// [`object_column`] with the common converter signature.
pub fn to_object(column: &Column, _options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    Ok(object_column(column))
}
