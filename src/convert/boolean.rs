//! Boolean conversion via a fixed lexical table.

use crate::error::{ConversionResult, FailureReason};
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

use super::{convert_cells, ConvertOptions};

/// Parse a boolean token (case-insensitive).
///
/// Accepts `true/false`, `1/0`, `yes/no`, `t/f`, `on/off`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "t" | "on" => Some(true),
        "false" | "0" | "no" | "f" | "off" => Some(false),
        _ => None,
    }
}

/// Convert a column to [`DataType::Bool`].
///
/// Native booleans keep their value; every other cell is looked up by its canonical text, so
/// `Integer(1)` is `true` but `Integer(10)` and `Float(1.0)` fail. Force mode changes nothing.
pub fn to_bool(column: &Column, _options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_cells(column, DataType::Bool, |row, cell| match cell {
        Cell::Boolean(b) => Ok(Value::Bool(*b)),
        other => {
            let raw = other.to_text();
            parse_bool(&raw)
                .map(Value::Bool)
                .ok_or(FailureReason::NotInLexicon { row, raw })
        }
    })
}
