//! Complex-number conversion from `<real>[+-]<imag>j` text.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConversionResult;
use crate::types::{Column, Complex128, DataType, TypedColumn, Value};

use super::{convert_cells, unparsable, ConvertOptions};

// real part, sign, optional imaginary magnitude (empty means 1), mandatory j/J suffix
static COMPLEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+]?\d*\.?\d+)([-+])(\d*\.?\d*)[jJ]$").expect("complex pattern is valid")
});

/// Parse `1.5+2j`, `3.5-4j`, `5+j` and similar. Surrounding whitespace is ignored; whitespace
/// inside the number is not.
pub fn parse_complex(text: &str) -> Option<Complex128> {
    let caps = COMPLEX_PATTERN.captures(text.trim())?;
    let re: f64 = caps[1].parse().ok()?;
    let magnitude: f64 = match &caps[3] {
        "" => 1.0,
        digits => digits.parse().ok()?,
    };
    let im = if &caps[2] == "-" { -magnitude } else { magnitude };
    Some(Complex128::new(re, im))
}

/// Convert a column to [`DataType::Complex128`].
///
/// Every non-absent cell is matched on its canonical text, so plain numbers (`5`, `1.0`) and
/// booleans are rejected. Force mode changes nothing.
pub fn to_complex128(column: &Column, _options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_cells(column, DataType::Complex128, |row, cell| {
        parse_complex(&cell.to_text())
            .map(Value::Complex)
            .ok_or_else(|| unparsable(row, cell, "expected <real>[+-]<imag>j"))
    })
}
