//! Core data model types for inference.
//!
//! Raw input arrives as [`Cell`]s grouped into named [`Column`]s (optionally bundled in a
//! [`RawTable`]). Conversion produces a [`TypedColumn`] of [`Value`]s tagged with the committed
//! [`DataType`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, InferenceResult};

/// A single untyped input cell, as categorized by the tabular reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Native boolean.
    Boolean(bool),
    /// Integral number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Any text, including numeric-looking text.
    Text(String),
    /// No value.
    Absent,
}

impl Cell {
    /// Canonical text rendering used for token matching and lexical tables.
    ///
    /// Floats always carry a fractional part (`1.0`) and non-finite floats render as
    /// `nan`/`inf`/`-inf`; booleans render as `True`/`False`; absent renders as `None`.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(i) => i.to_string(),
            Cell::Float(f) => float_text(*f),
            Cell::Boolean(true) => "True".to_string(),
            Cell::Boolean(false) => "False".to_string(),
            Cell::Absent => "None".to_string(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// Short name of the cell kind, used in failure messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Text(_) => "text",
            Cell::Integer(_) => "integer",
            Cell::Float(_) => "float",
            Cell::Boolean(_) => "boolean",
            Cell::Absent => "absent",
        }
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        // Debug keeps a trailing `.0` on integral floats.
        format!("{f:?}")
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Integer(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Boolean(b)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Absent, Into::into)
    }
}

/// Bridge for collaborators that already hold JSON cells.
///
/// Arrays and objects have no scalar meaning and are kept as their JSON text.
impl From<&serde_json::Value> for Cell {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Cell::Absent,
            serde_json::Value::Bool(b) => Cell::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Integer(i),
                None => n.as_f64().map_or_else(|| Cell::Text(n.to_string()), Cell::Float),
            },
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// A named, ordered sequence of raw cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Raw cells in row order.
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Build a column from homogeneous values convertible into [`Cell`].
    pub fn from_values<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cell>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A table of raw columns with unique names and equal lengths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    columns: Vec<Column>,
}

impl RawTable {
    /// Create a table from columns.
    ///
    /// Fails on duplicate column names or columns of differing length.
    pub fn new(columns: Vec<Column>) -> InferenceResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(InferenceError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(InferenceError::ColumnLength {
                    name: bad.name.clone(),
                    expected: first.len(),
                    found: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Create a table from row-major cells, in the same order as `headers`.
    pub fn from_rows<S: Into<String>>(headers: Vec<S>, rows: Vec<Vec<Cell>>) -> InferenceResult<Self> {
        let names: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut columns: Vec<Vec<Cell>> = names.iter().map(|_| Vec::with_capacity(rows.len())).collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(InferenceError::RowLength {
                    row: row_idx,
                    expected: names.len(),
                    found: row.len(),
                });
            }
            for (cells, cell) in columns.iter_mut().zip(row) {
                cells.push(cell);
            }
        }

        Self::new(names.into_iter().zip(columns).map(|(n, c)| Column::new(n, c)).collect())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }
}

/// Canonical semantic types known to the engine.
///
/// `Display`/`FromStr` and serde all use the canonical names (`bool`, `int8`,
/// `datetime64[ns]`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "int8")]
    Int8,
    #[serde(rename = "int16")]
    Int16,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float32")]
    Float32,
    #[serde(rename = "float64")]
    Float64,
    #[serde(rename = "complex128")]
    Complex128,
    #[serde(rename = "timedelta64[ns]")]
    Timedelta,
    #[serde(rename = "datetime64[ns]")]
    Datetime,
    /// Generic/untyped values.
    #[serde(rename = "object")]
    Object,
}

impl DataType {
    /// Every type, in declaration order.
    pub const ALL: [DataType; 12] = [
        DataType::Bool,
        DataType::Category,
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Float32,
        DataType::Float64,
        DataType::Complex128,
        DataType::Timedelta,
        DataType::Datetime,
        DataType::Object,
    ];

    /// Canonical type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Category => "category",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Complex128 => "complex128",
            DataType::Timedelta => "timedelta64[ns]",
            DataType::Datetime => "datetime64[ns]",
            DataType::Object => "object",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = InferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InferenceError::UnknownType {
                type_name: s.to_owned(),
            })
    }
}

/// A complex number with 64-bit real and imaginary parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex128 {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "({}{}{}j)", self.re, sign, self.im.abs())
    }
}

/// A single typed value in a [`TypedColumn`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    Bool(bool),
    /// Categorical label.
    Category(String),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Complex(Complex128),
    /// Nanosecond-precision duration.
    Timedelta(TimeDelta),
    /// Timestamp without offset.
    Datetime(NaiveDateTime),
    /// Timestamp with a fixed UTC offset.
    DatetimeTz(DateTime<FixedOffset>),
    /// Generic text.
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer payload of any integer variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(v) => Some(i64::from(*v)),
            Value::Int16(v) => Some(i64::from(*v)),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric payload of any integer or float variant, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Float64(v) => Some(*v),
            other => other.as_i64().map(|i| i as f64),
        }
    }
}

/// A converted column: the input's name, its committed type, and one value per input cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedColumn {
    pub name: String,
    pub data_type: DataType,
    pub values: Vec<Value>,
}

impl TypedColumn {
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Distinct category labels in first-seen order (empty for non-categorical columns).
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .filter_map(|v| match v {
                Value::Category(label) => Some(label.as_str()),
                _ => None,
            })
            .filter(|label| seen.insert(*label))
            .collect()
    }
}

/// A table of converted columns, in the same order as the input table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedTable {
    pub columns: Vec<TypedColumn>,
}

impl TypedTable {
    pub fn new(columns: Vec<TypedColumn>) -> Self {
        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, TypedColumn::len)
    }

    pub fn column(&self, name: &str) -> Option<&TypedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Committed type per column, in column order.
    pub fn dtypes(&self) -> Vec<(&str, DataType)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type))
            .collect()
    }

    /// Committed type of a single column.
    pub fn dtype(&self, name: &str) -> Option<DataType> {
        self.column(name).map(|c| c.data_type)
    }
}
