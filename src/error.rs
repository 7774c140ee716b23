use thiserror::Error;

use crate::types::DataType;

/// Convenience result type for inference and forced-conversion entrypoints.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Result type returned by individual converters.
///
/// Same error type as [`InferenceResult`]; the alias only documents intent at converter seams.
pub type ConversionResult<T> = Result<T, InferenceError>;

/// Error type returned by the inference engine.
///
/// During automatic inference, [`InferenceError::ConversionFailure`] is consumed internally and
/// only moves the engine on to the next candidate type. Forced conversions and type lookups
/// surface every variant to the caller.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The supplied type name is not in the supported catalog.
    #[error("unknown type '{type_name}'")]
    UnknownType { type_name: String },

    /// A column could not be coerced to the requested type.
    #[error("failed to convert column '{column}' to {data_type}: {reason}")]
    ConversionFailure {
        column: String,
        data_type: DataType,
        reason: FailureReason,
    },

    /// Two columns in one table share a name.
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },

    /// A column's length differs from the first column of its table.
    #[error("column '{name}' has {found} rows, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A row handed to [`crate::types::RawTable::from_rows`] has the wrong number of cells.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl InferenceError {
    pub(crate) fn conversion(column: &str, data_type: DataType, reason: FailureReason) -> Self {
        Self::ConversionFailure {
            column: column.to_owned(),
            data_type,
            reason,
        }
    }

    /// The [`FailureReason`] of a conversion failure, if this is one.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::ConversionFailure { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Why a column failed to convert.
///
/// Row indexes are 0-based positions within the column.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FailureReason {
    /// A cell is not in the boolean lexical table.
    #[error("row {row}: '{raw}' is not a recognized boolean")]
    NotInLexicon { row: usize, raw: String },

    /// An integer lies outside the target type's bounds.
    #[error("row {row}: '{raw}' is out of range [{min}, {max}]")]
    OutOfRange {
        row: usize,
        raw: String,
        min: i128,
        max: i128,
    },

    /// The coerced value differs from the input value.
    #[error("row {row}: '{raw}' cannot be represented without loss")]
    NotValuePreserving { row: usize, raw: String },

    /// A cell could not be parsed as the target type at all.
    #[error("row {row}: cannot parse '{raw}': {message}")]
    Unparsable {
        row: usize,
        raw: String,
        message: String,
    },

    /// Too many distinct values for a categorical column.
    #[error("uniqueness ratio {ratio:.3} exceeds threshold {threshold}")]
    RatioExceeded { ratio: f64, threshold: f64 },

    /// A datetime cell does not follow the format selected from the column's first value.
    #[error("row {row}: '{raw}' does not match inferred format '{format}'")]
    FormatMismatch {
        row: usize,
        raw: String,
        format: String,
    },

    /// The cell kind can never be coerced to the target type.
    #[error("row {row}: {kind} cell '{raw}' is not supported")]
    UnsupportedCell {
        row: usize,
        kind: &'static str,
        raw: String,
    },
}
