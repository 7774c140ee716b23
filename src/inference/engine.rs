//! Inference entrypoints.
//!
//! - [`infer`] probes the registry in priority order and commits a column to the first type it
//!   converts to without loss. It never fails: the generic `object` type accepts anything.
//! - [`infer_table`] does the same for every column of a [`RawTable`], except for columns with a
//!   caller-supplied type, which are force-converted.
//! - [`convert_one`] converts a single column to a named type.
//!
//! If an [`InferenceObserver`] is configured, every committed column is reported with
//! `on_success` and every surfaced error with `on_failure` (plus `on_alert` at or above
//! [`InferenceOptions::alert_at_or_above`]). Rejected candidates during probing are not
//! failures; they are only visible as `tracing` debug events.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::convert::object::object_column;
use crate::convert::{ConvertOptions, DEFAULT_CATEGORY_THRESHOLD};
use crate::error::{InferenceError, InferenceResult};
use crate::registry::{registry, TypeDescriptor};
use crate::types::{Column, DataType, RawTable, TypedColumn, TypedTable};

use super::observability::{
    severity_for_error, InferenceContext, InferenceMode, InferenceObserver, InferenceSeverity, InferenceStats,
};

/// Options controlling inference and explicit conversion.
#[derive(Clone)]
pub struct InferenceOptions {
    /// Maximum distinct/rows ratio accepted for `category` during automatic inference.
    pub category_threshold: f64,
    /// Convert the columns of a table on the rayon global pool.
    pub parallel: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn InferenceObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: InferenceSeverity,
}

impl fmt::Debug for InferenceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceOptions")
            .field("category_threshold", &self.category_threshold)
            .field("parallel", &self.parallel)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            category_threshold: DEFAULT_CATEGORY_THRESHOLD,
            parallel: false,
            observer: None,
            alert_at_or_above: InferenceSeverity::Critical,
        }
    }
}

impl InferenceOptions {
    fn convert_options(&self, force: bool) -> ConvertOptions {
        ConvertOptions {
            force,
            category_threshold: self.category_threshold,
        }
    }

    fn report(&self, ctx: &InferenceContext, result: &InferenceResult<TypedColumn>, candidates_tried: usize) {
        match result {
            Ok(column) => self.report_success(ctx, column, candidates_tried),
            Err(e) => self.report_failure(ctx, e),
        }
    }

    fn report_success(&self, ctx: &InferenceContext, column: &TypedColumn, candidates_tried: usize) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_success(
                ctx,
                InferenceStats {
                    data_type: column.data_type,
                    rows: column.len(),
                    nulls: column.null_count(),
                    candidates_tried,
                },
            );
        }
    }

    fn report_failure(&self, ctx: &InferenceContext, error: &InferenceError) {
        if let Some(obs) = self.observer.as_ref() {
            let sev = severity_for_error(error);
            obs.on_failure(ctx, sev, error);
            if sev >= self.alert_at_or_above {
                obs.on_alert(ctx, sev, error);
            }
        }
    }
}

/// Ordered canonical names of every supported type.
pub fn supported_types() -> Vec<&'static str> {
    registry().supported_types()
}

/// Check a user-supplied type name against the catalog.
///
/// # Errors
///
/// Returns [`InferenceError::UnknownType`] if `type_name` is not a canonical name.
pub fn validate_type_name(type_name: &str) -> InferenceResult<DataType> {
    registry().lookup(type_name).map(|d| d.data_type)
}

/// Infer the type of a column with default options.
///
/// # Examples
///
/// ```rust
/// use column_inference::inference::infer;
/// use column_inference::types::{Column, DataType};
///
/// let col = Column::from_values("flag", ["T", "F", "T"]);
/// assert_eq!(infer(&col).data_type, DataType::Bool);
/// ```
pub fn infer(column: &Column) -> TypedColumn {
    infer_with_options(column, &InferenceOptions::default())
}

/// Infer the type of a column, honoring `options`.
pub fn infer_with_options(column: &Column, options: &InferenceOptions) -> TypedColumn {
    let (typed, tried) = probe(column, options);
    let ctx = InferenceContext {
        column: column.name.clone(),
        requested_type: None,
        mode: InferenceMode::Automatic,
    };
    options.report_success(&ctx, &typed, tried);
    typed
}

fn probe(column: &Column, options: &InferenceOptions) -> (TypedColumn, usize) {
    let convert_options = options.convert_options(false);
    let mut tried = 0;
    for descriptor in registry().iter() {
        tried += 1;
        match descriptor.convert(column, &convert_options) {
            Ok(typed) => {
                trace!(column = %column.name, data_type = %typed.data_type, tried, "committed type");
                return (typed, tried);
            }
            Err(err) => {
                debug!(column = %column.name, candidate = descriptor.name(), error = %err, "candidate rejected");
            }
        }
    }
    (object_column(column), tried)
}

/// Convert a column to the type named `type_name`, with default options.
///
/// With `force`, lossy narrowing (fractional floats to integers, doubles to `float32`,
/// high-cardinality `category`) is accepted; hard validity rules still apply.
///
/// # Errors
///
/// - [`InferenceError::UnknownType`] if `type_name` is not supported.
/// - [`InferenceError::ConversionFailure`] if the column cannot be converted.
pub fn convert_one(column: &Column, type_name: &str, force: bool) -> InferenceResult<TypedColumn> {
    convert_one_with_options(column, type_name, force, &InferenceOptions::default())
}

/// [`convert_one`], honoring `options`.
pub fn convert_one_with_options(
    column: &Column,
    type_name: &str,
    force: bool,
    options: &InferenceOptions,
) -> InferenceResult<TypedColumn> {
    let ctx = explicit_context(column, type_name, force);
    let result = registry()
        .lookup(type_name)
        .and_then(|d| d.convert(column, &options.convert_options(force)));
    options.report(&ctx, &result, 1);
    result
}

/// Infer or convert every column of `table`, with default options.
///
/// Columns named in `explicit_types` are force-converted to the given type; all others are
/// inferred. Entries naming columns not in the table are ignored once their type name has
/// been validated.
///
/// # Errors
///
/// - [`InferenceError::UnknownType`] if any explicit type name is not supported. No column
///   is converted in that case.
/// - [`InferenceError::ConversionFailure`] for the first column, in table order, whose forced
///   conversion fails.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
///
/// use column_inference::inference::infer_table;
/// use column_inference::types::{Column, DataType, RawTable};
///
/// # fn main() -> Result<(), column_inference::InferenceError> {
/// let table = RawTable::new(vec![
///     Column::from_values("id", [1i64, 2, 3, 4]),
///     Column::from_values("score", ["1.5", "2", "n/a", "4.25"]),
/// ])?;
/// let explicit = HashMap::from([("id".to_string(), "int64".to_string())]);
///
/// let typed = infer_table(&table, &explicit)?;
/// assert_eq!(typed.dtype("id"), Some(DataType::Int64));
/// assert_eq!(typed.dtype("score"), Some(DataType::Float32));
/// # Ok(())
/// # }
/// ```
pub fn infer_table(table: &RawTable, explicit_types: &HashMap<String, String>) -> InferenceResult<TypedTable> {
    infer_table_with_options(table, explicit_types, &InferenceOptions::default())
}

/// [`infer_table`], honoring `options`.
pub fn infer_table_with_options(
    table: &RawTable,
    explicit_types: &HashMap<String, String>,
    options: &InferenceOptions,
) -> InferenceResult<TypedTable> {
    let plan = plan_columns(table, explicit_types, options)?;

    let run = |(column, descriptor): &(&Column, Option<&TypeDescriptor>)| -> InferenceResult<TypedColumn> {
        match descriptor {
            Some(d) => {
                let ctx = explicit_context(column, d.name(), true);
                let result = d.convert(column, &options.convert_options(true));
                options.report(&ctx, &result, 1);
                result
            }
            None => Ok(infer_with_options(column, options)),
        }
    };

    let results: Vec<InferenceResult<TypedColumn>> = if options.parallel {
        plan.par_iter().map(run).collect()
    } else {
        plan.iter().map(run).collect()
    };

    // Sequential collect so the reported error is the first in table order.
    let columns = results.into_iter().collect::<InferenceResult<Vec<_>>>()?;
    Ok(TypedTable::new(columns))
}

/// Resolve every explicit type name before any conversion runs.
fn plan_columns<'t>(
    table: &'t RawTable,
    explicit_types: &HashMap<String, String>,
    options: &InferenceOptions,
) -> InferenceResult<Vec<(&'t Column, Option<&'static TypeDescriptor>)>> {
    let mut plan = Vec::with_capacity(table.columns().len());
    for column in table.columns() {
        let descriptor = match explicit_types.get(&column.name) {
            Some(type_name) => Some(lookup_reporting(&column.name, type_name, options)?),
            None => None,
        };
        plan.push((column, descriptor));
    }

    let mut extra: Vec<(&String, &String)> = explicit_types
        .iter()
        .filter(|(name, _)| table.column(name).is_none())
        .collect();
    extra.sort();
    for (name, type_name) in extra {
        lookup_reporting(name, type_name, options)?;
    }

    Ok(plan)
}

fn lookup_reporting(
    column: &str,
    type_name: &str,
    options: &InferenceOptions,
) -> InferenceResult<&'static TypeDescriptor> {
    registry().lookup(type_name).inspect_err(|e| {
        let ctx = InferenceContext {
            column: column.to_owned(),
            requested_type: Some(type_name.to_owned()),
            mode: InferenceMode::Forced,
        };
        options.report_failure(&ctx, e);
    })
}

fn explicit_context(column: &Column, type_name: &str, force: bool) -> InferenceContext {
    InferenceContext {
        column: column.name.clone(),
        requested_type: Some(type_name.to_owned()),
        mode: if force {
            InferenceMode::Forced
        } else {
            InferenceMode::Explicit
        },
    }
}

/// A self-contained inference request: table, caller-supplied types, and options.
#[derive(Clone, Default)]
pub struct InferenceRequest {
    pub table: RawTable,
    /// Column name to canonical type name.
    pub explicit_types: HashMap<String, String>,
    pub options: InferenceOptions,
}

impl fmt::Debug for InferenceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceRequest")
            .field("columns", &self.table.columns().len())
            .field("rows", &self.table.row_count())
            .field("explicit_types", &self.explicit_types)
            .field("options", &self.options)
            .finish()
    }
}

impl InferenceRequest {
    /// Execute the request by calling [`infer_table_with_options`].
    pub fn run(&self) -> InferenceResult<TypedTable> {
        infer_table_with_options(&self.table, &self.explicit_types, &self.options)
    }
}
