//! Inference entrypoints and observability.
//!
//! Most callers should use [`infer_table`] (from [`engine`]) which:
//!
//! - infers a type for every column without a caller-supplied type
//! - force-converts the columns that have one
//! - optionally reports successes/failures/alerts to an [`InferenceObserver`]

pub mod engine;
pub mod observability;

pub use engine::{
    convert_one, convert_one_with_options, infer, infer_table, infer_table_with_options, infer_with_options,
    supported_types, validate_type_name, InferenceOptions, InferenceRequest,
};
pub use observability::{
    severity_for_error, CompositeObserver, FileObserver, InferenceContext, InferenceMode, InferenceObserver,
    InferenceSeverity, InferenceStats, StdErrObserver,
};
