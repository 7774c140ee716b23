//! `column-inference` decides a semantic type for each column of an untyped table and converts
//! the column's cells to it.
//!
//! The primary entrypoint is [`inference::infer_table`]. Each column is either inferred (the
//! registry's types are probed in priority order and the first value-preserving conversion
//! wins) or, when the caller supplies a type name, force-converted to that type.
//!
//! ## Supported types
//!
//! In inference priority order: `bool`, `category`, `int8`, `int16`, `int32`, `int64`,
//! `float32`, `float64`, `complex128`, `timedelta64[ns]`, `datetime64[ns]`, `object`.
//!
//! Before any conversion, cells matching a missing-value token (`nan`, `n/a`, `null`, `-999`,
//! ... see [`normalize::MISSING_VALUE_TOKENS`]) become [`types::Value::Null`].
//!
//! ## Quick example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use column_inference::inference::infer_table;
//! use column_inference::types::{Cell, Column, DataType, RawTable};
//!
//! # fn main() -> Result<(), column_inference::InferenceError> {
//! let table = RawTable::from_rows(
//!     vec!["active", "age", "joined"],
//!     vec![
//!         vec!["yes".into(), Cell::Integer(31), "2021-03-04".into()],
//!         vec!["no".into(), Cell::Integer(58), "2019-11-20".into()],
//!         vec!["N/A".into(), Cell::Integer(23), "2020-01-01".into()],
//!     ],
//! )?;
//!
//! let typed = infer_table(&table, &HashMap::new())?;
//! assert_eq!(typed.dtype("active"), Some(DataType::Bool));
//! assert_eq!(typed.dtype("age"), Some(DataType::Int8));
//! assert_eq!(typed.dtype("joined"), Some(DataType::Datetime));
//! # Ok(())
//! # }
//! ```
//!
//! ## Changing a committed type
//!
//! ```rust
//! use column_inference::inference::convert_one;
//! use column_inference::types::{Column, Value};
//!
//! let col = Column::from_values("price", [1.75, 2.0, 3.5]);
//! let forced = convert_one(&col, "int16", true).unwrap();
//! assert_eq!(forced.values, vec![Value::Int16(1), Value::Int16(2), Value::Int16(3)]);
//!
//! assert!(convert_one(&col, "int16", false).is_err());
//! assert!(convert_one(&col, "decimal", true).is_err());
//! ```
//!
//! ## Modules
//!
//! - [`inference`]: entrypoints, options, and observers
//! - [`registry`]: the ordered type catalog
//! - [`convert`]: one converter per type
//! - [`normalize`]: missing-value normalization
//! - [`types`]: raw cells/columns/tables and typed output
//! - [`error`]: error types

pub mod convert;
pub mod error;
pub mod inference;
pub mod normalize;
pub mod registry;
pub mod types;

pub use error::{FailureReason, InferenceError, InferenceResult};
pub use inference::{convert_one, infer, infer_table, supported_types, validate_type_name};
