//! Ordered catalog of convertible types.
//!
//! A [`TypeRegistry`] maps canonical type names to converters and fixes the order in which
//! automatic inference tries them. The process-wide catalog is [`registry()`], built once on
//! first use and read-only afterwards, so it can be shared across threads without locking.

use std::sync::LazyLock;

use crate::convert::{converter_for, ConvertFn, ConvertOptions};
use crate::error::{ConversionResult, InferenceError, InferenceResult};
use crate::types::{Column, DataType, TypedColumn};

/// One catalog entry: priority, type, and the converter implementing it.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    /// Inference priority; lower is tried first.
    pub order: u32,
    pub data_type: DataType,
    pub converter: ConvertFn,
}

impl TypeDescriptor {
    /// Canonical type name.
    pub fn name(&self) -> &'static str {
        self.data_type.as_str()
    }

    /// Run this descriptor's converter.
    pub fn convert(&self, column: &Column, options: &ConvertOptions) -> ConversionResult<TypedColumn> {
        (self.converter)(column, options)
    }
}

/// Catalog of [`TypeDescriptor`]s sorted by ascending `order`.
///
/// Descriptors with equal `order` keep their registration sequence.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    descriptors: Vec<TypeDescriptor>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard catalog, in inference priority order.
    ///
    /// Booleans and small integers are syntactic subsets of wider numeric and generic types, so
    /// they come first; the generic `object` type is last and accepts anything.
    pub fn standard() -> Self {
        const PRIORITY: [DataType; 12] = [
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

        let mut registry = Self::new();
        for (order, data_type) in (0u32..).zip(PRIORITY) {
            registry.register(order, data_type, converter_for(data_type));
        }
        registry
    }

    /// Insert a descriptor, keeping the catalog sorted by `order`.
    ///
    /// Registering a type that is already present replaces its previous descriptor, so each
    /// name maps to exactly one converter.
    pub fn register(&mut self, order: u32, data_type: DataType, converter: ConvertFn) -> &mut Self {
        self.descriptors.retain(|d| d.data_type != data_type);
        let at = self.descriptors.partition_point(|d| d.order <= order);
        self.descriptors.insert(
            at,
            TypeDescriptor {
                order,
                data_type,
                converter,
            },
        );
        self
    }

    /// Look up a descriptor by canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::UnknownType`] for names outside the catalog.
    pub fn lookup(&self, type_name: &str) -> InferenceResult<&TypeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name() == type_name)
            .ok_or_else(|| InferenceError::UnknownType {
                type_name: type_name.to_owned(),
            })
    }

    /// Look up a descriptor by type.
    pub fn get(&self, data_type: DataType) -> Option<&TypeDescriptor> {
        self.descriptors.iter().find(|d| d.data_type == data_type)
    }

    /// Descriptors in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter()
    }

    /// Canonical names in priority order.
    pub fn supported_types(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(TypeDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

static REGISTRY: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::standard);

/// The process-wide standard registry.
///
/// Initialization runs exactly once, before the first lookup completes.
pub fn registry() -> &'static TypeRegistry {
    &REGISTRY
}
