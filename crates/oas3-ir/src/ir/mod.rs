//! The intermediate representation produced by the engine.
//!
//! Models refer to each other by name only. A [`TypeDescriptor`] of kind
//! `reference` carries the target model's name and is resolved by lookup in
//! [`InternalModel::schemas`], which keeps the structure finite even when the
//! source schemas are cyclic.

mod endpoints;
mod model;
mod types;

pub use endpoints::{EndpointModel, ParameterModel, RequestBodyModel, ResponseModel};
pub use model::{
  DiscriminatorInfo, InfoModel, InheritanceKind, InheritanceStrategy, InternalModel, SchemaModel, SpecialCase,
  UnionDetectionStrategy,
};
pub use types::{Property, ScalarType, TypeDescriptor, TypeKind, ValidationRule};

#[cfg(test)]
mod tests;
