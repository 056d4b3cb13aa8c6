use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter};

use super::{EndpointModel, Property, TypeDescriptor};

/// Structural edge cases a schema can exhibit. A model may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter)]
pub enum SpecialCase {
  CircularReference,
  DiscriminatedUnion,
  PolymorphicArray,
  DynamicProperties,
  AmbiguousUnion,
  RecursiveSchema,
  MultipleComposition,
  ConditionalSchema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum InheritanceKind {
  #[default]
  None,
  AbstractBase,
  InterfaceImpl,
  Composition,
  AllOfFlattening,
}

/// How a renderer should express a model's relationship to other models.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritanceStrategy {
  pub kind: InheritanceKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub base_or_interface_name: Option<String>,
  /// Only populated for [`InheritanceKind::Composition`].
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub composed_models: Vec<String>,
}

impl InheritanceStrategy {
  pub fn none() -> Self {
    Self::default()
  }

  pub fn abstract_base(base: impl Into<String>) -> Self {
    Self {
      kind: InheritanceKind::AbstractBase,
      base_or_interface_name: Some(base.into()),
      composed_models: vec![],
    }
  }

  pub fn interface_impl(interface: impl Into<String>) -> Self {
    Self {
      kind: InheritanceKind::InterfaceImpl,
      base_or_interface_name: Some(interface.into()),
      composed_models: vec![],
    }
  }

  pub fn composition(composed_models: Vec<String>) -> Self {
    Self {
      kind: InheritanceKind::Composition,
      base_or_interface_name: None,
      composed_models,
    }
  }

  pub fn all_of_flattening() -> Self {
    Self {
      kind: InheritanceKind::AllOfFlattening,
      ..Self::default()
    }
  }

  /// Model names this strategy points at.
  pub fn referenced_models(&self) -> impl Iterator<Item = &str> {
    self
      .base_or_interface_name
      .as_deref()
      .filter(|_| self.kind == InheritanceKind::AbstractBase)
      .into_iter()
      .chain(self.composed_models.iter().map(String::as_str))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorInfo {
  pub property_name: String,
  /// Discriminator value to model name, in mapping declaration order.
  pub value_to_schema_name: IndexMap<String, String>,
  pub required: bool,
}

/// How a renderer tells union members apart when deserializing.
///
/// [`UnionDetectionStrategy::HeuristicTryEach`] is an ordered fallback chain: the
/// first structurally compatible member wins. For inputs that satisfy several
/// members (for example an object carrying the required fields of two of them),
/// the result depends on member order and is therefore ambiguous.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UnionDetectionStrategy {
  DiscriminatorDispatch {
    property_name: String,
    value_to_schema_name: IndexMap<String, String>,
  },
  HeuristicTryEach {
    members: Vec<TypeDescriptor>,
  },
}

/// The analyzed form of one named (or hoisted) schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaModel {
  /// Target identifier derived from the component name.
  pub name: String,
  pub original_name: String,
  pub properties: Vec<Property>,
  pub inheritance: InheritanceStrategy,
  pub special_cases: BTreeSet<SpecialCase>,
  /// Direct model names this model uses, first-seen order, never itself.
  pub dependencies: Vec<String>,
  /// References left out of `dependencies` so the dependency graph stays acyclic.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub cyclic_references: Vec<String>,
  pub is_enum: bool,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub enum_values: Vec<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub discriminator: Option<DiscriminatorInfo>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub union_members: Vec<TypeDescriptor>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub union_strategy: Option<UnionDetectionStrategy>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub additional_properties: Option<TypeDescriptor>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub aliased_type: Option<TypeDescriptor>,
  /// Discriminated unions this model is a member of.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub implements: Vec<String>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub synthetic: bool,
}

impl SchemaModel {
  pub fn new(name: impl Into<String>, original_name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      original_name: original_name.into(),
      properties: vec![],
      inheritance: InheritanceStrategy::none(),
      special_cases: BTreeSet::new(),
      dependencies: vec![],
      cyclic_references: vec![],
      is_enum: false,
      enum_values: vec![],
      description: None,
      discriminator: None,
      union_members: vec![],
      union_strategy: None,
      additional_properties: None,
      aliased_type: None,
      implements: vec![],
      synthetic: false,
    }
  }

  pub fn has_special_case(&self, special_case: SpecialCase) -> bool {
    self.special_cases.contains(&special_case)
  }

  pub fn is_union(&self) -> bool {
    !self.union_members.is_empty()
  }

  pub fn property(&self, name: &str) -> Option<&Property> {
    self.properties.iter().find(|p| p.name == name)
  }

  /// Constructor parameter order: required properties in document order, then
  /// optional properties in document order.
  pub fn constructor_parameters(&self) -> impl Iterator<Item = &Property> {
    let (required, optional): (Vec<_>, Vec<_>) = self.properties.iter().partition(|p| p.required);
    required.into_iter().chain(optional)
  }

  /// Every model name this model mentions through its own types, in first-seen order.
  pub(crate) fn referenced_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = vec![];

    let types = self
      .properties
      .iter()
      .map(|p| &p.ty)
      .chain(&self.union_members)
      .chain(&self.additional_properties)
      .chain(&self.aliased_type);
    for ty in types {
      ty.visit_references(&mut |name| push_unique(&mut names, name));
    }
    for name in self.inheritance.referenced_models() {
      push_unique(&mut names, name);
    }
    names
  }
}

fn push_unique<'a>(names: &mut Vec<&'a str>, name: &'a str) {
  if !names.contains(&name) {
    names.push(name);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InfoModel {
  pub title: String,
  pub version: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// The root of the IR handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalModel {
  pub info: InfoModel,
  /// Keyed by model name, in source declaration order.
  pub schemas: IndexMap<String, SchemaModel>,
  pub endpoints: Vec<EndpointModel>,
  /// Every model appears after all of its dependencies.
  pub render_order: Vec<String>,
}

impl InternalModel {
  pub fn schema(&self, name: &str) -> Option<&SchemaModel> {
    self.schemas.get(name)
  }

  /// Models in [`InternalModel::render_order`].
  pub fn ordered_schemas(&self) -> impl Iterator<Item = &SchemaModel> {
    self.render_order.iter().filter_map(|name| self.schemas.get(name))
  }
}
