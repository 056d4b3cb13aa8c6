use serde::Serialize;
use serde_json::{Number, Value};
use strum::Display;

/// Scalar targets for the OpenAPI primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScalarType {
  String,
  Int,
  Float,
  Bool,
  /// No `type` (or an unrecognised one): any JSON value.
  Any,
}

/// The shape half of a [`TypeDescriptor`]. Each variant owns exactly the data
/// that belongs to it, so "an array with union members" cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeKind {
  Scalar {
    scalar: ScalarType,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
  },
  Array {
    item_type: Box<TypeDescriptor>,
  },
  Union {
    union_members: Vec<TypeDescriptor>,
  },
  /// An inline object that was not hoisted into its own model.
  Object,
  Enum {
    enum_values: Vec<Value>,
  },
  /// A named schema model, by name. The target is never embedded.
  Reference {
    reference_name: String,
  },
}

impl TypeKind {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Scalar { .. } => "scalar",
      Self::Array { .. } => "array",
      Self::Union { .. } => "union",
      Self::Object => "object",
      Self::Enum { .. } => "enum",
      Self::Reference { .. } => "reference",
    }
  }
}

/// The resolved type of a property, array item, union member or alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
  #[serde(flatten)]
  pub kind: TypeKind,
  pub nullable: bool,
}

impl TypeDescriptor {
  pub fn new(kind: TypeKind) -> Self {
    Self { kind, nullable: false }
  }

  pub fn scalar(scalar: ScalarType) -> Self {
    Self::new(TypeKind::Scalar { scalar, format: None })
  }

  pub fn scalar_with_format(scalar: ScalarType, format: Option<String>) -> Self {
    Self::new(TypeKind::Scalar { scalar, format })
  }

  pub fn array(item_type: TypeDescriptor) -> Self {
    Self::new(TypeKind::Array {
      item_type: Box::new(item_type),
    })
  }

  pub fn union(union_members: Vec<TypeDescriptor>) -> Self {
    Self::new(TypeKind::Union { union_members })
  }

  pub fn object() -> Self {
    Self::new(TypeKind::Object)
  }

  pub fn enumeration(enum_values: Vec<Value>) -> Self {
    Self::new(TypeKind::Enum { enum_values })
  }

  pub fn reference(reference_name: impl Into<String>) -> Self {
    Self::new(TypeKind::Reference {
      reference_name: reference_name.into(),
    })
  }

  #[must_use]
  pub fn with_nullable(mut self, nullable: bool) -> Self {
    self.nullable = nullable;
    self
  }

  /// ORs `nullable` into the current flag.
  #[must_use]
  pub fn or_nullable(mut self, nullable: bool) -> Self {
    self.nullable |= nullable;
    self
  }

  pub fn reference_name(&self) -> Option<&str> {
    match &self.kind {
      TypeKind::Reference { reference_name } => Some(reference_name),
      _ => None,
    }
  }

  pub fn item_type(&self) -> Option<&TypeDescriptor> {
    match &self.kind {
      TypeKind::Array { item_type } => Some(item_type),
      _ => None,
    }
  }

  pub fn union_members(&self) -> Option<&[TypeDescriptor]> {
    match &self.kind {
      TypeKind::Union { union_members } => Some(union_members),
      _ => None,
    }
  }

  pub fn enum_values(&self) -> Option<&[Value]> {
    match &self.kind {
      TypeKind::Enum { enum_values } => Some(enum_values),
      _ => None,
    }
  }

  pub fn is_scalar(&self, scalar: ScalarType) -> bool {
    matches!(&self.kind, TypeKind::Scalar { scalar: s, .. } if *s == scalar)
  }

  /// Calls `visit` for every model name this descriptor mentions, depth-first
  /// through array items and union members, in declaration order.
  pub fn visit_references<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
    match &self.kind {
      TypeKind::Reference { reference_name } => visit(reference_name),
      TypeKind::Array { item_type } => item_type.visit_references(visit),
      TypeKind::Union { union_members } => {
        for member in union_members {
          member.visit_references(visit);
        }
      }
      TypeKind::Scalar { .. } | TypeKind::Object | TypeKind::Enum { .. } => {}
    }
  }
}

/// One constraint carried over from the source schema for the renderer to enforce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationRule {
  Pattern {
    pattern: String,
  },
  Enum {
    values: Vec<Value>,
  },
  Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<Number>,
    exclusive_minimum: bool,
    exclusive_maximum: bool,
  },
  MultipleOf {
    value: Number,
  },
  Length {
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<u64>,
  },
  ItemCount {
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<u64>,
  },
  UniqueItems,
}

/// A property of a schema model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
  /// The literal key from the source `properties` map.
  pub name: String,
  #[serde(rename = "type")]
  pub ty: TypeDescriptor,
  pub required: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub validation_rules: Vec<ValidationRule>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default_value: Option<Value>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub deprecated: bool,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub read_only: bool,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub write_only: bool,
}
