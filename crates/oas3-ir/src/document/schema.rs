use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use strum::Display;

/// A JSON Schema primitive type name as used by OpenAPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaType {
  String,
  Integer,
  Number,
  Boolean,
  Array,
  Object,
  Null,
  /// Any type name outside the JSON Schema vocabulary, such as Swagger 2's `file`.
  #[serde(other)]
  Unknown,
}

impl SchemaType {
  /// Types whose values are not JSON objects or arrays.
  pub fn is_scalar(self) -> bool {
    matches!(self, Self::String | Self::Integer | Self::Number | Self::Boolean)
  }
}

/// The `type` keyword, which OpenAPI 3.1 allows to be a list (`["string", "null"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaTypeSet {
  Single(SchemaType),
  Multiple(Vec<SchemaType>),
}

impl SchemaTypeSet {
  pub fn contains(&self, schema_type: SchemaType) -> bool {
    match self {
      Self::Single(single) => *single == schema_type,
      Self::Multiple(types) => types.contains(&schema_type),
    }
  }

  /// Returns the only non-null type, if the set has exactly one.
  ///
  /// ```text
  /// "string"            => Some(String)
  /// ["string", "null"]  => Some(String)
  /// ["string", "integer"] => None
  /// ```
  pub fn non_null(&self) -> Option<SchemaType> {
    match self {
      Self::Single(SchemaType::Null) => None,
      Self::Single(single) => Some(*single),
      Self::Multiple(types) => {
        let mut non_null = types.iter().filter(|t| **t != SchemaType::Null);
        match (non_null.next(), non_null.next()) {
          (Some(only), None) => Some(*only),
          _ => None,
        }
      }
    }
  }
}

/// `additionalProperties`: either a boolean switch or a value schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
  Allowed(bool),
  Schema(Box<Schema>),
}

impl AdditionalProperties {
  /// True unless the document closes the object with `additionalProperties: false`.
  pub fn is_open(&self) -> bool {
    !matches!(self, Self::Allowed(false))
  }

  pub fn schema(&self) -> Option<&Schema> {
    match self {
      Self::Schema(schema) => Some(schema),
      Self::Allowed(_) => None,
    }
  }
}

/// `exclusiveMinimum`/`exclusiveMaximum`: a flag in 3.0, a bound in 3.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
  Flag(bool),
  Value(Number),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
  pub property_name: String,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub mapping: IndexMap<String, String>,
}

/// A schema object, named or inline.
///
/// Only the keywords the engine reads are modelled; everything else (including
/// `x-` extensions) is ignored on input. Keyed collections are [`IndexMap`]s so the
/// order of the source document survives deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
  #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
  pub ref_path: Option<String>,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub schema_type: Option<SchemaTypeSet>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub nullable: Option<bool>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub properties: IndexMap<String, Schema>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub required: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<Box<Schema>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub additional_properties: Option<AdditionalProperties>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub all_of: Vec<Schema>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub one_of: Vec<Schema>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub any_of: Vec<Schema>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discriminator: Option<Discriminator>,
  #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
  pub enum_values: Vec<Value>,
  #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
  pub const_value: Option<Value>,
  #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
  pub default_value: Option<Value>,
  #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
  pub if_schema: Option<Box<Schema>>,
  #[serde(rename = "then", default, skip_serializing_if = "Option::is_none")]
  pub then_schema: Option<Box<Schema>>,
  #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
  pub else_schema: Option<Box<Schema>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub minimum: Option<Number>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub maximum: Option<Number>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub exclusive_minimum: Option<ExclusiveBound>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub exclusive_maximum: Option<ExclusiveBound>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub multiple_of: Option<Number>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_length: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_length: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_items: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_items: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unique_items: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub read_only: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub write_only: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deprecated: Option<bool>,
}

impl Schema {
  /// Builds a bare `$ref` schema.
  pub fn reference(ref_path: impl Into<String>) -> Self {
    Self {
      ref_path: Some(ref_path.into()),
      ..Default::default()
    }
  }

  pub fn ref_path(&self) -> Option<&str> {
    self.ref_path.as_deref()
  }

  /// Returns the single non-null `type`, if one is declared.
  pub fn single_type(&self) -> Option<SchemaType> {
    self.schema_type.as_ref().and_then(SchemaTypeSet::non_null)
  }

  pub fn is_single_type(&self, schema_type: SchemaType) -> bool {
    self.single_type() == Some(schema_type)
  }

  /// True for `nullable: true` (3.0) or a type list containing `"null"` (3.1).
  pub fn is_nullable(&self) -> bool {
    self.nullable == Some(true)
      || self
        .schema_type
        .as_ref()
        .is_some_and(|types| types.contains(SchemaType::Null))
  }

  /// True for `{ "type": "null" }` placeholders used as union alternatives.
  pub fn is_null(&self) -> bool {
    self.ref_path.is_none() && self.schema_type == Some(SchemaTypeSet::Single(SchemaType::Null))
  }

  pub fn is_array(&self) -> bool {
    self.is_single_type(SchemaType::Array)
  }

  /// True for inline object definitions: `type: object` or a non-empty `properties` map.
  pub fn is_object(&self) -> bool {
    self.ref_path.is_none() && (self.is_single_type(SchemaType::Object) || !self.properties.is_empty())
  }

  pub fn has_union(&self) -> bool {
    !self.one_of.is_empty() || !self.any_of.is_empty()
  }

  /// Iterates `oneOf` then `anyOf` alternatives in document order.
  pub fn union_variants(&self) -> impl Iterator<Item = &Schema> {
    self.one_of.iter().chain(&self.any_of)
  }

  pub fn has_intersection(&self) -> bool {
    !self.all_of.is_empty()
  }

  pub fn has_enum_values(&self) -> bool {
    !self.enum_values.is_empty()
  }

  pub fn is_conditional(&self) -> bool {
    self.if_schema.is_some() || self.then_schema.is_some() || self.else_schema.is_some()
  }

  /// True when the discriminator carries an explicit, non-empty mapping.
  pub fn has_discriminator_mapping(&self) -> bool {
    self.discriminator.as_ref().is_some_and(|d| !d.mapping.is_empty())
  }

  /// True when `additionalProperties` is `true` or a schema.
  pub fn has_open_additional_properties(&self) -> bool {
    self.additional_properties.as_ref().is_some_and(AdditionalProperties::is_open)
  }

  /// True when the schema carries no structural information of its own, only
  /// constraints or annotations (`{ "maxLength": 5 }`, `{ "description": ".." }`).
  pub fn is_constraint_only(&self) -> bool {
    self.ref_path.is_none()
      && self.schema_type.is_none()
      && self.properties.is_empty()
      && self.items.is_none()
      && self.all_of.is_empty()
      && !self.has_union()
      && self.enum_values.is_empty()
      && self.additional_properties.as_ref().and_then(AdditionalProperties::schema).is_none()
  }
}
