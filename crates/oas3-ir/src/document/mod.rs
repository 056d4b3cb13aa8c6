//! Ordered OpenAPI document model.
//!
//! The engine needs the declaration order of schemas and properties, so the
//! document is deserialized into these types (backed by [`IndexMap`]) rather
//! than into `oas3::Spec`, which keys everything by `BTreeMap`. The `oas3`
//! model is still used by the loader as a structural validator.

pub mod loader;
mod paths;
pub mod refs;
mod schema;

use indexmap::IndexMap;
pub use loader::{LoadError, LoaderOptions, SpecFormat, SpecLoader, load_slice};
pub use paths::{MediaType, Method, Operation, Parameter, ParameterIn, PathItem, RequestBody, Response, preferred_media_type};
pub use refs::{SCHEMA_REF_PREFIX, parse_component_ref, parse_schema_ref_path, schema_pointer};
pub use schema::{AdditionalProperties, Discriminator, ExclusiveBound, Schema, SchemaType, SchemaTypeSet};
use serde::{Deserialize, Serialize};


/// Either an inline object or a `$ref` to a reusable component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectOrReference<T> {
  Ref {
    #[serde(rename = "$ref")]
    ref_path: String,
  },
  Object(T),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
  pub title: String,
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
  #[serde(default)]
  pub schemas: IndexMap<String, Schema>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub parameters: IndexMap<String, ObjectOrReference<Parameter>>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub request_bodies: IndexMap<String, ObjectOrReference<RequestBody>>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub responses: IndexMap<String, ObjectOrReference<Response>>,
}

/// A parsed OpenAPI 3.x document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub openapi: String,
  pub info: Info,
  #[serde(default)]
  pub paths: IndexMap<String, PathItem>,
  #[serde(default)]
  pub components: Components,
}

impl Document {
  /// Parses a JSON document; errors name the path of the offending field.
  pub fn from_json_str(input: &str) -> Result<Self, LoadError> {
    let deserializer = &mut serde_json::Deserializer::from_str(input);
    serde_path_to_error::deserialize(deserializer).map_err(|e| LoadError::Json {
      path: e.path().to_string(),
      source: e.into_inner(),
    })
  }

  pub fn from_yaml_str(input: &str) -> Result<Self, LoadError> {
    let deserializer = serde_yaml::Deserializer::from_str(input);
    serde_path_to_error::deserialize(deserializer).map_err(|e| LoadError::Yaml {
      path: e.path().to_string(),
      source: e.into_inner(),
    })
  }

  pub fn from_value(value: serde_json::Value) -> Result<Self, LoadError> {
    serde_path_to_error::deserialize(value).map_err(|e| LoadError::Json {
      path: e.path().to_string(),
      source: e.into_inner(),
    })
  }

  /// Named component schemas in declaration order.
  pub fn schemas(&self) -> &IndexMap<String, Schema> {
    &self.components.schemas
  }

  pub fn schema(&self, name: &str) -> Option<&Schema> {
    self.components.schemas.get(name)
  }
}
