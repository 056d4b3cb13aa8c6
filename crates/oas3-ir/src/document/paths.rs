use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{ObjectOrReference, Schema};

/// HTTP methods in the order OpenAPI declares them on a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Method {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
  Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterIn {
  Path,
  Query,
  Header,
  Cookie,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathItem {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parameters: Vec<ObjectOrReference<Parameter>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub get: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub put: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub post: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delete: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub head: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub patch: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub trace: Option<Operation>,
}

impl PathItem {
  /// Declared operations, in [`Method`] order.
  pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
    [
      (Method::Get, self.get.as_ref()),
      (Method::Put, self.put.as_ref()),
      (Method::Post, self.post.as_ref()),
      (Method::Delete, self.delete.as_ref()),
      (Method::Options, self.options.as_ref()),
      (Method::Head, self.head.as_ref()),
      (Method::Patch, self.patch.as_ref()),
      (Method::Trace, self.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, operation)| operation.map(|op| (method, op)))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub operation_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parameters: Vec<ObjectOrReference<Parameter>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub request_body: Option<ObjectOrReference<RequestBody>>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub responses: IndexMap<String, ObjectOrReference<Response>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deprecated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
  pub name: String,
  #[serde(rename = "in")]
  pub location: ParameterIn,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deprecated: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub content: IndexMap<String, MediaType>,
}

/// Picks the media type the engine models a body with: `application/json`, then
/// any `+json` suffix, then whatever is declared first.
pub fn preferred_media_type(content: &IndexMap<String, MediaType>) -> Option<(&String, &MediaType)> {
  content
    .get_key_value("application/json")
    .or_else(|| content.iter().find(|(name, _)| is_json_media_type(name)))
    .or_else(|| content.first())
}

fn is_json_media_type(name: &str) -> bool {
  let essence = name.split(';').next().unwrap_or(name).trim();
  essence.ends_with("+json") || essence == "application/json"
}
