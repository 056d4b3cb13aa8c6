use serde::Serialize;

use super::TypeDescriptor;
use crate::document::{Method, ParameterIn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterModel {
  pub name: String,
  pub location: ParameterIn,
  pub required: bool,
  #[serde(rename = "type")]
  pub ty: TypeDescriptor,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyModel {
  pub required: bool,
  pub content_type: String,
  #[serde(rename = "type")]
  pub ty: TypeDescriptor,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseModel {
  pub status_code: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content_type: Option<String>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub ty: Option<TypeDescriptor>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointModel {
  pub path: String,
  pub method: Method,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub operation_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub deprecated: bool,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
  pub parameters: Vec<ParameterModel>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_body: Option<RequestBodyModel>,
  pub responses: Vec<ResponseModel>,
}
