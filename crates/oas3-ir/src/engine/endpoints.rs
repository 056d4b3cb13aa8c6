use indexmap::IndexMap;

use super::{EngineError, ResolveContext, builder::ModelBuilder};
use crate::{
  document::{
    Document, MediaType, Method, ObjectOrReference, Operation, Parameter, ParameterIn, PathItem, parse_component_ref,
    preferred_media_type, refs::escape_segment,
  },
  ir::{EndpointModel, ParameterModel, RequestBodyModel, ResponseModel, ScalarType, SchemaModel, TypeDescriptor},
  naming::{sanitize, to_type_identifier},
};

/// Builds one [`EndpointModel`] per operation, paths in document order and
/// methods in [`Method`] order. Hoisted body models are returned alongside.
pub(crate) fn build_endpoints<'a>(
  document: &'a Document,
  builder: &mut ModelBuilder<'_, 'a>,
) -> Result<(Vec<EndpointModel>, Vec<SchemaModel>), EngineError> {
  let mut endpoints = vec![];
  let mut hoisted = vec![];

  for (path, item) in &document.paths {
    for (method, operation) in item.operations() {
      let label = operation
        .operation_id
        .clone()
        .unwrap_or_else(|| format!("{} {path}", method.to_string().to_uppercase()));
      let ctx = ResolveContext::at(&label, format!("#/paths/{}/{method}", escape_segment(path)));

      let endpoint = EndpointBuilder {
        document,
        path,
        method,
        item,
        operation,
        ctx: &ctx,
      }
      .build(builder, &mut hoisted)?;

      tracing::debug!(
        endpoint = %label,
        parameters = endpoint.parameters.len(),
        responses = endpoint.responses.len(),
        "built endpoint"
      );
      endpoints.push(endpoint);
    }
  }

  Ok((endpoints, hoisted))
}

struct EndpointBuilder<'e, 'a> {
  document: &'a Document,
  path: &'a str,
  method: Method,
  item: &'a PathItem,
  operation: &'a Operation,
  ctx: &'e ResolveContext<'e>,
}

impl<'a> EndpointBuilder<'_, 'a> {
  fn build(self, builder: &mut ModelBuilder<'_, 'a>, hoisted: &mut Vec<SchemaModel>) -> Result<EndpointModel, EngineError> {
    let type_base = self.type_base();
    let parameters = self.parameters(builder)?;
    let request_body = self.request_body(builder, &type_base, hoisted)?;
    let responses = self.responses(builder, &type_base, hoisted)?;

    Ok(EndpointModel {
      path: self.path.to_string(),
      method: self.method,
      operation_id: self.operation.operation_id.clone(),
      summary: self.operation.summary.clone().or_else(|| self.item.summary.clone()),
      description: self.operation.description.clone().or_else(|| self.item.description.clone()),
      deprecated: self.operation.deprecated.unwrap_or(false),
      tags: self.operation.tags.clone(),
      parameters,
      request_body,
      responses,
    })
  }

  /// `PascalCase` stem for hoisted body models: the operation id, or the method and path.
  fn type_base(&self) -> String {
    match &self.operation.operation_id {
      Some(operation_id) => to_type_identifier(operation_id),
      None => to_type_identifier(&format!("{}_{}", self.method, self.path)),
    }
  }

  /// Path-level parameters first, then operation parameters. An operation
  /// parameter replaces a path-level one with the same name and location.
  fn parameters(&self, builder: &ModelBuilder<'_, 'a>) -> Result<Vec<ParameterModel>, EngineError> {
    let path_ctx = ResolveContext::at(self.ctx.owner(), format!("#/paths/{}", escape_segment(self.path)));
    let declared = self
      .item
      .parameters
      .iter()
      .enumerate()
      .map(|(i, param)| (param, path_ctx.child("parameters").child(i)))
      .chain(
        self
          .operation
          .parameters
          .iter()
          .enumerate()
          .map(|(i, param)| (param, self.ctx.child("parameters").child(i))),
      );

    let mut merged: IndexMap<(&str, ParameterIn), (&Parameter, ResolveContext<'_>)> = IndexMap::new();
    for (param, param_ctx) in declared {
      let resolved = resolve_component(param, "parameters", &self.document.components.parameters, &param_ctx)?;
      merged.insert((resolved.name.as_str(), resolved.location), (resolved, param_ctx));
    }

    merged
      .into_values()
      .map(|(param, param_ctx)| -> Result<ParameterModel, EngineError> {
        let required = param.required || param.location == ParameterIn::Path;
        let ty = match &param.schema {
          Some(schema) => builder.resolver().resolve_type(schema, &param_ctx.child("schema"))?,
          None => TypeDescriptor::scalar(ScalarType::Any),
        };
        Ok(ParameterModel {
          name: param.name.clone(),
          location: param.location,
          required,
          ty: ty.or_nullable(!required),
          description: param.description.clone(),
        })
      })
      .collect()
  }

  fn request_body(
    &self,
    builder: &mut ModelBuilder<'_, 'a>,
    type_base: &str,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<Option<RequestBodyModel>, EngineError> {
    let (document, operation) = (self.document, self.operation);
    let Some(body) = &operation.request_body else {
      return Ok(None);
    };
    let body_ctx = self.ctx.child("requestBody");
    let body = resolve_component(body, "requestBodies", &document.components.request_bodies, &body_ctx)?;

    let Some((content_type, media)) = preferred_media_type(&body.content) else {
      return Ok(None);
    };
    let media_ctx = body_ctx.child("content").child(content_type);
    let ty = media_type(builder, media, &format!("{type_base}Request"), &media_ctx, hoisted)?
      .unwrap_or_else(|| TypeDescriptor::scalar(ScalarType::Any));

    Ok(Some(RequestBodyModel {
      required: body.required,
      content_type: content_type.clone(),
      ty,
      description: body.description.clone(),
    }))
  }

  fn responses(
    &self,
    builder: &mut ModelBuilder<'_, 'a>,
    type_base: &str,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<Vec<ResponseModel>, EngineError> {
    let (document, operation) = (self.document, self.operation);
    let responses_ctx = self.ctx.child("responses");
    let mut responses = Vec::with_capacity(operation.responses.len());

    for (status_code, response) in &operation.responses {
      let response_ctx = responses_ctx.child(status_code);
      let response = resolve_component(response, "responses", &document.components.responses, &response_ctx)?;

      let (content_type, ty) = match preferred_media_type(&response.content) {
        Some((content_type, media)) => {
          let name = format!("{type_base}Response{}", status_suffix(status_code));
          let media_ctx = response_ctx.child("content").child(content_type);
          (
            Some(content_type.clone()),
            media_type(builder, media, &name, &media_ctx, hoisted)?,
          )
        }
        None => (None, None),
      };

      responses.push(ResponseModel {
        status_code: status_code.clone(),
        content_type,
        ty,
        description: response.description.clone(),
      });
    }

    Ok(responses)
  }
}

fn media_type<'a>(
  builder: &mut ModelBuilder<'_, 'a>,
  media: &'a MediaType,
  name: &str,
  ctx: &ResolveContext<'_>,
  hoisted: &mut Vec<SchemaModel>,
) -> Result<Option<TypeDescriptor>, EngineError> {
  media
    .schema
    .as_ref()
    .map(|schema| builder.body_type(name, schema, &ctx.child("schema"), hoisted))
    .transpose()
}

/// Follows `$ref`s into `#/components/<section>` until an inline object is found.
fn resolve_component<'a, T>(
  item: &'a ObjectOrReference<T>,
  section: &str,
  components: &'a IndexMap<String, ObjectOrReference<T>>,
  ctx: &ResolveContext<'_>,
) -> Result<&'a T, EngineError> {
  let mut current = item;
  let mut seen: Vec<&str> = vec![];

  loop {
    match current {
      ObjectOrReference::Object(object) => return Ok(object),
      ObjectOrReference::Ref { ref_path } => {
        if seen.contains(&ref_path.as_str()) {
          return Err(ctx.unresolved(ref_path));
        }
        seen.push(ref_path);
        current = parse_component_ref(ref_path, section)
          .and_then(|name| components.get(&name))
          .ok_or_else(|| ctx.unresolved(ref_path))?;
      }
    }
  }
}

/// `200` stays `200`, `2xx` becomes `2XX`, `default` becomes `Default`.
fn status_suffix(status_code: &str) -> String {
  let cleaned = sanitize(status_code);
  if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
    cleaned.to_ascii_uppercase()
  } else {
    to_type_identifier(&cleaned)
  }
}
