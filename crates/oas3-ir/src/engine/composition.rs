use indexmap::{IndexMap, IndexSet};

use super::{EngineError, ResolveContext, SchemaGraph};
use crate::document::{AdditionalProperties, Schema, SchemaType, refs::escape_segment, schema_pointer};

/// What an `allOf` member contributes once references are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberShape {
  Object,
  Scalar(SchemaType),
  Array,
  Union,
  /// Only constraints or annotations; ignored when flattening.
  ConstraintOnly,
  Other,
}

impl MemberShape {
  pub(crate) fn is_object(self) -> bool {
    self == Self::Object
  }

  pub(crate) fn is_scalar(self) -> bool {
    matches!(self, Self::Scalar(_))
  }
}

/// Classifies a schema for composition purposes, following `$ref`s and nested
/// `allOf`s. A reference cycle that never reaches a concrete shape is `Other`.
pub(crate) fn member_shape(graph: &SchemaGraph<'_>, schema: &Schema) -> MemberShape {
  shape_of(graph, schema, &mut vec![])
}

fn shape_of<'a>(graph: &SchemaGraph<'a>, schema: &Schema, visiting: &mut Vec<&'a str>) -> MemberShape {
  if let Some(ref_path) = schema.ref_path() {
    let Some(name) = graph.lookup_ref(ref_path) else {
      return MemberShape::Other;
    };
    if visiting.contains(&name) {
      return MemberShape::Other;
    }
    let Some(target) = graph.schema(name) else {
      return MemberShape::Other;
    };
    visiting.push(name);
    let shape = shape_of(graph, target, visiting);
    visiting.pop();
    return shape;
  }

  if schema.is_constraint_only() {
    return MemberShape::ConstraintOnly;
  }
  if schema.has_union() {
    return MemberShape::Union;
  }
  if schema.is_object()
    || (schema.schema_type.is_none() && matches!(schema.additional_properties, Some(AdditionalProperties::Schema(_))))
  {
    return MemberShape::Object;
  }
  if schema.has_intersection() {
    let shapes = schema
      .all_of
      .iter()
      .map(|member| shape_of(graph, member, visiting))
      .filter(|shape| *shape != MemberShape::ConstraintOnly)
      .collect::<Vec<_>>();
    if shapes.iter().any(|shape| shape.is_object()) {
      return MemberShape::Object;
    }
    return match shapes.as_slice() {
      [] => MemberShape::ConstraintOnly,
      [first, rest @ ..] if rest.iter().all(|shape| shape == first) => *first,
      _ => MemberShape::Other,
    };
  }

  match schema.single_type() {
    Some(SchemaType::Array) => MemberShape::Array,
    Some(SchemaType::Object) => MemberShape::Object,
    Some(scalar) if scalar.is_scalar() => MemberShape::Scalar(scalar),
    _ => MemberShape::Other,
  }
}

/// Counts `allOf` members that are object schemas once references are followed.
pub(crate) fn object_member_count(graph: &SchemaGraph<'_>, schema: &Schema) -> usize {
  schema
    .all_of
    .iter()
    .filter(|member| member_shape(graph, member).is_object())
    .count()
}

/// Rejects `allOf`s that cannot be expressed as a single type: scalar members
/// mixed with object members, or scalar members of different types.
pub(crate) fn check_all_of(
  graph: &SchemaGraph<'_>,
  schema: &Schema,
  ctx: &ResolveContext<'_>,
) -> Result<Vec<MemberShape>, EngineError> {
  let shapes = schema
    .all_of
    .iter()
    .map(|member| member_shape(graph, member))
    .collect::<Vec<_>>();

  let has_object = !schema.properties.is_empty() || shapes.iter().any(|shape| shape.is_object());
  let scalars = shapes
    .iter()
    .filter_map(|shape| match shape {
      MemberShape::Scalar(scalar) => Some(*scalar),
      _ => None,
    })
    .collect::<IndexSet<_>>();

  if has_object && !scalars.is_empty() {
    return Err(ctx.child("allOf").unsupported("allOf mixes scalar and object members"));
  }
  if scalars.len() > 1 {
    let names = scalars.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    return Err(ctx.child("allOf").unsupported(format!("allOf mixes scalar types: {names}")));
  }

  Ok(shapes)
}

/// A property gathered while flattening, with the pointer it was declared at.
#[derive(Debug, Clone)]
pub(crate) struct MergedProperty<'a> {
  pub schema: &'a Schema,
  pub pointer: String,
}

/// Collects the properties of an `allOf` in member order. Later declarations of
/// a property replace earlier ones but keep the position of the first.
#[derive(Debug, Default)]
pub(crate) struct MergeAccumulator<'a> {
  pub properties: IndexMap<&'a str, MergedProperty<'a>>,
  pub required: IndexSet<&'a str>,
  pub additional_properties: Option<(&'a AdditionalProperties, String)>,
}

impl<'a> MergeAccumulator<'a> {
  /// Merges the own (non-`allOf`) keywords of `source`, declared at `pointer`.
  fn merge_from(&mut self, source: &'a Schema, pointer: &str) {
    for (name, prop) in &source.properties {
      let merged = MergedProperty {
        schema: prop,
        pointer: format!("{pointer}/properties/{}", escape_segment(name)),
      };
      self.properties.insert(name.as_str(), merged);
    }
    self.required.extend(source.required.iter().map(String::as_str));
    if self.additional_properties.is_none()
      && let Some(additional) = &source.additional_properties
    {
      self.additional_properties = Some((additional, format!("{pointer}/additionalProperties")));
    }
  }

  /// Flattens `schema`: its `allOf` members first (references followed
  /// transitively), then its own properties.
  pub(crate) fn flatten(
    &mut self,
    graph: &SchemaGraph<'a>,
    schema: &'a Schema,
    pointer: &str,
    ctx: &ResolveContext<'_>,
    visiting: &mut Vec<&'a str>,
  ) -> Result<(), EngineError> {
    for (i, member) in schema.all_of.iter().enumerate() {
      let member_pointer = format!("{pointer}/allOf/{i}");
      if let Some(ref_path) = member.ref_path() {
        let name = graph
          .lookup_ref(ref_path)
          .ok_or_else(|| ResolveContext::at(ctx.owner(), member_pointer.clone()).unresolved(ref_path))?;
        if visiting.contains(&name) {
          let chain = visiting.iter().chain([&name]).copied().collect::<Vec<_>>().join(" -> ");
          return Err(ResolveContext::at(ctx.owner(), member_pointer).unsupported(format!("allOf cycle: {chain}")));
        }
        let Some(target) = graph.schema(name) else {
          return Err(ResolveContext::at(ctx.owner(), member_pointer).unresolved(ref_path));
        };
        visiting.push(name);
        self.flatten(graph, target, &schema_pointer(name), ctx, visiting)?;
        visiting.pop();
      } else {
        self.flatten(graph, member, &member_pointer, ctx, visiting)?;
      }
    }
    self.merge_from(schema, pointer);
    Ok(())
  }
}
