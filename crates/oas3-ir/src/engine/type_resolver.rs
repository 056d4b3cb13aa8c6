use serde_json::Number;

use super::{
  EngineConfig, EngineError, ResolveContext, SchemaGraph,
  composition::{MemberShape, check_all_of},
  names::NameTable,
};
use crate::{
  document::{AdditionalProperties, ExclusiveBound, Schema, SchemaType, SchemaTypeSet},
  ir::{Property, ScalarType, TypeDescriptor, ValidationRule},
};

/// Maps schemas to [`TypeDescriptor`]s. References become `reference`
/// descriptors naming the target model and are never expanded, so resolution
/// terminates on cyclic graphs.
pub struct TypeResolver<'g, 'a> {
  graph: &'g SchemaGraph<'a>,
  names: &'g NameTable<'a>,
  max_depth: usize,
}

impl<'g, 'a> TypeResolver<'g, 'a> {
  pub(crate) fn new(graph: &'g SchemaGraph<'a>, names: &'g NameTable<'a>, config: &EngineConfig) -> Self {
    Self {
      graph,
      names,
      max_depth: config.max_nesting_depth,
    }
  }

  /// The model identifier a `$ref` resolves to.
  pub fn model_name(&self, ref_path: &str, ctx: &ResolveContext<'_>) -> Result<String, EngineError> {
    self
      .graph
      .lookup_ref(ref_path)
      .and_then(|name| self.names.identifier(name))
      .map(ToString::to_string)
      .ok_or_else(|| ctx.unresolved(ref_path))
  }

  pub fn resolve_type(&self, schema: &Schema, ctx: &ResolveContext<'_>) -> Result<TypeDescriptor, EngineError> {
    if ctx.depth() > self.max_depth {
      return Err(ctx.too_deep(self.max_depth));
    }
    let nullable = schema.is_nullable();

    if let Some(ref_path) = schema.ref_path() {
      return Ok(TypeDescriptor::reference(self.model_name(ref_path, ctx)?).or_nullable(nullable));
    }

    if schema.has_union() {
      let (mut members, has_null) = self.resolve_union_members(schema, ctx)?;
      let ty = if members.len() == 1 {
        members.swap_remove(0)
      } else {
        TypeDescriptor::union(members)
      };
      return Ok(ty.or_nullable(nullable || has_null));
    }

    if schema.has_intersection()
      && let Some(ty) = self.resolve_all_of(schema, ctx)?
    {
      return Ok(ty.or_nullable(nullable));
    }

    if is_enum_schema(schema) {
      return Ok(TypeDescriptor::enumeration(schema.enum_values.clone()).or_nullable(nullable));
    }

    if let Some(SchemaTypeSet::Multiple(types)) = &schema.schema_type {
      let non_null = types.iter().filter(|t| **t != SchemaType::Null).copied().collect::<Vec<_>>();
      if non_null.len() > 1 {
        let members = non_null
          .into_iter()
          .map(|schema_type| self.resolve_single_type(schema_type, schema, ctx))
          .collect::<Result<Vec<_>, _>>()?;
        return Ok(TypeDescriptor::union(members).or_nullable(nullable));
      }
    }

    let ty = match schema.single_type() {
      Some(schema_type) => self.resolve_single_type(schema_type, schema, ctx)?,
      None if schema.is_object() || schema.additional_properties.as_ref().is_some_and(|ap| ap.schema().is_some()) => {
        TypeDescriptor::object()
      }
      None => TypeDescriptor::scalar(ScalarType::Any),
    };
    Ok(ty.or_nullable(nullable))
  }

  fn resolve_single_type(
    &self,
    schema_type: SchemaType,
    schema: &Schema,
    ctx: &ResolveContext<'_>,
  ) -> Result<TypeDescriptor, EngineError> {
    let scalar = match schema_type {
      SchemaType::Array => {
        let items = schema.items.as_deref().ok_or_else(|| ctx.incomplete("array schema has no items"))?;
        let item_type = self.resolve_type(items, &ctx.child("items"))?;
        return Ok(TypeDescriptor::array(item_type));
      }
      SchemaType::Object => return Ok(TypeDescriptor::object()),
      SchemaType::String => ScalarType::String,
      SchemaType::Integer => ScalarType::Int,
      SchemaType::Number => ScalarType::Float,
      SchemaType::Boolean => ScalarType::Bool,
      SchemaType::Null | SchemaType::Unknown => ScalarType::Any,
    };
    Ok(TypeDescriptor::scalar_with_format(scalar, schema.format.clone()))
  }

  /// Resolves `oneOf` then `anyOf` alternatives in document order. `{type: null}`
  /// alternatives are dropped and reported through the returned flag.
  pub fn resolve_union_members(
    &self,
    schema: &Schema,
    ctx: &ResolveContext<'_>,
  ) -> Result<(Vec<TypeDescriptor>, bool), EngineError> {
    let variants = schema
      .one_of
      .iter()
      .enumerate()
      .map(|(i, variant)| (ctx.child("oneOf").child(i), variant))
      .chain(
        schema
          .any_of
          .iter()
          .enumerate()
          .map(|(i, variant)| (ctx.child("anyOf").child(i), variant)),
      );

    let mut members = vec![];
    let mut has_null = false;
    for (variant_ctx, variant) in variants {
      if variant.is_null() {
        has_null = true;
        continue;
      }
      members.push(self.resolve_type(variant, &variant_ctx)?);
    }

    if members.is_empty() {
      let keyword = if schema.one_of.is_empty() { "anyOf" } else { "oneOf" };
      return Err(ctx.child(keyword).incomplete("union has no usable alternatives"));
    }
    Ok((members, has_null))
  }

  /// `None` when every member is constraint-only, leaving the schema's own
  /// keywords to decide the type.
  fn resolve_all_of(&self, schema: &Schema, ctx: &ResolveContext<'_>) -> Result<Option<TypeDescriptor>, EngineError> {
    let shapes = check_all_of(self.graph, schema, ctx)?;
    let significant = schema
      .all_of
      .iter()
      .enumerate()
      .zip(shapes)
      .filter(|(_, shape)| *shape != MemberShape::ConstraintOnly)
      .collect::<Vec<_>>();

    if !schema.properties.is_empty() {
      return Ok(Some(TypeDescriptor::object()));
    }

    match significant.as_slice() {
      [] => Ok(None),
      [((i, member), _)] => self.resolve_type(member, &ctx.child("allOf").child(i)).map(Some),
      _ if significant.iter().any(|(_, shape)| shape.is_object()) => Ok(Some(TypeDescriptor::object())),
      [((i, member), first), rest @ ..] if first.is_scalar() && rest.iter().all(|(_, shape)| shape == first) => {
        self.resolve_type(member, &ctx.child("allOf").child(i)).map(Some)
      }
      _ => Err(ctx.child("allOf").unsupported("allOf members cannot be combined into one type")),
    }
  }

  /// Value type of an open map; `None` for `additionalProperties: false`.
  pub fn additional_properties_type(
    &self,
    additional: &AdditionalProperties,
    ctx: &ResolveContext<'_>,
  ) -> Result<Option<TypeDescriptor>, EngineError> {
    match additional {
      AdditionalProperties::Allowed(false) => Ok(None),
      AdditionalProperties::Allowed(true) => Ok(Some(TypeDescriptor::scalar(ScalarType::Any))),
      AdditionalProperties::Schema(schema) => self.resolve_type(schema, ctx).map(Some),
    }
  }

  /// Resolves one entry of a `properties` map. `ctx` points at the property.
  pub fn resolve_property(
    &self,
    name: &str,
    schema: &Schema,
    required: bool,
    ctx: &ResolveContext<'_>,
  ) -> Result<Property, EngineError> {
    let ty = self.resolve_type(schema, ctx)?;
    Ok(build_property(name, schema, ty, required))
  }
}

/// Enums are modelled for string, integer and untyped schemas; other enums stay
/// scalars with an enum validation rule.
pub(crate) fn is_enum_schema(schema: &Schema) -> bool {
  schema.has_enum_values()
    && schema.schema_type.as_ref().is_none_or(|types| {
      matches!(types.non_null(), Some(SchemaType::String | SchemaType::Integer))
    })
}

/// Assembles a [`Property`] around an already resolved type. An optional
/// property is always nullable; a required one only when the schema says so.
pub(crate) fn build_property(name: &str, schema: &Schema, ty: TypeDescriptor, required: bool) -> Property {
  let ty = ty.or_nullable(!required);
  Property {
    name: name.to_string(),
    validation_rules: validation_rules(schema, &ty),
    ty,
    required,
    description: schema.description.clone(),
    default_value: schema.default_value.clone(),
    deprecated: schema.deprecated.unwrap_or(false),
    read_only: schema.read_only.unwrap_or(false),
    write_only: schema.write_only.unwrap_or(false),
  }
}

/// Constraints in a fixed order: pattern, enum, range, multipleOf, length,
/// item count, uniqueness.
pub(crate) fn validation_rules(schema: &Schema, ty: &TypeDescriptor) -> Vec<ValidationRule> {
  let mut rules = vec![];

  if let Some(pattern) = &schema.pattern {
    rules.push(ValidationRule::Pattern {
      pattern: pattern.clone(),
    });
  }

  if schema.has_enum_values() && ty.enum_values().is_none() {
    rules.push(ValidationRule::Enum {
      values: schema.enum_values.clone(),
    });
  } else if let Some(value) = &schema.const_value {
    rules.push(ValidationRule::Enum {
      values: vec![value.clone()],
    });
  }

  let (minimum, exclusive_minimum) = bound(schema.minimum.as_ref(), schema.exclusive_minimum.as_ref());
  let (maximum, exclusive_maximum) = bound(schema.maximum.as_ref(), schema.exclusive_maximum.as_ref());
  if minimum.is_some() || maximum.is_some() {
    rules.push(ValidationRule::Range {
      minimum,
      maximum,
      exclusive_minimum,
      exclusive_maximum,
    });
  }

  if let Some(value) = &schema.multiple_of {
    rules.push(ValidationRule::MultipleOf { value: value.clone() });
  }

  if schema.min_length.is_some() || schema.max_length.is_some() {
    rules.push(ValidationRule::Length {
      min: schema.min_length,
      max: schema.max_length,
    });
  }

  if schema.min_items.is_some() || schema.max_items.is_some() {
    rules.push(ValidationRule::ItemCount {
      min: schema.min_items,
      max: schema.max_items,
    });
  }

  if schema.unique_items == Some(true) {
    rules.push(ValidationRule::UniqueItems);
  }

  rules
}

/// Folds the 3.0 boolean and 3.1 numeric forms of `exclusiveMinimum`/`exclusiveMaximum`.
fn bound(inclusive: Option<&Number>, exclusive: Option<&ExclusiveBound>) -> (Option<Number>, bool) {
  match exclusive {
    Some(ExclusiveBound::Value(value)) => (Some(value.clone()), true),
    Some(ExclusiveBound::Flag(flag)) => (inclusive.cloned(), *flag && inclusive.is_some()),
    None => (inclusive.cloned(), false),
  }
}
