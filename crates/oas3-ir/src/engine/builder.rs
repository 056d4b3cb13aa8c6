use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap, visit::DfsPostOrder};

use super::{
  AnalysisStats, AnalysisWarning, EngineConfig, EngineError, ResolveContext, SchemaGraph, TypeResolver,
  classifier::classify_schema,
  composition::{MergeAccumulator, check_all_of},
  endpoints::build_endpoints,
  names::NameTable,
  strategy::select_strategy,
  type_resolver::{build_property, is_enum_schema},
};
use crate::{
  document::{AdditionalProperties, Document, Schema},
  ir::{
    DiscriminatorInfo, InfoModel, InheritanceKind, InheritanceStrategy, InternalModel, ScalarType, SchemaModel,
    SpecialCase, TypeDescriptor,
  },
  naming::{ensure_unique, to_type_identifier},
};

/// Assembles the [`InternalModel`] from a resolved graph and its classifications.
///
/// Named schemas are built in declaration order; hoisted inline objects follow
/// their owner, and hoisted endpoint bodies come last. Once every model exists,
/// discriminator members are linked to their unions, union strategies are
/// chosen and dependencies are made acyclic.
pub fn build<'a>(
  document: &'a Document,
  graph: &SchemaGraph<'a>,
  classifications: &IndexMap<&'a str, BTreeSet<SpecialCase>>,
  config: &EngineConfig,
  stats: &mut AnalysisStats,
) -> Result<InternalModel, EngineError> {
  let names = NameTable::build(graph)?;
  let mut builder = ModelBuilder::new(graph, &names, classifications, config);

  let mut schemas = builder.build_schemas(stats)?;
  let (endpoints, body_models) = build_endpoints(document, &mut builder)?;
  for model in body_models {
    schemas.insert(model.name.clone(), model);
  }

  apply_discriminators(&mut schemas, stats);
  for model in schemas.values_mut() {
    model.union_strategy = select_strategy(model);
  }
  let render_order = link_dependencies(&mut schemas);

  stats.record_models(schemas.values());
  stats.record_endpoints(&endpoints);

  Ok(InternalModel {
    info: InfoModel {
      title: document.info.title.clone(),
      version: document.info.version.clone(),
      description: document.info.description.clone(),
    },
    schemas,
    endpoints,
    render_order,
  })
}

pub(crate) struct ModelBuilder<'g, 'a> {
  graph: &'g SchemaGraph<'a>,
  names: &'g NameTable<'a>,
  classifications: &'g IndexMap<&'a str, BTreeSet<SpecialCase>>,
  resolver: TypeResolver<'g, 'a>,
  hoist_inline_objects: bool,
  used: BTreeSet<String>,
}

impl<'g, 'a> ModelBuilder<'g, 'a> {
  pub(crate) fn new(
    graph: &'g SchemaGraph<'a>,
    names: &'g NameTable<'a>,
    classifications: &'g IndexMap<&'a str, BTreeSet<SpecialCase>>,
    config: &EngineConfig,
  ) -> Self {
    Self {
      graph,
      names,
      classifications,
      resolver: TypeResolver::new(graph, names, config),
      hoist_inline_objects: config.hoist_inline_objects,
      used: names.identifiers().map(ToString::to_string).collect(),
    }
  }

  pub(crate) fn resolver(&self) -> &TypeResolver<'g, 'a> {
    &self.resolver
  }

  fn build_schemas(&mut self, stats: &mut AnalysisStats) -> Result<IndexMap<String, SchemaModel>, EngineError> {
    let graph = self.graph;
    let mut schemas = IndexMap::with_capacity(graph.len());

    for node in graph.nodes() {
      let (model, hoisted) = self.build_named(node.name, node.schema)?;
      if model.is_union() && model.discriminator.is_none() {
        stats.record_warning(AnalysisWarning::HeuristicUnion {
          schema_name: node.name.to_string(),
        });
      }
      schemas.insert(model.name.clone(), model);
      for model in hoisted {
        schemas.insert(model.name.clone(), model);
      }
    }

    Ok(schemas)
  }

  fn build_named(&mut self, name: &'a str, schema: &'a Schema) -> Result<(SchemaModel, Vec<SchemaModel>), EngineError> {
    let ctx = ResolveContext::for_schema(name);
    let identifier = self
      .names
      .identifier(name)
      .map_or_else(|| to_type_identifier(name), ToString::to_string);

    let mut model = SchemaModel::new(identifier, name);
    model.description = schema.description.clone();
    model.special_cases = self.classifications.get(name).cloned().unwrap_or_default();

    let mut hoisted = vec![];
    self.fill_model(&mut model, schema, &ctx, &mut hoisted)?;

    tracing::debug!(
      schema = name,
      model = %model.name,
      inheritance = %model.inheritance.kind,
      properties = model.properties.len(),
      "built schema model"
    );
    Ok((model, hoisted))
  }

  fn fill_model(
    &mut self,
    model: &mut SchemaModel,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<(), EngineError> {
    if schema.has_union() {
      return self.fill_union(model, schema, ctx, hoisted);
    }
    if schema.has_intersection() {
      return self.fill_composition(model, schema, ctx, hoisted);
    }
    if is_enum_schema(schema) {
      model.is_enum = true;
      model.enum_values.clone_from(&schema.enum_values);
      return Ok(());
    }
    if is_object_model(schema) {
      self.fill_own_properties(model, schema, ctx, hoisted)?;
      self.fill_conditional_properties(model, schema, ctx, hoisted)?;
      return self.fill_additional(model, schema.additional_properties.as_ref(), &ctx.child("additionalProperties"));
    }

    model.aliased_type = Some(self.resolver.resolve_type(schema, ctx)?);
    Ok(())
  }

  fn fill_union(
    &mut self,
    model: &mut SchemaModel,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<(), EngineError> {
    let (mut members, has_null) = self.resolver.resolve_union_members(schema, ctx)?;
    let discriminated = model.has_special_case(SpecialCase::DiscriminatedUnion);

    if members.len() == 1 && !discriminated {
      let only = members.swap_remove(0);
      model.aliased_type = Some(only.or_nullable(has_null || schema.is_nullable()));
      model.special_cases.remove(&SpecialCase::AmbiguousUnion);
    } else {
      model.union_members = members;
    }

    match schema.discriminator.as_ref().filter(|_| discriminated) {
      Some(discriminator) => {
        let mapping_ctx = ctx.child("discriminator").child("mapping");
        let mut value_to_schema_name = IndexMap::with_capacity(discriminator.mapping.len());
        for (value, target) in &discriminator.mapping {
          let member = self
            .graph
            .lookup_mapping(target)
            .and_then(|name| self.names.identifier(name))
            .ok_or_else(|| mapping_ctx.child(value).unresolved(target))?;
          value_to_schema_name.insert(value.clone(), member.to_string());
        }
        model.discriminator = Some(DiscriminatorInfo {
          property_name: discriminator.property_name.clone(),
          value_to_schema_name,
          required: true,
        });
        model.inheritance = InheritanceStrategy::interface_impl(model.name.clone());
      }
      None => {
        let composed = model
          .union_members
          .iter()
          .filter_map(TypeDescriptor::reference_name)
          .map(ToString::to_string)
          .collect::<Vec<_>>();
        if !composed.is_empty() {
          model.inheritance = InheritanceStrategy::composition(composed);
        }
      }
    }

    if !schema.properties.is_empty() {
      self.fill_own_properties(model, schema, ctx, hoisted)?;
    }
    Ok(())
  }

  fn fill_composition(
    &mut self,
    model: &mut SchemaModel,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<(), EngineError> {
    let shapes = check_all_of(self.graph, schema, ctx)?;
    let object_members = schema
      .all_of
      .iter()
      .enumerate()
      .zip(shapes)
      .filter(|(_, shape)| shape.is_object())
      .map(|(member, _)| member)
      .collect::<Vec<_>>();

    if object_members.is_empty() && schema.properties.is_empty() {
      model.aliased_type = Some(self.resolver.resolve_type(schema, ctx)?);
      return Ok(());
    }

    if let [(i, base)] = object_members.as_slice()
      && let Some(ref_path) = base.ref_path()
    {
      let base_name = self.resolver.model_name(ref_path, &ctx.child("allOf").child(i))?;
      model.inheritance = InheritanceStrategy::abstract_base(base_name);
      self.fill_own_properties(model, schema, ctx, hoisted)?;
      self.fill_conditional_properties(model, schema, ctx, hoisted)?;
      return self.fill_additional(model, schema.additional_properties.as_ref(), &ctx.child("additionalProperties"));
    }

    let mut acc = MergeAccumulator::default();
    acc.flatten(self.graph, schema, ctx.pointer(), ctx, &mut vec![])?;
    model.inheritance = InheritanceStrategy::all_of_flattening();

    let entries = acc
      .properties
      .iter()
      .map(|(name, merged)| (*name, merged.schema, ResolveContext::at(ctx.owner(), merged.pointer.clone())))
      .collect::<Vec<_>>();
    self.fill_properties(model, entries, |name| acc.required.contains(name), hoisted)?;
    self.fill_conditional_properties(model, schema, ctx, hoisted)?;

    match &acc.additional_properties {
      Some((additional, pointer)) => {
        self.fill_additional(model, Some(*additional), &ResolveContext::at(ctx.owner(), pointer.clone()))
      }
      None => Ok(()),
    }
  }

  fn fill_own_properties(
    &mut self,
    model: &mut SchemaModel,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<(), EngineError> {
    let properties_ctx = ctx.child("properties");
    let entries = schema
      .properties
      .iter()
      .map(|(name, prop)| (name.as_str(), prop, properties_ctx.child(name)))
      .collect::<Vec<_>>();
    self.fill_properties(model, entries, |name| schema.required.iter().any(|r| r == name), hoisted)
  }

  /// Adds the properties of `then`/`else` branches as optional properties.
  /// Properties the schema declares itself are kept; between branches the later
  /// declaration wins and keeps the first slot.
  fn fill_conditional_properties(
    &mut self,
    model: &mut SchemaModel,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<(), EngineError> {
    let declared = model.properties.len();
    let branches = [("then", schema.then_schema.as_deref()), ("else", schema.else_schema.as_deref())];
    for (keyword, branch) in branches {
      let Some(branch) = branch else {
        continue;
      };
      let properties_ctx = ctx.child(keyword).child("properties");
      for (name, prop) in &branch.properties {
        let ty = self.property_type(&model.name, name, prop, &properties_ctx.child(name), hoisted)?;
        let property = build_property(name, prop, ty, false);
        match model.properties.iter().position(|p| p.name == *name) {
          Some(i) if i < declared => {}
          Some(i) => model.properties[i] = property,
          None => model.properties.push(property),
        }
      }
    }
    Ok(())
  }

  fn fill_properties<'c>(
    &mut self,
    model: &mut SchemaModel,
    entries: Vec<(&'a str, &'a Schema, ResolveContext<'c>)>,
    is_required: impl Fn(&str) -> bool,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<(), EngineError> {
    for (name, schema, prop_ctx) in entries {
      let ty = self.property_type(&model.name, name, schema, &prop_ctx, hoisted)?;
      model.properties.push(build_property(name, schema, ty, is_required(name)));
    }
    Ok(())
  }

  fn fill_additional(
    &self,
    model: &mut SchemaModel,
    additional: Option<&AdditionalProperties>,
    ctx: &ResolveContext<'_>,
  ) -> Result<(), EngineError> {
    if let Some(additional) = additional {
      model.additional_properties = self.resolver.additional_properties_type(additional, ctx)?;
    }
    Ok(())
  }

  /// Resolves a property's type, hoisting an inline object (or the inline
  /// object items of an array) into a synthetic model when enabled.
  fn property_type(
    &mut self,
    owner: &str,
    property: &str,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<TypeDescriptor, EngineError> {
    if self.hoist_inline_objects {
      let base = format!("{owner}{}", to_type_identifier(property));
      if is_hoistable(schema) {
        let name = self.hoist(&base, schema, ctx, hoisted)?;
        return Ok(TypeDescriptor::reference(name).or_nullable(schema.is_nullable()));
      }
      if schema.is_array()
        && let Some(items) = schema.items.as_deref()
        && is_hoistable(items)
      {
        let name = self.hoist(&format!("{base}Item"), items, &ctx.child("items"), hoisted)?;
        let item_type = TypeDescriptor::reference(name).or_nullable(items.is_nullable());
        return Ok(TypeDescriptor::array(item_type).or_nullable(schema.is_nullable()));
      }
    }
    self.resolver.resolve_type(schema, ctx)
  }

  /// Resolves a request or response body, hoisting an inline object to `name`
  /// when enabled.
  pub(crate) fn body_type(
    &mut self,
    name: &str,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<TypeDescriptor, EngineError> {
    if self.hoist_inline_objects && is_hoistable(schema) {
      let name = self.hoist(name, schema, ctx, hoisted)?;
      return Ok(TypeDescriptor::reference(name).or_nullable(schema.is_nullable()));
    }
    self.resolver.resolve_type(schema, ctx)
  }

  /// Builds a synthetic model for an inline object. The model and anything
  /// hoisted from inside it are appended to `hoisted`, outermost first.
  fn hoist(
    &mut self,
    base: &str,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    hoisted: &mut Vec<SchemaModel>,
  ) -> Result<String, EngineError> {
    let name = ensure_unique(base, &self.used);
    self.used.insert(name.clone());

    let mut model = SchemaModel::new(name.clone(), ctx.pointer());
    model.synthetic = true;
    model.description = schema.description.clone();
    model.special_cases = classify_schema(schema, self.graph);

    let mut nested = vec![];
    self.fill_model(&mut model, schema, ctx, &mut nested)?;
    tracing::debug!(model = %name, pointer = ctx.pointer(), "hoisted inline object");

    hoisted.push(model);
    hoisted.extend(nested);
    Ok(name)
  }
}

fn is_object_model(schema: &Schema) -> bool {
  schema.is_object() || (schema.schema_type.is_none() && schema.additional_properties.is_some())
}

fn is_hoistable(schema: &Schema) -> bool {
  schema.is_object() && !schema.properties.is_empty() && !schema.has_union() && !schema.has_intersection()
}

/// Links every member of a discriminated union back to the union: the member
/// lists the union in `implements` and its discriminator property becomes
/// required. A property inherited through `abstractBase` is forced on the base
/// that declares it; otherwise it is synthesised as a string on the member.
fn apply_discriminators(schemas: &mut IndexMap<String, SchemaModel>, stats: &mut AnalysisStats) {
  let unions = schemas
    .values()
    .filter_map(|model| model.discriminator.clone().map(|info| (model.name.clone(), info)))
    .collect::<Vec<_>>();

  for (union_name, info) in unions {
    for (value, member_name) in &info.value_to_schema_name {
      if *member_name == union_name {
        continue;
      }
      let inherited_from = schemas
        .get(member_name)
        .filter(|member| member.property(&info.property_name).is_none())
        .and_then(|member| declaring_base(schemas, member, &info.property_name));
      let Some(member) = schemas.get_mut(member_name) else {
        continue;
      };
      if member.is_union() || member.is_enum || member.aliased_type.is_some() {
        stats.record_warning(AnalysisWarning::DiscriminatorMemberNotObject {
          schema_name: union_name.clone(),
          value: value.clone(),
          member: member_name.clone(),
        });
        continue;
      }

      if !member.implements.contains(&union_name) {
        member.implements.push(union_name.clone());
      }

      let holder = inherited_from.as_ref().unwrap_or(member_name);
      let Some(holder) = schemas.get_mut(holder) else {
        continue;
      };
      match holder.properties.iter_mut().find(|p| p.name == info.property_name) {
        Some(property) => {
          property.required = true;
          property.ty.nullable = false;
        }
        None => holder.properties.push(build_property(
          &info.property_name,
          &Schema::default(),
          TypeDescriptor::scalar(ScalarType::String),
          true,
        )),
      }
    }
  }
}

/// Follows the `abstractBase` chain above `member` and returns the first base
/// that declares `property`.
fn declaring_base(schemas: &IndexMap<String, SchemaModel>, member: &SchemaModel, property: &str) -> Option<String> {
  let mut seen = BTreeSet::new();
  let mut current = member;
  while current.inheritance.kind == InheritanceKind::AbstractBase {
    let base_name = current.inheritance.base_or_interface_name.as_deref()?;
    if !seen.insert(base_name) {
      return None;
    }
    let base = schemas.get(base_name)?;
    if base.property(property).is_some() {
      return Some(base_name.to_string());
    }
    current = base;
  }
  None
}

/// Fills `dependencies` and `cyclic_references` so that the dependency graph is
/// acyclic, and returns the render order.
///
/// Inside a strongly connected group of models, an edge to a model declared
/// later is recorded as a cyclic reference instead of a dependency. Every cycle
/// needs at least one such edge, so none survive.
fn link_dependencies(schemas: &mut IndexMap<String, SchemaModel>) -> Vec<String> {
  let links = {
    let position = schemas
      .keys()
      .enumerate()
      .map(|(i, name)| (name.as_str(), i))
      .collect::<HashMap<_, _>>();

    let mut graph = DiGraphMap::<&str, ()>::new();
    for (name, model) in schemas.iter() {
      graph.add_node(name.as_str());
      for target in model.referenced_names() {
        if target != name.as_str() && position.contains_key(target) {
          graph.add_edge(name.as_str(), target, ());
        }
      }
    }

    let component = kosaraju_scc(&graph)
      .into_iter()
      .enumerate()
      .flat_map(|(id, members)| members.into_iter().map(move |name| (name, id)))
      .collect::<HashMap<_, _>>();

    schemas
      .iter()
      .map(|(name, model)| {
        let mut dependencies = vec![];
        let mut cyclic_references = vec![];
        for target in model.referenced_names() {
          let breaks_cycle = target == name.as_str()
            || (component.get(target) == component.get(name.as_str())
              && position.get(target) > position.get(name.as_str()));
          if breaks_cycle {
            cyclic_references.push(target.to_string());
          } else if position.contains_key(target) {
            dependencies.push(target.to_string());
          }
        }
        (dependencies, cyclic_references)
      })
      .collect::<Vec<_>>()
  };

  for (model, (dependencies, cyclic_references)) in schemas.values_mut().zip(links) {
    model.dependencies = dependencies;
    model.cyclic_references = cyclic_references;
  }

  render_order(schemas)
}

/// Post-order over `dependencies`, roots taken in declaration order.
fn render_order(schemas: &IndexMap<String, SchemaModel>) -> Vec<String> {
  let mut graph = DiGraphMap::<&str, ()>::new();
  for (name, model) in schemas {
    graph.add_node(name.as_str());
    for dependency in &model.dependencies {
      graph.add_edge(name.as_str(), dependency.as_str(), ());
    }
  }

  let mut order = Vec::with_capacity(schemas.len());
  let mut dfs = DfsPostOrder::empty(&graph);
  for name in schemas.keys() {
    dfs.move_to(name.as_str());
    while let Some(next) = dfs.next(&graph) {
      order.push(next.to_string());
    }
  }
  order
}
