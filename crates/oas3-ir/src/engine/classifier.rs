use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::{SchemaGraph, composition::object_member_count};
use crate::{document::Schema, ir::SpecialCase};

/// Tags a named schema with every special case it exhibits.
pub fn classify(name: &str, graph: &SchemaGraph<'_>) -> BTreeSet<SpecialCase> {
  let Some(schema) = graph.schema(name) else {
    return BTreeSet::new();
  };

  let mut cases = classify_schema(schema, graph);
  if graph.is_cyclic(name) {
    cases.insert(SpecialCase::CircularReference);
  }
  if graph.is_recursive(name) {
    cases.insert(SpecialCase::RecursiveSchema);
  }
  cases
}

/// Tags of every named schema, in declaration order.
pub fn classify_all<'a>(graph: &SchemaGraph<'a>) -> IndexMap<&'a str, BTreeSet<SpecialCase>> {
  graph
    .names()
    .map(|name| {
      let cases = classify(name, graph);
      if !cases.is_empty() {
        tracing::debug!(schema = name, cases = ?cases, "classified schema");
      }
      (name, cases)
    })
    .collect()
}

/// The structural tags, which need no knowledge of where the schema sits in the
/// reference graph. Also used for inline schemas hoisted into their own models.
pub(crate) fn classify_schema(schema: &Schema, graph: &SchemaGraph<'_>) -> BTreeSet<SpecialCase> {
  let mut cases = BTreeSet::new();

  if schema.has_union() {
    if schema.has_discriminator_mapping() {
      cases.insert(SpecialCase::DiscriminatedUnion);
    } else {
      cases.insert(SpecialCase::AmbiguousUnion);
    }
  }

  if is_polymorphic_array(schema, graph) || schema.properties.values().any(|prop| is_polymorphic_array(prop, graph)) {
    cases.insert(SpecialCase::PolymorphicArray);
  }

  if schema.has_open_additional_properties() && !schema.properties.is_empty() {
    cases.insert(SpecialCase::DynamicProperties);
  }

  if object_member_count(graph, schema) > 1 {
    cases.insert(SpecialCase::MultipleComposition);
  }

  if schema.is_conditional() {
    cases.insert(SpecialCase::ConditionalSchema);
  }

  cases
}

/// An array whose items are a union, a reference to a union, or a reference to
/// a schema carrying a discriminator.
fn is_polymorphic_array(schema: &Schema, graph: &SchemaGraph<'_>) -> bool {
  if !schema.is_array() {
    return false;
  }
  let Some(items) = schema.items.as_deref() else {
    return false;
  };
  if items.has_union() {
    return true;
  }

  items
    .ref_path()
    .and_then(|ref_path| graph.lookup_ref(ref_path))
    .and_then(|name| graph.schema(name))
    .is_some_and(|target| target.has_union() || target.discriminator.is_some())
}
