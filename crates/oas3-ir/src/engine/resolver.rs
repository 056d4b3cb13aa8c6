use std::collections::{BTreeSet, HashMap};

use indexmap::{IndexMap, IndexSet};
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use super::{EngineError, ResolveContext};
use crate::document::{Document, Schema, refs::parse_mapping_target, parse_schema_ref_path};

/// One named component schema and the references leaving it.
#[derive(Debug, Clone)]
pub struct SchemaNode<'a> {
  pub name: &'a str,
  pub pointer: String,
  pub schema: &'a Schema,
  /// Every schema referenced from anywhere inside this one, first-seen order.
  pub references: IndexSet<&'a str>,
  /// References reached through properties, items, additionalProperties or allOf.
  pub property_references: IndexSet<&'a str>,
}

/// The resolved reference graph of `components.schemas`.
///
/// Node names borrow the document's own keys, so a reference is always a
/// `&str` equal to the key it resolved to.
#[derive(Debug)]
pub struct SchemaGraph<'a> {
  components: &'a IndexMap<String, Schema>,
  nodes: IndexMap<&'a str, SchemaNode<'a>>,
  component_ids: HashMap<&'a str, usize>,
  cyclic: BTreeSet<&'a str>,
  recursive: BTreeSet<&'a str>,
  cycle_details: Vec<Vec<String>>,
}

/// Builds the reference graph of a document, validating every `$ref` under
/// `components.schemas` and every discriminator mapping value.
pub fn resolve(document: &Document) -> Result<SchemaGraph<'_>, EngineError> {
  SchemaGraph::build(document)
}

impl<'a> SchemaGraph<'a> {
  pub fn build(document: &'a Document) -> Result<Self, EngineError> {
    let components = document.schemas();
    let mut graph = Self {
      components,
      nodes: IndexMap::with_capacity(components.len()),
      component_ids: HashMap::new(),
      cyclic: BTreeSet::new(),
      recursive: BTreeSet::new(),
      cycle_details: vec![],
    };

    for (name, schema) in components {
      let node = graph.collect_node(name, schema)?;
      graph.nodes.insert(name.as_str(), node);
    }

    graph.compute_components();
    graph.cycle_details = graph.detect_cycles();
    graph.compute_recursive();

    tracing::debug!(
      schemas = graph.nodes.len(),
      cyclic = graph.cyclic.len(),
      recursive = graph.recursive.len(),
      "resolved schema graph"
    );

    Ok(graph)
  }

  /// Maps a `$ref` to the name of the component it points at.
  pub fn lookup_ref(&self, ref_path: &str) -> Option<&'a str> {
    let name = parse_schema_ref_path(ref_path)?;
    self.lookup_name(&name)
  }

  /// Maps a discriminator mapping value (pointer or bare name) to a component name.
  pub fn lookup_mapping(&self, value: &str) -> Option<&'a str> {
    let name = parse_mapping_target(value)?;
    self.lookup_name(&name)
  }

  fn lookup_name(&self, name: &str) -> Option<&'a str> {
    self.components.get_key_value(name).map(|(key, _)| key.as_str())
  }

  pub fn node(&self, name: &str) -> Option<&SchemaNode<'a>> {
    self.nodes.get(name)
  }

  pub fn schema(&self, name: &str) -> Option<&'a Schema> {
    self.nodes.get(name).map(|node| node.schema)
  }

  /// Nodes in declaration order.
  pub fn nodes(&self) -> impl Iterator<Item = &SchemaNode<'a>> {
    self.nodes.values()
  }

  pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
    self.nodes.keys().copied()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Schemas lying on at least one reference cycle.
  pub fn cycles(&self) -> &BTreeSet<&'a str> {
    &self.cyclic
  }

  pub fn is_cyclic(&self, name: &str) -> bool {
    self.cyclic.contains(name)
  }

  /// Schemas that can contain themselves through a property chain.
  pub fn is_recursive(&self, name: &str) -> bool {
    self.recursive.contains(name)
  }

  /// The concrete cycles found by depth-first traversal, for diagnostics.
  pub fn cycle_details(&self) -> &[Vec<String>] {
    &self.cycle_details
  }

  /// True when both schemas belong to the same strongly connected component.
  pub fn same_component(&self, a: &str, b: &str) -> bool {
    match (self.component_ids.get(a), self.component_ids.get(b)) {
      (Some(x), Some(y)) => x == y,
      _ => false,
    }
  }

  fn collect_node(&self, name: &'a str, schema: &'a Schema) -> Result<SchemaNode<'a>, EngineError> {
    let ctx = ResolveContext::for_schema(name);
    let mut node = SchemaNode {
      name,
      pointer: ctx.pointer().to_string(),
      schema,
      references: IndexSet::new(),
      property_references: IndexSet::new(),
    };

    self.collect_refs(schema, &ctx, false, &mut node)?;

    if let Some(discriminator) = &schema.discriminator {
      let mapping_ctx = ctx.child("discriminator").child("mapping");
      for (value, target) in &discriminator.mapping {
        let resolved = self
          .lookup_mapping(target)
          .ok_or_else(|| mapping_ctx.child(value).unresolved(target))?;
        node.references.insert(resolved);
      }
    }

    Ok(node)
  }

  /// Walks every subschema, recording `$ref` targets. `through_property` is set
  /// once the walk has entered a properties, items, additionalProperties or
  /// allOf subtree.
  fn collect_refs(
    &self,
    schema: &'a Schema,
    ctx: &ResolveContext<'_>,
    through_property: bool,
    node: &mut SchemaNode<'a>,
  ) -> Result<(), EngineError> {
    if let Some(ref_path) = schema.ref_path() {
      let target = self.lookup_ref(ref_path).ok_or_else(|| ctx.unresolved(ref_path))?;
      node.references.insert(target);
      if through_property {
        node.property_references.insert(target);
      }
    }

    for (prop_name, prop_schema) in &schema.properties {
      self.collect_refs(prop_schema, &ctx.child("properties").child(prop_name), true, node)?;
    }
    if let Some(items) = &schema.items {
      self.collect_refs(items, &ctx.child("items"), true, node)?;
    }
    if let Some(additional) = schema.additional_properties.as_ref().and_then(|ap| ap.schema()) {
      self.collect_refs(additional, &ctx.child("additionalProperties"), true, node)?;
    }
    for (i, member) in schema.all_of.iter().enumerate() {
      self.collect_refs(member, &ctx.child("allOf").child(i), true, node)?;
    }
    for (i, member) in schema.one_of.iter().enumerate() {
      self.collect_refs(member, &ctx.child("oneOf").child(i), through_property, node)?;
    }
    for (i, member) in schema.any_of.iter().enumerate() {
      self.collect_refs(member, &ctx.child("anyOf").child(i), through_property, node)?;
    }

    let conditionals = [
      ("if", schema.if_schema.as_deref()),
      ("then", schema.then_schema.as_deref()),
      ("else", schema.else_schema.as_deref()),
    ];
    for (keyword, branch) in conditionals {
      if let Some(branch) = branch {
        self.collect_refs(branch, &ctx.child(keyword), through_property, node)?;
      }
    }

    Ok(())
  }

  fn reference_graph(&self) -> DiGraphMap<&'a str, ()> {
    let mut graph = DiGraphMap::new();
    for (name, node) in &self.nodes {
      graph.add_node(*name);
      for target in &node.references {
        graph.add_edge(*name, *target, ());
      }
    }
    graph
  }

  fn compute_components(&mut self) {
    let graph = self.reference_graph();
    for (id, component) in kosaraju_scc(&graph).into_iter().enumerate() {
      let on_cycle = component.len() > 1 || graph.contains_edge(component[0], component[0]);
      for name in component {
        self.component_ids.insert(name, id);
        if on_cycle {
          self.cyclic.insert(name);
        }
      }
    }
  }

  fn compute_recursive(&mut self) {
    let recursive = self
      .nodes
      .values()
      .filter(|node| {
        node
          .property_references
          .iter()
          .any(|target| *target == node.name || self.same_component(node.name, target))
      })
      .map(|node| node.name)
      .collect();
    self.recursive = recursive;
  }

  /// Depth-first traversal with a per-traversal path stack; reports each back
  /// edge as the path segment it closes.
  fn detect_cycles(&self) -> Vec<Vec<String>> {
    let mut visited = BTreeSet::new();
    let mut rec_stack = BTreeSet::new();
    let mut path = vec![];
    let mut cycles = vec![];

    for name in self.nodes.keys() {
      if !visited.contains(name) {
        self.dfs_detect_cycle(*name, &mut visited, &mut rec_stack, &mut path, &mut cycles);
      }
    }

    for cycle in &cycles {
      tracing::debug!(cycle = %cycle.join(" -> "), "reference cycle");
    }
    cycles
  }

  fn dfs_detect_cycle(
    &self,
    node: &'a str,
    visited: &mut BTreeSet<&'a str>,
    rec_stack: &mut BTreeSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
  ) {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(schema_node) = self.nodes.get(node) {
      for dep in &schema_node.references {
        if !visited.contains(dep) {
          self.dfs_detect_cycle(*dep, visited, rec_stack, path, cycles);
        } else if rec_stack.contains(dep)
          && let Some(cycle_start) = path.iter().position(|n| n == dep)
        {
          cycles.push(path[cycle_start..].iter().map(ToString::to_string).collect());
        }
      }
    }

    path.pop();
    rec_stack.remove(node);
  }
}
