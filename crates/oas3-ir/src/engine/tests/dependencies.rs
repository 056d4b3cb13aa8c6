use petgraph::{algo::is_cyclic_directed, graphmap::DiGraphMap};
use serde_json::json;

use super::support::{analyze, analyze_with, document_with_schemas, ref_to};
use crate::{engine::EngineConfig, ir::InternalModel};

fn cyclic_schemas() -> serde_json::Value {
  json!({
    "A": { "type": "object", "properties": { "b": ref_to("B") } },
    "B": { "type": "object", "properties": { "a": ref_to("A"), "c": ref_to("C") } },
    "C": { "type": "object", "properties": { "id": { "type": "string" } } },
    "Outside": { "type": "object", "properties": { "a": ref_to("A") } },
    "Node": { "type": "object", "properties": { "next": ref_to("Node") } },
    "Tree": { "type": "array", "items": ref_to("Tree") },
    "Expr": { "oneOf": [ref_to("Literal"), ref_to("Sum")] },
    "Literal": { "type": "number" },
    "Sum": {
      "type": "object",
      "properties": {
        "left": ref_to("Expr"),
        "right": ref_to("Expr"),
        "meta": { "type": "object", "properties": { "owner": ref_to("Sum") } }
      }
    }
  })
}

fn dependency_graph(model: &InternalModel) -> DiGraphMap<&str, ()> {
  let mut graph = DiGraphMap::new();
  for (name, schema) in &model.schemas {
    graph.add_node(name.as_str());
    for dependency in &schema.dependencies {
      graph.add_edge(name.as_str(), dependency.as_str(), ());
    }
  }
  graph
}

fn assert_dependencies_render_first(model: &InternalModel) {
  let mut rendered = model.render_order.clone();
  rendered.sort();
  let mut declared = model.schemas.keys().cloned().collect::<Vec<_>>();
  declared.sort();
  assert_eq!(rendered, declared, "every model is rendered exactly once");

  let position = |name: &str| model.render_order.iter().position(|n| n == name).expect("rendered");
  for (name, schema) in &model.schemas {
    for dependency in &schema.dependencies {
      assert!(
        position(dependency) < position(name),
        "{dependency} must render before {name}"
      );
    }
  }
}

#[test]
fn test_dependencies_are_acyclic() {
  let document = document_with_schemas(cyclic_schemas());

  for config in [
    EngineConfig::default(),
    EngineConfig::builder().hoist_inline_objects(true).build(),
  ] {
    let (model, _) = analyze_with(&document, config);
    assert!(!is_cyclic_directed(&dependency_graph(&model)), "failed for config {config:?}");
    assert_dependencies_render_first(&model);

    for schema in model.schemas.values() {
      assert!(
        !schema.dependencies.contains(&schema.name),
        "{} depends on itself",
        schema.name
      );
    }
  }
}

#[test]
fn test_mutual_reference_is_split() {
  let document = document_with_schemas(cyclic_schemas());
  let (model, _) = analyze(&document);

  let cases = [
    ("A", vec![], vec!["B"]),
    ("B", vec!["A", "C"], vec![]),
    ("C", vec![], vec![]),
    ("Outside", vec!["A"], vec![]),
    ("Node", vec![], vec!["Node"]),
    ("Tree", vec![], vec!["Tree"]),
    ("Expr", vec!["Literal"], vec!["Sum"]),
    ("Sum", vec!["Expr"], vec![]),
  ];
  for (name, dependencies, cyclic_references) in cases {
    let schema = model.schema(name).expect("model");
    assert_eq!(schema.dependencies, dependencies, "failed for schema {name:?}");
    assert_eq!(schema.cyclic_references, cyclic_references, "failed for schema {name:?}");
  }
}

#[test]
fn test_hoisted_models_join_the_cycle() {
  let document = document_with_schemas(cyclic_schemas());
  let (model, _) = analyze_with(&document, EngineConfig::builder().hoist_inline_objects(true).build());

  let sum = model.schema("Sum").expect("Sum");
  let meta = model.schema("SumMeta").expect("SumMeta");
  assert!(meta.synthetic);
  assert_eq!(sum.dependencies, ["Expr"]);
  assert_eq!(sum.cyclic_references, ["SumMeta"]);
  assert_eq!(meta.dependencies, ["Sum"]);
}

#[test]
fn test_render_order_chain() {
  let document = document_with_schemas(json!({
    "Order": { "type": "object", "properties": { "customer": ref_to("Customer") } },
    "Customer": { "type": "object", "properties": { "address": ref_to("Address") } },
    "Address": { "type": "object", "properties": { "city": { "type": "string" } } },
    "Standalone": { "type": "string" }
  }));
  let (model, _) = analyze(&document);

  assert_eq!(model.render_order, ["Address", "Customer", "Order", "Standalone"]);
  assert_eq!(
    model.ordered_schemas().map(|s| s.name.as_str()).collect::<Vec<_>>(),
    model.render_order
  );
}

#[test]
fn test_union_and_base_references_are_dependencies() {
  let document = document_with_schemas(json!({
    "Shape": { "anyOf": [ref_to("Circle"), ref_to("Square")] },
    "Circle": {
      "allOf": [ref_to("Base")],
      "type": "object",
      "properties": { "radius": { "type": "number" } }
    },
    "Square": { "allOf": [ref_to("Base")], "properties": { "side": { "type": "number" } } },
    "Base": { "type": "object", "properties": { "id": { "type": "string" } } },
    "Labels": { "type": "object", "additionalProperties": ref_to("Base") }
  }));
  let (model, _) = analyze(&document);

  assert_eq!(model.schema("Shape").expect("Shape").dependencies, ["Circle", "Square"]);
  assert_eq!(model.schema("Circle").expect("Circle").dependencies, ["Base"]);
  assert_eq!(model.schema("Square").expect("Square").dependencies, ["Base"]);
  assert_eq!(model.schema("Labels").expect("Labels").dependencies, ["Base"]);
  assert_dependencies_render_first(&model);
}

#[test]
fn test_analysis_is_deterministic() {
  let document = document_with_schemas(cyclic_schemas());
  let config = EngineConfig::builder().hoist_inline_objects(true).build();

  let first = analyze_with(&document, config);
  let second = analyze_with(&document, config);
  assert_eq!(first, second);
  assert_eq!(
    serde_json::to_string(&first.0).expect("serializes"),
    serde_json::to_string(&second.0).expect("serializes")
  );
}
