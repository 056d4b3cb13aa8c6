use serde_json::{Number, Value, json};

use super::support::{analyze, document_with_schemas, ref_to};
use crate::{
  document::{Document, Schema},
  engine::{EngineConfig, EngineError, ResolveContext, TypeResolver, names::NameTable, resolve},
  ir::{ScalarType, TypeDescriptor, ValidationRule},
};

fn petstore() -> Document {
  document_with_schemas(json!({
    "Pet": { "type": "object", "properties": { "id": { "type": "integer" } } },
    "Status": { "type": "string", "enum": ["active", "retired"] }
  }))
}

fn schema(value: Value) -> Schema {
  serde_json::from_value(value).expect("valid schema")
}

/// Resolves `value` as if it were the root of a component named `Test`.
fn resolve_with(document: &Document, config: EngineConfig, value: Value) -> Result<TypeDescriptor, EngineError> {
  let graph = resolve(document).expect("resolves");
  let names = NameTable::build(&graph).expect("unique names");
  let resolver = TypeResolver::new(&graph, &names, &config);
  resolver.resolve_type(&schema(value), &ResolveContext::for_schema("Test"))
}

fn resolve_type(value: Value) -> Result<TypeDescriptor, EngineError> {
  resolve_with(&petstore(), EngineConfig::default(), value)
}

fn string() -> TypeDescriptor {
  TypeDescriptor::scalar(ScalarType::String)
}

#[test]
fn test_unknown_type_name_is_any() {
  let document = document_with_schemas(json!({
    "Upload": {
      "type": "object",
      "required": ["file"],
      "properties": {
        "file": { "type": "file", "format": "binary" },
        "kinds": { "type": ["file", "null"] }
      }
    }
  }));
  let (model, _) = analyze(&document);
  let upload = model.schema("Upload").expect("Upload");

  assert_eq!(
    upload.property("file").expect("file").ty,
    TypeDescriptor::scalar_with_format(ScalarType::Any, Some("binary".to_string()))
  );
  assert_eq!(
    upload.property("kinds").expect("kinds").ty,
    TypeDescriptor::scalar(ScalarType::Any).with_nullable(true)
  );
}

#[test]
fn test_scalar_mapping() {
  let cases = [
    (json!({ "type": "string" }), string()),
    (json!({ "type": "integer" }), TypeDescriptor::scalar(ScalarType::Int)),
    (json!({ "type": "number" }), TypeDescriptor::scalar(ScalarType::Float)),
    (json!({ "type": "boolean" }), TypeDescriptor::scalar(ScalarType::Bool)),
    (json!({}), TypeDescriptor::scalar(ScalarType::Any)),
    (json!({ "description": "anything" }), TypeDescriptor::scalar(ScalarType::Any)),
    (json!({ "type": "file" }), TypeDescriptor::scalar(ScalarType::Any)),
    (
      json!({ "type": "integer", "format": "int64" }),
      TypeDescriptor::scalar_with_format(ScalarType::Int, Some("int64".to_string())),
    ),
    (
      json!({ "type": "string", "format": "date-time" }),
      TypeDescriptor::scalar_with_format(ScalarType::String, Some("date-time".to_string())),
    ),
  ];
  for (input, expected) in cases {
    assert_eq!(resolve_type(input.clone()).expect("resolves"), expected, "failed for input {input}");
  }
}

#[test]
fn test_structured_types() {
  let cases = [
    (json!(ref_to("Pet")), TypeDescriptor::reference("Pet")),
    (
      json!({ "type": "array", "items": ref_to("Pet") }),
      TypeDescriptor::array(TypeDescriptor::reference("Pet")),
    ),
    (
      json!({ "type": "array", "items": { "type": "array", "items": { "type": "string" } } }),
      TypeDescriptor::array(TypeDescriptor::array(string())),
    ),
    (
      json!({ "type": "string", "enum": ["b", "a", "c"] }),
      TypeDescriptor::enumeration(vec![json!("b"), json!("a"), json!("c")]),
    ),
    (
      json!({ "type": "integer", "enum": [3, 1] }),
      TypeDescriptor::enumeration(vec![json!(3), json!(1)]),
    ),
    (json!({ "type": "boolean", "enum": [true] }), TypeDescriptor::scalar(ScalarType::Bool)),
    (json!({ "type": "object" }), TypeDescriptor::object()),
    (json!({ "properties": { "a": {} } }), TypeDescriptor::object()),
    (json!({ "additionalProperties": { "type": "string" } }), TypeDescriptor::object()),
  ];
  for (input, expected) in cases {
    assert_eq!(resolve_type(input.clone()).expect("resolves"), expected, "failed for input {input}");
  }
}

#[test]
fn test_unions() {
  let cases = [
    (
      json!({ "oneOf": [ref_to("Pet"), { "type": "string" }] }),
      TypeDescriptor::union(vec![TypeDescriptor::reference("Pet"), string()]),
    ),
    (
      json!({ "anyOf": [{ "type": "integer" }, ref_to("Status")] }),
      TypeDescriptor::union(vec![TypeDescriptor::scalar(ScalarType::Int), TypeDescriptor::reference("Status")]),
    ),
    (
      json!({ "oneOf": [ref_to("Pet"), { "type": "null" }] }),
      TypeDescriptor::reference("Pet").with_nullable(true),
    ),
    (json!({ "oneOf": [{ "type": "string" }] }), string()),
    (
      json!({ "type": ["string", "integer"] }),
      TypeDescriptor::union(vec![string(), TypeDescriptor::scalar(ScalarType::Int)]),
    ),
  ];
  for (input, expected) in cases {
    assert_eq!(resolve_type(input.clone()).expect("resolves"), expected, "failed for input {input}");
  }
}

#[test]
fn test_nullability() {
  let cases = [
    (json!({ "type": "string", "nullable": true }), string().with_nullable(true)),
    (json!({ "type": ["string", "null"] }), string().with_nullable(true)),
    (
      json!({ "allOf": [ref_to("Pet")], "nullable": true }),
      TypeDescriptor::reference("Pet").with_nullable(true),
    ),
    (
      json!({ "type": "array", "items": { "type": "string", "nullable": true } }),
      TypeDescriptor::array(string().with_nullable(true)),
    ),
  ];
  for (input, expected) in cases {
    assert_eq!(resolve_type(input.clone()).expect("resolves"), expected, "failed for input {input}");
  }
}

#[test]
fn test_all_of_collapses_to_single_member() {
  let cases = [
    (json!({ "allOf": [ref_to("Pet")] }), TypeDescriptor::reference("Pet")),
    (
      json!({ "allOf": [ref_to("Pet"), { "description": "the pet" }] }),
      TypeDescriptor::reference("Pet"),
    ),
    (json!({ "allOf": [{ "type": "string" }, { "maxLength": 5 }] }), string()),
    (json!({ "allOf": [{ "type": "string" }, { "type": "string" }] }), string()),
    (
      json!({ "allOf": [ref_to("Pet"), { "type": "object", "properties": { "tag": {} } }] }),
      TypeDescriptor::object(),
    ),
    (json!({ "type": "integer", "allOf": [{ "minimum": 1 }] }), TypeDescriptor::scalar(ScalarType::Int)),
  ];
  for (input, expected) in cases {
    assert_eq!(resolve_type(input.clone()).expect("resolves"), expected, "failed for input {input}");
  }
}

#[test]
fn test_resolution_errors() {
  let array_without_items = resolve_type(json!({ "type": "array" }));
  assert_eq!(
    array_without_items,
    Err(EngineError::IncompleteSchema {
      schema: "Test".to_string(),
      path: "#/components/schemas/Test".to_string(),
      detail: "array schema has no items".to_string(),
    })
  );

  let only_null = resolve_type(json!({ "anyOf": [{ "type": "null" }] }));
  assert!(
    matches!(&only_null, Err(EngineError::IncompleteSchema { path, .. }) if path == "#/components/schemas/Test/anyOf"),
    "unexpected result: {only_null:?}"
  );

  let missing = resolve_type(json!({ "type": "array", "items": ref_to("Missing") }));
  assert!(
    matches!(&missing, Err(EngineError::UnresolvedReference { path, .. }) if path == "#/components/schemas/Test/items"),
    "unexpected result: {missing:?}"
  );

  let mixed = resolve_type(json!({ "allOf": [{ "type": "string" }, ref_to("Pet")] }));
  assert!(
    matches!(&mixed, Err(EngineError::UnsupportedComposition { path, .. }) if path == "#/components/schemas/Test/allOf"),
    "unexpected result: {mixed:?}"
  );
}

#[test]
fn test_nesting_limit() {
  let nested = json!({
    "type": "array",
    "items": { "type": "array", "items": { "type": "array", "items": { "type": "string" } } }
  });

  let shallow = EngineConfig::builder().max_nesting_depth(2).build();
  let result = resolve_with(&petstore(), shallow, nested.clone());
  assert_eq!(
    result,
    Err(EngineError::NestingTooDeep {
      schema: "Test".to_string(),
      path: "#/components/schemas/Test/items/items/items".to_string(),
      limit: 2,
    })
  );

  let roomy = EngineConfig::builder().max_nesting_depth(3).build();
  assert!(resolve_with(&petstore(), roomy, nested).is_ok());
}

#[test]
fn test_property_nullability_and_rules() {
  let document = petstore();
  let graph = resolve(&document).expect("resolves");
  let names = NameTable::build(&graph).expect("unique names");
  let resolver = TypeResolver::new(&graph, &names, &EngineConfig::default());
  let ctx = ResolveContext::for_schema("Test").child("properties").child("field");

  let required = resolver
    .resolve_property("id", &schema(json!({ "type": "string" })), true, &ctx)
    .expect("resolves");
  assert!(required.required);
  assert!(!required.ty.nullable, "required and not nullable");

  let optional = resolver
    .resolve_property("id", &schema(json!({ "type": "string" })), false, &ctx)
    .expect("resolves");
  assert!(optional.ty.nullable, "optional properties are nullable");

  let explicit = resolver
    .resolve_property("id", &schema(json!({ "type": "string", "nullable": true })), true, &ctx)
    .expect("resolves");
  assert!(explicit.ty.nullable, "explicit nullable survives required");

  let cases = [
    (
      json!({ "type": "string", "pattern": "^[a-z]+$", "minLength": 1, "maxLength": 8 }),
      vec![
        ValidationRule::Pattern {
          pattern: "^[a-z]+$".to_string(),
        },
        ValidationRule::Length { min: Some(1), max: Some(8) },
      ],
    ),
    (
      json!({ "type": "integer", "minimum": 0, "exclusiveMaximum": 10 }),
      vec![ValidationRule::Range {
        minimum: Some(Number::from(0u64)),
        maximum: Some(Number::from(10u64)),
        exclusive_minimum: false,
        exclusive_maximum: true,
      }],
    ),
    (
      json!({ "type": "number", "minimum": 1, "exclusiveMinimum": true }),
      vec![ValidationRule::Range {
        minimum: Some(Number::from(1u64)),
        maximum: None,
        exclusive_minimum: true,
        exclusive_maximum: false,
      }],
    ),
    (
      json!({ "type": "integer", "multipleOf": 5 }),
      vec![ValidationRule::MultipleOf {
        value: Number::from(5u64),
      }],
    ),
    (
      json!({ "type": "array", "items": { "type": "string" }, "minItems": 1, "uniqueItems": true }),
      vec![
        ValidationRule::ItemCount { min: Some(1), max: None },
        ValidationRule::UniqueItems,
      ],
    ),
    (
      json!({ "type": "boolean", "enum": [true] }),
      vec![ValidationRule::Enum { values: vec![json!(true)] }],
    ),
    (
      json!({ "const": "fixed" }),
      vec![ValidationRule::Enum {
        values: vec![json!("fixed")],
      }],
    ),
    (json!({ "type": "string", "enum": ["a", "b"] }), vec![]),
  ];
  for (input, expected) in cases {
    let property = resolver
      .resolve_property("field", &schema(input.clone()), true, &ctx)
      .expect("resolves");
    assert_eq!(property.validation_rules, expected, "failed for input {input}");
  }
}
