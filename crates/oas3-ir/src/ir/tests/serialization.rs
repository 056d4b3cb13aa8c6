use indexmap::IndexMap;
use serde_json::{Number, json};

use crate::{
  document::{Method, ParameterIn},
  ir::{
    DiscriminatorInfo, EndpointModel, InfoModel, InheritanceStrategy, InternalModel, ParameterModel, Property,
    ScalarType, SchemaModel, SpecialCase, TypeDescriptor, UnionDetectionStrategy, ValidationRule,
  },
};

fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Value {
  serde_json::to_value(value).expect("serializes")
}

#[test]
fn test_type_descriptor_serialization() {
  let cases = [
    (
      TypeDescriptor::reference("Pet"),
      json!({ "kind": "reference", "referenceName": "Pet", "nullable": false }),
    ),
    (
      TypeDescriptor::scalar_with_format(ScalarType::Int, Some("int64".to_string())).with_nullable(true),
      json!({ "kind": "scalar", "scalar": "int", "format": "int64", "nullable": true }),
    ),
    (
      TypeDescriptor::scalar(ScalarType::Any),
      json!({ "kind": "scalar", "scalar": "any", "nullable": false }),
    ),
    (
      TypeDescriptor::array(TypeDescriptor::scalar(ScalarType::String)),
      json!({
        "kind": "array",
        "itemType": { "kind": "scalar", "scalar": "string", "nullable": false },
        "nullable": false
      }),
    ),
    (
      TypeDescriptor::union(vec![TypeDescriptor::reference("Cat"), TypeDescriptor::scalar(ScalarType::Bool)]),
      json!({
        "kind": "union",
        "unionMembers": [
          { "kind": "reference", "referenceName": "Cat", "nullable": false },
          { "kind": "scalar", "scalar": "bool", "nullable": false }
        ],
        "nullable": false
      }),
    ),
    (
      TypeDescriptor::enumeration(vec![json!("a"), json!(2)]),
      json!({ "kind": "enum", "enumValues": ["a", 2], "nullable": false }),
    ),
    (TypeDescriptor::object(), json!({ "kind": "object", "nullable": false })),
  ];
  for (input, expected) in cases {
    assert_eq!(to_json(&input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_validation_rule_serialization() {
  let cases = [
    (
      ValidationRule::Pattern {
        pattern: "^[a-z]+$".to_string(),
      },
      json!({ "rule": "pattern", "pattern": "^[a-z]+$" }),
    ),
    (
      ValidationRule::Range {
        minimum: Some(Number::from(0u64)),
        maximum: None,
        exclusive_minimum: false,
        exclusive_maximum: true,
      },
      json!({ "rule": "range", "minimum": 0, "exclusiveMinimum": false, "exclusiveMaximum": true }),
    ),
    (
      ValidationRule::ItemCount { min: None, max: Some(10) },
      json!({ "rule": "itemCount", "max": 10 }),
    ),
    (ValidationRule::UniqueItems, json!({ "rule": "uniqueItems" })),
  ];
  for (input, expected) in cases {
    assert_eq!(to_json(&input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_property_serialization() {
  let property = Property {
    name: "pet_type".to_string(),
    ty: TypeDescriptor::scalar(ScalarType::String),
    required: true,
    description: None,
    validation_rules: vec![],
    default_value: Some(json!("dog")),
    deprecated: false,
    read_only: true,
    write_only: false,
  };

  assert_eq!(
    to_json(&property),
    json!({
      "name": "pet_type",
      "type": { "kind": "scalar", "scalar": "string", "nullable": false },
      "required": true,
      "defaultValue": "dog",
      "readOnly": true
    })
  );
}

#[test]
fn test_schema_model_serialization() {
  let mapping = IndexMap::from([("cat".to_string(), "Cat".to_string())]);
  let mut model = SchemaModel::new("Pet", "pet");
  model.special_cases.insert(SpecialCase::DiscriminatedUnion);
  model.inheritance = InheritanceStrategy::interface_impl("Pet");
  model.union_members = vec![TypeDescriptor::reference("Cat")];
  model.dependencies = vec!["Cat".to_string()];
  model.discriminator = Some(DiscriminatorInfo {
    property_name: "petType".to_string(),
    value_to_schema_name: mapping.clone(),
    required: true,
  });
  model.union_strategy = Some(UnionDetectionStrategy::DiscriminatorDispatch {
    property_name: "petType".to_string(),
    value_to_schema_name: mapping,
  });

  assert_eq!(
    to_json(&model),
    json!({
      "name": "Pet",
      "originalName": "pet",
      "properties": [],
      "inheritance": { "kind": "interfaceImpl", "baseOrInterfaceName": "Pet" },
      "specialCases": ["DiscriminatedUnion"],
      "dependencies": ["Cat"],
      "isEnum": false,
      "discriminator": { "propertyName": "petType", "valueToSchemaName": { "cat": "Cat" }, "required": true },
      "unionMembers": [{ "kind": "reference", "referenceName": "Cat", "nullable": false }],
      "unionStrategy": {
        "strategy": "discriminatorDispatch",
        "propertyName": "petType",
        "valueToSchemaName": { "cat": "Cat" }
      }
    })
  );
}

#[test]
fn test_internal_model_serialization() {
  let mut schemas = IndexMap::new();
  let mut token = SchemaModel::new("Token", "Token");
  token.aliased_type = Some(TypeDescriptor::scalar(ScalarType::String));
  token.synthetic = true;
  schemas.insert("Token".to_string(), token);

  let model = InternalModel {
    info: InfoModel {
      title: "Pets".to_string(),
      version: "1.0.0".to_string(),
      description: None,
    },
    schemas,
    endpoints: vec![EndpointModel {
      path: "/pets/{id}".to_string(),
      method: Method::Get,
      operation_id: Some("getPet".to_string()),
      summary: None,
      description: None,
      deprecated: false,
      tags: vec![],
      parameters: vec![ParameterModel {
        name: "id".to_string(),
        location: ParameterIn::Path,
        required: true,
        ty: TypeDescriptor::scalar(ScalarType::String),
        description: None,
      }],
      request_body: None,
      responses: vec![],
    }],
    render_order: vec!["Token".to_string()],
  };

  assert_eq!(
    to_json(&model),
    json!({
      "info": { "title": "Pets", "version": "1.0.0" },
      "schemas": {
        "Token": {
          "name": "Token",
          "originalName": "Token",
          "properties": [],
          "inheritance": { "kind": "none" },
          "specialCases": [],
          "dependencies": [],
          "isEnum": false,
          "aliasedType": { "kind": "scalar", "scalar": "string", "nullable": false },
          "synthetic": true
        }
      },
      "endpoints": [{
        "path": "/pets/{id}",
        "method": "get",
        "operationId": "getPet",
        "parameters": [{
          "name": "id",
          "location": "path",
          "required": true,
          "type": { "kind": "scalar", "scalar": "string", "nullable": false }
        }],
        "responses": []
      }],
      "renderOrder": ["Token"]
    })
  );
}
