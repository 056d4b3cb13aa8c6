use serde_json::{Value, json};

use crate::{
  document::Document,
  engine::{AnalysisStats, Analyzer, EngineConfig, EngineError},
  ir::InternalModel,
};

pub(super) fn ref_to(name: &str) -> Value {
  json!({ "$ref": format!("#/components/schemas/{name}") })
}

pub(super) fn document_with_schemas(schemas: Value) -> Document {
  document_with_paths(json!({}), schemas)
}

pub(super) fn document_with_paths(paths: Value, schemas: Value) -> Document {
  Document::from_value(json!({
    "openapi": "3.1.0",
    "info": { "title": "Test", "version": "1.0.0" },
    "paths": paths,
    "components": { "schemas": schemas }
  }))
  .expect("failed to parse test document")
}

pub(super) fn analyze(document: &Document) -> (InternalModel, AnalysisStats) {
  analyze_with(document, EngineConfig::default())
}

pub(super) fn analyze_with(document: &Document, config: EngineConfig) -> (InternalModel, AnalysisStats) {
  Analyzer::new(document, config).analyze().expect("analysis failed")
}

pub(super) fn analyze_err(document: &Document) -> EngineError {
  match Analyzer::new(document, EngineConfig::default()).analyze() {
    Ok(_) => panic!("expected analysis to fail"),
    Err(err) => err,
  }
}

/// The `petType` discriminated union over `Cat` and `Dog`.
pub(super) fn pet_union_schemas() -> Value {
  json!({
    "Pet": {
      "oneOf": [ref_to("Cat"), ref_to("Dog")],
      "discriminator": {
        "propertyName": "petType",
        "mapping": {
          "cat": "#/components/schemas/Cat",
          "dog": "#/components/schemas/Dog"
        }
      }
    },
    "Cat": {
      "type": "object",
      "properties": {
        "petType": { "type": "string" },
        "meow": { "type": "boolean" }
      }
    },
    "Dog": {
      "type": "object",
      "required": ["bark"],
      "properties": { "bark": { "type": "string" } }
    }
  })
}
