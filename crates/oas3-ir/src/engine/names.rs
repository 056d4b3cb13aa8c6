use std::collections::HashMap;

use indexmap::IndexMap;

use super::{EngineError, SchemaGraph};
use crate::naming::to_type_identifier;

/// Component name to model identifier.
#[derive(Debug, Default)]
pub(crate) struct NameTable<'a> {
  identifiers: IndexMap<&'a str, String>,
}

impl<'a> NameTable<'a> {
  /// Assigns an identifier to every named schema. Two component names that
  /// produce the same identifier are a [`EngineError::NameCollision`].
  pub(crate) fn build(graph: &SchemaGraph<'a>) -> Result<Self, EngineError> {
    let mut table = Self::default();
    let mut owners: HashMap<String, &'a str> = HashMap::new();

    for name in graph.names() {
      let identifier = to_type_identifier(name);
      if let Some(first) = owners.get(&identifier) {
        return Err(EngineError::NameCollision {
          identifier,
          first: (*first).to_string(),
          second: name.to_string(),
        });
      }
      owners.insert(identifier.clone(), name);
      table.identifiers.insert(name, identifier);
    }

    Ok(table)
  }

  pub(crate) fn identifier(&self, original: &str) -> Option<&str> {
    self.identifiers.get(original).map(String::as_str)
  }

  pub(crate) fn identifiers(&self) -> impl Iterator<Item = &str> {
    self.identifiers.values().map(String::as_str)
  }
}
