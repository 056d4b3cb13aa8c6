use thiserror::Error;

/// Terminal failures of the analysis pipeline. Every variant names the schema
/// (or operation) being analyzed and the JSON Pointer where the problem sits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
  #[error("unresolved reference '{pointer}' in '{schema}' at {path}")]
  UnresolvedReference { pointer: String, schema: String, path: String },
  #[error("incomplete schema '{schema}' at {path}: {detail}")]
  IncompleteSchema { schema: String, path: String, detail: String },
  #[error("schemas '{first}' and '{second}' both map to the identifier '{identifier}'")]
  NameCollision {
    identifier: String,
    first: String,
    second: String,
  },
  #[error("unsupported composition in '{schema}' at {path}: {reason}")]
  UnsupportedComposition { schema: String, path: String, reason: String },
  #[error("'{schema}' nests deeper than {limit} levels at {path}")]
  NestingTooDeep { schema: String, path: String, limit: usize },
}

impl EngineError {
  /// The schema (or operation label) the error was raised for.
  pub fn schema(&self) -> &str {
    match self {
      Self::UnresolvedReference { schema, .. }
      | Self::IncompleteSchema { schema, .. }
      | Self::UnsupportedComposition { schema, .. }
      | Self::NestingTooDeep { schema, .. } => schema,
      Self::NameCollision { second, .. } => second,
    }
  }

  /// JSON Pointer of the offending location, when the error has one.
  pub fn path(&self) -> Option<&str> {
    match self {
      Self::UnresolvedReference { path, .. }
      | Self::IncompleteSchema { path, .. }
      | Self::UnsupportedComposition { path, .. }
      | Self::NestingTooDeep { path, .. } => Some(path),
      Self::NameCollision { .. } => None,
    }
  }
}
