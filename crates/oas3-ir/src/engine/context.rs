use std::fmt::Display;

use super::EngineError;
use crate::document::{refs::escape_segment, schema_pointer};

/// Where the type resolver currently is: the schema being analyzed, the JSON
/// Pointer of the node under inspection and how many inline levels deep it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext<'a> {
  owner: &'a str,
  pointer: String,
  depth: usize,
}

impl<'a> ResolveContext<'a> {
  /// Context at the root of a named component schema.
  pub fn for_schema(owner: &'a str) -> Self {
    Self {
      owner,
      pointer: schema_pointer(owner),
      depth: 0,
    }
  }

  /// Context at an arbitrary pointer, e.g. a request body under `#/paths`.
  pub fn at(owner: &'a str, pointer: impl Into<String>) -> Self {
    Self {
      owner,
      pointer: pointer.into(),
      depth: 0,
    }
  }

  /// Descends one pointer segment.
  #[must_use]
  pub fn child(&self, segment: impl Display) -> Self {
    let segment = segment.to_string();
    Self {
      owner: self.owner,
      pointer: format!("{}/{}", self.pointer, escape_segment(&segment)),
      depth: self.depth + 1,
    }
  }

  pub fn owner(&self) -> &'a str {
    self.owner
  }

  pub fn pointer(&self) -> &str {
    &self.pointer
  }

  pub fn depth(&self) -> usize {
    self.depth
  }

  pub(crate) fn unresolved(&self, ref_path: &str) -> EngineError {
    EngineError::UnresolvedReference {
      pointer: ref_path.to_string(),
      schema: self.owner.to_string(),
      path: self.pointer.clone(),
    }
  }

  pub(crate) fn incomplete(&self, detail: impl Into<String>) -> EngineError {
    EngineError::IncompleteSchema {
      schema: self.owner.to_string(),
      path: self.pointer.clone(),
      detail: detail.into(),
    }
  }

  pub(crate) fn unsupported(&self, reason: impl Into<String>) -> EngineError {
    EngineError::UnsupportedComposition {
      schema: self.owner.to_string(),
      path: self.pointer.clone(),
      reason: reason.into(),
    }
  }

  pub(crate) fn too_deep(&self, limit: usize) -> EngineError {
    EngineError::NestingTooDeep {
      schema: self.owner.to_string(),
      path: self.pointer.clone(),
      limit,
    }
  }
}
