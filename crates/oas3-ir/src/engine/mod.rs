//! Schema resolution and classification.
//!
//! The pipeline runs in four passes over an immutable [`Document`]:
//!
//! 1. [`resolve`] validates every `$ref` and builds the [`SchemaGraph`],
//!    including the set of schemas that lie on reference cycles.
//! 2. [`classify_all`] tags each schema with its [`SpecialCase`]s.
//! 3. [`build`] turns every schema into a [`SchemaModel`](crate::ir::SchemaModel),
//!    resolving property types through the [`TypeResolver`].
//! 4. Endpoints are extracted from `paths`, then dependencies are made acyclic
//!    and the render order is computed.
//!
//! [`Analyzer`] runs all of them and returns either a complete
//! [`InternalModel`] or the first [`EngineError`].

mod builder;
mod classifier;
mod composition;
mod config;
mod context;
mod endpoints;
mod errors;
mod names;
mod resolver;
mod stats;
mod strategy;
mod type_resolver;

use std::collections::BTreeSet;

pub use builder::build;
pub use classifier::{classify, classify_all};
pub use config::{DEFAULT_MAX_NESTING_DEPTH, EngineConfig};
pub use context::ResolveContext;
pub use errors::EngineError;
use indexmap::IndexMap;
pub use resolver::{SchemaGraph, SchemaNode, resolve};
pub use stats::{AnalysisStats, AnalysisWarning};
pub use strategy::select_strategy;
pub use type_resolver::TypeResolver;

use crate::{
  document::Document,
  ir::{InternalModel, SpecialCase},
};

#[cfg(test)]
mod tests;

/// Runs the full pipeline over one document.
///
/// ```no_run
/// use oas3_ir::{
///   document::Document,
///   engine::{Analyzer, EngineConfig},
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let document = Document::from_json_str(&std::fs::read_to_string("openapi.json")?)?;
/// let (model, stats) = Analyzer::new(&document, EngineConfig::default()).analyze()?;
/// println!("{} models, {} cycles", model.schemas.len(), stats.cycles_detected);
/// # Ok(())
/// # }
/// ```
pub struct Analyzer<'a> {
  document: &'a Document,
  config: EngineConfig,
}

impl<'a> Analyzer<'a> {
  pub fn new(document: &'a Document, config: EngineConfig) -> Self {
    Self { document, config }
  }

  /// Resolves, classifies and builds. No partial model is returned on error.
  pub fn analyze(&self) -> Result<(InternalModel, AnalysisStats), EngineError> {
    let mut stats = AnalysisStats::default();

    let graph = resolve(self.document)?;
    stats.record_cycles(graph.cycle_details().to_vec());

    let classifications: IndexMap<&str, BTreeSet<SpecialCase>> = classify_all(&graph);
    let model = build(self.document, &graph, &classifications, &self.config, &mut stats)?;

    tracing::debug!(
      schemas = model.schemas.len(),
      endpoints = model.endpoints.len(),
      warnings = stats.warnings.len(),
      "analysis complete"
    );

    Ok((model, stats))
  }
}
