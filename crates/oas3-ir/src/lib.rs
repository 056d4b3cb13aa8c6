#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
//! Resolves and classifies the schemas of an OpenAPI 3.x document into a
//! language-agnostic intermediate representation.
//!
//! ```no_run
//! use oas3_ir::{Analyzer, EngineConfig, LoaderOptions, SpecFormat, load_slice};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("openapi.yaml")?;
//! let document = load_slice(&bytes, SpecFormat::Yaml, LoaderOptions::default())?;
//! let (model, _stats) = Analyzer::new(&document, EngineConfig::default()).analyze()?;
//! for schema in model.ordered_schemas() {
//!   println!("{} -> {:?}", schema.name, schema.dependencies);
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod engine;
pub mod ir;
pub mod naming;

pub use document::{Document, LoadError, LoaderOptions, SpecFormat, SpecLoader, load_slice};
pub use engine::{AnalysisStats, AnalysisWarning, Analyzer, EngineConfig, EngineError};
pub use ir::{InternalModel, Property, SchemaModel, SpecialCase, TypeDescriptor};
