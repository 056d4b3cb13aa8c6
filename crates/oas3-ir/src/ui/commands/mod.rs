#![allow(clippy::struct_excessive_bools)]

pub mod analyze;
pub mod list;

pub use analyze::{AnalyzeConfig, analyze_document};
pub use list::{list_endpoints, list_schemas};

use std::path::Path;

use oas3_ir::{Document, LoaderOptions, SpecLoader};

async fn load_document(input: &Path, options: LoaderOptions) -> anyhow::Result<Document> {
  let loader = SpecLoader::open(input, options).await?;
  Ok(loader.load()?)
}
