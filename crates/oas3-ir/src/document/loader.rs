use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use thiserror::Error;

use super::Document;

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to open '{path}': {message}")]
  Open { path: PathBuf, message: String },
  #[error("document is not valid UTF-8: {0}")]
  Utf8(#[from] std::str::Utf8Error),
  #[error("invalid JSON document at '{path}': {source}")]
  Json {
    path: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("invalid YAML document at '{path}': {source}")]
  Yaml {
    path: String,
    #[source]
    source: serde_yaml::Error,
  },
  #[error("unsupported OpenAPI version '{version}', expected 3.x")]
  UnsupportedVersion { version: String },
  #[error("document failed OpenAPI validation: {message}")]
  Validation { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
  /// Also deserialize the document into `oas3::Spec` and check the `openapi` version.
  pub validate: bool,
}

impl Default for LoaderOptions {
  fn default() -> Self {
    Self { validate: true }
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
  options: LoaderOptions,
}

impl SpecLoader {
  pub async fn open(path: &Path, options: LoaderOptions) -> Result<Self, LoadError> {
    let format = SpecFormat::from_path(path);
    let file = AsyncMmapFile::open(path).await.map_err(|e| LoadError::Open {
      path: path.to_path_buf(),
      message: e.to_string(),
    })?;

    Ok(Self { file, format, options })
  }

  pub fn format(&self) -> SpecFormat {
    self.format
  }

  pub fn load(&self) -> Result<Document, LoadError> {
    load_slice(self.file.as_slice(), self.format, self.options)
  }
}

/// Parses (and optionally validates) a document held in memory.
pub fn load_slice(bytes: &[u8], format: SpecFormat, options: LoaderOptions) -> Result<Document, LoadError> {
  let text = std::str::from_utf8(bytes)?;
  let document = match format {
    SpecFormat::Json => Document::from_json_str(text)?,
    SpecFormat::Yaml => Document::from_yaml_str(text)?,
  };

  if options.validate {
    validate(text, format, &document)?;
  }

  tracing::debug!(
    title = %document.info.title,
    version = %document.info.version,
    schemas = document.schemas().len(),
    paths = document.paths.len(),
    "loaded OpenAPI document"
  );

  Ok(document)
}

fn validate(text: &str, format: SpecFormat, document: &Document) -> Result<(), LoadError> {
  if !document.openapi.starts_with("3.") {
    return Err(LoadError::UnsupportedVersion {
      version: document.openapi.clone(),
    });
  }

  let spec = match format {
    SpecFormat::Json => oas3::from_json(text).map_err(|e| LoadError::Validation { message: e.to_string() })?,
    SpecFormat::Yaml => oas3::from_yaml(text).map_err(|e| LoadError::Validation { message: e.to_string() })?,
  };

  tracing::trace!(openapi = %spec.openapi, "document passed structural validation");
  Ok(())
}
