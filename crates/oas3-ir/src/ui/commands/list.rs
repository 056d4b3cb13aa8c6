use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;
use oas3_ir::{
  Analyzer, EngineConfig, LoaderOptions,
  ir::{InheritanceKind, SchemaModel, TypeDescriptor, TypeKind},
};

use super::load_document;
use crate::ui::{Colors, colors::comfy, term_width};

fn new_table(headers: &[&str], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(comfy(colors.label())));
  }
  table.set_header(row);
  table
}

/// `Pet`, `Pet[]`, `Cat | Dog`, `string?`: a compact rendering for tables.
fn describe_type(ty: &TypeDescriptor) -> String {
  let base = match &ty.kind {
    TypeKind::Scalar { scalar, format: Some(format) } => format!("{scalar}({format})"),
    TypeKind::Scalar { scalar, format: None } => scalar.to_string(),
    TypeKind::Array { item_type } => format!("{}[]", describe_type(item_type)),
    TypeKind::Union { union_members } => union_members.iter().map(describe_type).join(" | "),
    TypeKind::Object => "object".to_string(),
    TypeKind::Enum { enum_values } => format!("enum({})", enum_values.len()),
    TypeKind::Reference { reference_name } => reference_name.clone(),
  };
  if ty.nullable { format!("{base}?") } else { base }
}

fn describe_inheritance(model: &SchemaModel) -> String {
  let inheritance = &model.inheritance;
  match inheritance.kind {
    InheritanceKind::None => String::new(),
    InheritanceKind::AbstractBase | InheritanceKind::InterfaceImpl => format!(
      "{} {}",
      inheritance.kind,
      inheritance.base_or_interface_name.as_deref().unwrap_or_default()
    ),
    InheritanceKind::Composition => format!("{} {}", inheritance.kind, inheritance.composed_models.join(", ")),
    InheritanceKind::AllOfFlattening => inheritance.kind.to_string(),
  }
}

pub async fn list_schemas(input: &Path, hoist_inline_objects: bool, colors: &Colors) -> anyhow::Result<()> {
  let document = load_document(input, LoaderOptions::default()).await?;
  let config = EngineConfig::builder().hoist_inline_objects(hoist_inline_objects).build();
  let (model, _) = Analyzer::new(&document, config).analyze()?;

  let mut table = new_table(&["MODEL", "SOURCE", "INHERITANCE", "SPECIAL CASES", "DEPENDS ON"], colors);

  for schema in model.ordered_schemas() {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&schema.name)
        .fg(comfy(colors.model()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(&schema.original_name).fg(comfy(colors.primary())));
    row.add_cell(Cell::new(describe_inheritance(schema)).fg(comfy(colors.info())));
    row.add_cell(Cell::new(schema.special_cases.iter().join(", ")).fg(comfy(colors.special_case())));
    row.add_cell(Cell::new(schema.dependencies.join(", ")).fg(comfy(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

pub async fn list_endpoints(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = load_document(input, LoaderOptions::default()).await?;
  let (model, _) = Analyzer::new(&document, EngineConfig::default()).analyze()?;

  let mut table = new_table(&["METHOD", "PATH", "PARAMETERS", "REQUEST", "RESPONSES"], colors);

  for endpoint in &model.endpoints {
    let parameters = endpoint
      .parameters
      .iter()
      .map(|param| format!("{}: {} ({})", param.name, describe_type(&param.ty), param.location))
      .join("\n");
    let request = endpoint
      .request_body
      .as_ref()
      .map(|body| describe_type(&body.ty))
      .unwrap_or_default();
    let responses = endpoint
      .responses
      .iter()
      .map(|response| match &response.ty {
        Some(ty) => format!("{} {}", response.status_code, describe_type(ty)),
        None => response.status_code.clone(),
      })
      .join("\n");

    let mut row = Row::new();
    row.add_cell(
      Cell::new(endpoint.method.to_string().to_uppercase())
        .fg(comfy(colors.special_case()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(
      Cell::new(&endpoint.path)
        .fg(comfy(colors.model()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(parameters).fg(comfy(colors.primary())));
    row.add_cell(Cell::new(request).fg(comfy(colors.info())));
    row.add_cell(Cell::new(responses).fg(comfy(colors.info())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
