use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use oas3_ir::{AnalysisStats, Analyzer, EngineConfig, InternalModel, LoaderOptions, SpecialCase};
use strum::IntoEnumIterator;

use super::load_document;
use crate::ui::{AnalyzeCommand, Colors};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
  pub input: PathBuf,
  pub output: Option<PathBuf>,
  pub engine: EngineConfig,
  pub validate: bool,
  pub verbose: bool,
  pub quiet: bool,
}

impl From<AnalyzeCommand> for AnalyzeConfig {
  fn from(command: AnalyzeCommand) -> Self {
    let AnalyzeCommand {
      input,
      output,
      hoist_inline_objects,
      max_depth,
      no_validate,
      verbose,
      quiet,
    } = command;

    let engine = EngineConfig::builder()
      .hoist_inline_objects(hoist_inline_objects)
      .maybe_max_nesting_depth(max_depth)
      .build();

    // Stdout carries the model when no output file is given.
    let quiet = quiet || output.is_none();

    Self {
      input,
      output,
      engine,
      validate: !no_validate,
      verbose,
      quiet,
    }
  }
}

impl AnalyzeConfig {
  async fn write_output(&self, json: String) -> anyhow::Result<()> {
    match &self.output {
      Some(path) => {
        if let Some(parent) = path.parent() {
          tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;
      }
      None => println!("{json}"),
    }
    Ok(())
  }
}

struct AnalyzeLogger<'a> {
  config: &'a AnalyzeConfig,
  colors: &'a Colors,
}

impl<'a> AnalyzeLogger<'a> {
  fn new(config: &'a AnalyzeConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.model())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_analyzing(&self) {
    self.info(&"Resolving and classifying schemas...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, model: &InternalModel, stats: &AnalysisStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Schemas analyzed:", stats.schemas_analyzed.to_string());
    if stats.synthetic_models > 0 {
      self.stat("", format!("{} hoisted models", stats.synthetic_models));
    }
    self.stat("Properties resolved:", stats.properties_resolved.to_string());
    self.stat("Endpoints analyzed:", stats.endpoints_analyzed.to_string());
    self.stat("Render order:", format!("{} models", model.render_order.len()));

    for special_case in SpecialCase::iter() {
      let count = stats.special_case_count(special_case);
      if count > 0 {
        self.stat(&format!("{special_case}:"), count.to_string());
      }
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &AnalysisStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.special_case()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn print_warnings(&self, stats: &AnalysisStats) {
    if stats.warnings.is_empty() {
      return;
    }

    self.stat("Warnings:", stats.warnings.len().to_string());
    if !self.config.verbose {
      return;
    }

    println!();
    for warning in &stats.warnings {
      eprintln!(
        "{} {}",
        "Warning:".with(self.colors.special_case()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    if let Some(output) = &self.config.output {
      self.info(
        &format!("Writing to: {}", output.display())
          .with(self.colors.primary())
          .to_string(),
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully analyzed OpenAPI spec".with(self.colors.success())
      );
    }
  }
}

pub async fn analyze_document(config: AnalyzeConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = AnalyzeLogger::new(&config, colors);

  logger.log_loading();
  let document = load_document(&config.input, LoaderOptions { validate: config.validate }).await?;

  logger.log_analyzing();
  let (model, stats) = Analyzer::new(&document, config.engine).analyze()?;
  logger.print_statistics(&model, &stats);

  logger.log_writing();
  let json = serde_json::to_string_pretty(&model)?;
  config.write_output(json).await?;

  logger.log_success();
  Ok(())
}
