use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-ir")]
#[command(author, version, about = "Resolve and classify OpenAPI schemas into a type model")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Analyze an OpenAPI specification and write the resulting model as JSON
  Analyze(AnalyzeCommand),
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeCommand {
  /// Path to the OpenAPI specification file (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Where to write the model; stdout when omitted
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Promote inline object schemas to named models
  #[arg(long, default_value_t = false)]
  pub hoist_inline_objects: bool,

  /// Deepest inline nesting to follow before failing
  #[arg(long, value_name = "DEPTH")]
  pub max_depth: Option<usize>,

  /// Skip structural validation of the document
  #[arg(long, default_value_t = false)]
  pub no_validate: bool,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every analyzed schema model with its inheritance and special cases
  Schemas {
    /// Path to the OpenAPI specification file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Promote inline object schemas to named models
    #[arg(long, default_value_t = false)]
    hoist_inline_objects: bool,
  },
  /// List every operation with its parameters and body types
  Endpoints {
    /// Path to the OpenAPI specification file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
