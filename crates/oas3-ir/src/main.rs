#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod ui;

/// `RUST_LOG` wins; otherwise `--verbose` turns on the engine's debug events.
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "oas3_ir=debug" } else { "oas3_ir=warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  let verbose = matches!(&cli.command, Commands::Analyze(command) if command.verbose);
  init_tracing(verbose);

  match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Schemas {
        input,
        hoist_inline_objects,
      } => ui::commands::list_schemas(&input, hoist_inline_objects, &colors).await?,
      ListCommands::Endpoints { input } => ui::commands::list_endpoints(&input, &colors).await?,
    },
    Commands::Analyze(command) => {
      let config = ui::commands::AnalyzeConfig::from(command);
      ui::commands::analyze_document(config, &colors).await?;
    }
  }

  Ok(())
}
