//! Command handlers -- one module per subcommand

pub mod config;
pub mod generate;

use std::path::PathBuf;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::logging;
use crate::output::OutputWriter;

/// Load configuration, initialize logging and dispatch the subcommand.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let explicit = cli.config.is_some();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let loaded = config::load(&config_path, explicit).await;

    // `config validate` still needs logging when the file itself is broken
    let general = loaded
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_default();
    logging::init_tracing(&general, cli.log_level.as_deref(), cli.debug)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Generate(args) => {
            let config = loaded?;
            generate::execute(args, &config, &writer).await
        }
        Commands::Config(args) => config::execute(args, &config_path, explicit, &writer).await,
    }
}
