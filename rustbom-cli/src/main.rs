//! rustbom -- SBOM generator for Rust projects.

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use rustbom_cli::cli::Cli;
use rustbom_cli::commands;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
