//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rustbom_sbom_scanner::{SbomFormat, SbomType};

/// Configuration file used when `--config` is not given.
///
/// A missing file at this path is not an error; defaults are used instead.
pub const DEFAULT_CONFIG_PATH: &str = "rustbom.toml";

/// rustbom -- SBOM generator for Rust projects.
///
/// Use `rustbom <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "rustbom", version, about, long_about = None)]
pub struct Cli {
    /// Path to the rustbom.toml configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Echo every resolution decision (forces log level `debug`).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Format of command reports (the SBOM itself is controlled by `--format`).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an SBOM from a Cargo.lock file.
    Generate(GenerateArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- generate ----

/// Generate an SBOM for a Rust application.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory containing Cargo.lock (default: scan.dependency_dir).
    #[arg(short = 'd', long)]
    pub dependency_dir: Option<PathBuf>,

    /// Name of the root application package (default: scan.application).
    #[arg(short = 'a', long)]
    pub application: Option<String>,

    /// SBOM standard.
    #[arg(long)]
    pub sbom: Option<SbomTypeArg>,

    /// SBOM serialization format (CycloneDX always uses json).
    #[arg(long)]
    pub format: Option<SbomFormatArg>,

    /// Write the SBOM to this file instead of stdout.
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Write the dependency graph in DOT format to this file.
    #[arg(short = 'g', long)]
    pub graph: Option<PathBuf>,

    /// Skip registry lookups; supplier and license stay NOASSERTION.
    #[arg(long)]
    pub offline: bool,
}

/// SBOM standard selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SbomTypeArg {
    /// SPDX 2.3
    Spdx,
    /// CycloneDX 1.5
    Cyclonedx,
}

impl From<SbomTypeArg> for SbomType {
    fn from(arg: SbomTypeArg) -> Self {
        match arg {
            SbomTypeArg::Spdx => SbomType::Spdx,
            SbomTypeArg::Cyclonedx => SbomType::CycloneDx,
        }
    }
}

/// SBOM serialization format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SbomFormatArg {
    /// SPDX tag-value
    Tag,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl From<SbomFormatArg> for SbomFormat {
    fn from(arg: SbomFormatArg) -> Self {
        match arg {
            SbomFormatArg::Tag => SbomFormat::Tag,
            SbomFormatArg::Json => SbomFormat::Json,
            SbomFormatArg::Yaml => SbomFormat::Yaml,
        }
    }
}

// ---- config ----

/// Manage rustbom configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, scan, registry, output).
        #[arg(long)]
        section: Option<String>,
    },
}
