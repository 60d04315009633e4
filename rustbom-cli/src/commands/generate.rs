//! `rustbom generate` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use rustbom_core::config::RustbomConfig;
use rustbom_sbom_scanner::{
    CratesIoClient, EnrichmentSummary, RegistryClient, SbomFormat, SbomScanner,
    SbomScannerBuilder, SbomScannerConfig, SbomScannerConfigBuilder, SbomType,
};

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, ReportStream, write_artifact};

/// Effective settings for one `generate` run.
///
/// CLI flags win over `rustbom.toml` (which already includes env overrides).
#[derive(Debug, Clone)]
pub struct GeneratePlan {
    /// Validated scanner configuration
    pub scanner: SbomScannerConfig,
    /// SBOM destination (`None` = stdout)
    pub output_file: Option<PathBuf>,
    /// DOT graph destination (`None` = no graph)
    pub graph_file: Option<PathBuf>,
}

impl GeneratePlan {
    /// Merge CLI arguments over the loaded configuration.
    ///
    /// # Errors
    ///
    /// - `CliError::MissingApplication` when no root application is named
    /// - `CliError::Core` (config) when the merged settings are invalid
    pub fn resolve(args: &GenerateArgs, config: &RustbomConfig) -> Result<Self, CliError> {
        let mut builder =
            SbomScannerConfigBuilder::from_config(SbomScannerConfig::from_core(config));

        if let Some(dir) = &args.dependency_dir {
            builder = builder.dependency_dir(dir.display().to_string());
        }
        if let Some(app) = &args.application {
            builder = builder.application(app.clone());
        }
        if let Some(sbom) = args.sbom {
            builder = builder.sbom_type(sbom.into());
        }
        if let Some(format) = args.format {
            builder = builder.format(format.into());
        }
        if args.offline {
            builder = builder.registry_enabled(false);
        }

        let scanner = builder.build()?;
        if scanner.application_name().is_none() {
            return Err(CliError::MissingApplication);
        }

        if scanner.sbom_type == SbomType::CycloneDx && scanner.format != SbomFormat::Json {
            warn!(
                requested = %scanner.format,
                "CycloneDX output is always JSON; ignoring requested format"
            );
        }

        Ok(Self {
            scanner,
            output_file: args
                .output_file
                .clone()
                .or_else(|| non_empty_path(&config.output.file)),
            graph_file: args
                .graph
                .clone()
                .or_else(|| non_empty_path(&config.output.graph_file)),
        })
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// Execute the `generate` command.
pub async fn execute(
    args: GenerateArgs,
    config: &RustbomConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let plan = GeneratePlan::resolve(&args, config)?;

    let report = if plan.scanner.registry_enabled {
        let client = CratesIoClient::new(
            &plan.scanner.registry_url,
            &plan.scanner.user_agent,
            plan.scanner.timeout(),
        )?;
        let scanner = SbomScannerBuilder::new()
            .config(plan.scanner.clone())
            .registry(client)
            .build()?;
        run(&scanner, &plan).await?
    } else {
        info!("registry lookups disabled, running offline");
        let scanner = SbomScannerBuilder::new()
            .config(plan.scanner.clone())
            .build()?;
        run(&scanner, &plan).await?
    };

    // stdout is reserved for the SBOM when no output file is set
    let stream = if plan.output_file.is_some() {
        ReportStream::Stdout
    } else {
        ReportStream::Stderr
    };
    writer.render_on(stream, &report)
}

/// Scan, serialize and write the SBOM (and optional graph) for `plan`.
///
/// Nothing is written when the scan fails.
pub async fn run<R: RegistryClient>(
    scanner: &SbomScanner<R>,
    plan: &GeneratePlan,
) -> Result<GenerateReport, CliError> {
    let result = scanner.scan().await?;
    let document = scanner.generate(&result)?;

    write_artifact(plan.output_file.as_deref(), &document.content).await?;
    if let Some(path) = plan.output_file.as_deref() {
        info!(path = %path.display(), "SBOM written");
    }

    if let Some(path) = plan.graph_file.as_deref() {
        let graph = scanner.render_graph(&result);
        write_artifact(Some(path), &graph).await?;
        info!(path = %path.display(), "dependency graph written");
    }

    Ok(GenerateReport {
        scan_id: result.scan_id.clone(),
        source_file: result.source_file.clone(),
        application: result.document_name().to_owned(),
        root: result.root.as_ref().map(ToString::to_string),
        sbom_type: document.sbom_type,
        format: document.format,
        packages: result.package_count(),
        dependencies: result.dependency_count(),
        components: document.component_count,
        unresolved: result.unresolved.iter().map(ToString::to_string).collect(),
        enrichment: result.summary,
        output_file: plan.output_file.as_deref().map(display_path),
        graph_file: plan.graph_file.as_deref().map(display_path),
    })
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Summary of one `generate` run.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    /// Scan identifier
    pub scan_id: String,
    /// Lockfile that was read
    pub source_file: String,
    /// SBOM document name
    pub application: String,
    /// Package the document describes (`None` if the root was not found)
    pub root: Option<String>,
    /// SBOM standard
    pub sbom_type: SbomType,
    /// Serialization format actually used
    pub format: SbomFormat,
    /// Number of packages in the index
    pub packages: usize,
    /// Number of DEPENDS_ON relationships
    pub dependencies: usize,
    /// Number of components in the document
    pub components: usize,
    /// Dependencies synthesized with version `NA`
    pub unresolved: Vec<String>,
    /// Registry lookup tally (`None` when offline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentSummary>,
    /// SBOM destination (`None` = stdout)
    pub output_file: Option<String>,
    /// DOT graph destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_file: Option<String>,
}

impl Render for GenerateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "SBOM Generation: {}", self.application.bold())?;
        writeln!(w, "  Lockfile:     {}", self.source_file)?;
        match &self.root {
            Some(root) => writeln!(w, "  Root:         {}", root)?,
            None => writeln!(w, "  Root:         {}", "not found".yellow())?,
        }
        writeln!(w, "  Standard:     {} ({})", self.sbom_type, self.format)?;
        writeln!(w, "  Packages:     {}", self.packages)?;
        writeln!(w, "  Dependencies: {}", self.dependencies)?;
        writeln!(w, "  Components:   {}", self.components)?;

        match &self.enrichment {
            Some(summary) => {
                let tally = format!(
                    "{} found, {} not found, {} failed, {} timed out, {} skipped",
                    summary.found,
                    summary.not_found,
                    summary.failed,
                    summary.timed_out,
                    summary.skipped
                );
                if summary.failed + summary.timed_out > 0 {
                    writeln!(w, "  Registry:     {}", tally.yellow())?;
                } else {
                    writeln!(w, "  Registry:     {}", tally)?;
                }
            }
            None => writeln!(w, "  Registry:     {}", "offline".dimmed())?,
        }

        if !self.unresolved.is_empty() {
            writeln!(
                w,
                "  Unresolved:   {}",
                self.unresolved.len().to_string().yellow()
            )?;
            for key in &self.unresolved {
                writeln!(w, "    - {}", key)?;
            }
        }

        writeln!(
            w,
            "  Output:       {}",
            self.output_file.as_deref().unwrap_or("<stdout>")
        )?;
        if let Some(graph) = &self.graph_file {
            writeln!(w, "  Graph:        {}", graph)?;
        }
        writeln!(w, "  Result:       {}", "OK".green().bold())?;

        Ok(())
    }
}
