//! Integration tests for `rustbom generate`.
//!
//! All tests run offline against a temporary copy of the fixture lockfile.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use rustbom_cli::cli::{GenerateArgs, SbomFormatArg, SbomTypeArg};
use rustbom_cli::commands::generate::{GeneratePlan, run};
use rustbom_core::config::RustbomConfig;
use rustbom_sbom_scanner::{SbomFormat, SbomScannerBuilder, SbomType};

const FIXTURE: &str = include_str!("../../crates/sbom-scanner/tests/fixtures/Cargo.lock");

fn project_dir() -> TempDir {
    let dir = TempDir::new().expect("should create temp dir");
    fs::write(dir.path().join("Cargo.lock"), FIXTURE).expect("should write lockfile");
    dir
}

fn offline_args(dir: &Path) -> GenerateArgs {
    GenerateArgs {
        dependency_dir: Some(dir.to_path_buf()),
        application: Some("demo-app".to_owned()),
        sbom: None,
        format: None,
        output_file: None,
        graph: None,
        offline: true,
    }
}

async fn generate(args: &GenerateArgs) -> rustbom_cli::commands::generate::GenerateReport {
    let plan = GeneratePlan::resolve(args, &RustbomConfig::default()).expect("valid plan");
    let scanner = SbomScannerBuilder::new()
        .config(plan.scanner.clone())
        .build()
        .expect("scanner builds");
    run(&scanner, &plan).await.expect("generate succeeds")
}

#[tokio::test]
async fn test_generate_spdx_tag_to_file() {
    let dir = project_dir();
    let out: PathBuf = dir.path().join("sbom.spdx");
    let mut args = offline_args(dir.path());
    args.output_file = Some(out.clone());

    let report = generate(&args).await;

    assert_eq!(report.packages, 7);
    assert_eq!(report.dependencies, 7);
    assert_eq!(report.root.as_deref(), Some("demo-app@0.3.1"));
    assert!(report.unresolved.is_empty());
    assert!(report.enrichment.is_none(), "offline run has no enrichment");

    let content = fs::read_to_string(&out).expect("sbom written");
    assert!(content.starts_with("SPDXVersion: SPDX-2.3"));
    assert!(content.contains("DocumentName: demo-app"));
    assert!(content.contains("DESCRIBES"));
    assert!(content.contains("PackageSupplier: NOASSERTION"));
}

#[tokio::test]
async fn test_generate_cyclonedx_with_graph() {
    let dir = project_dir();
    let out = dir.path().join("bom.json");
    let graph = dir.path().join("deps.dot");
    let mut args = offline_args(dir.path());
    args.sbom = Some(SbomTypeArg::Cyclonedx);
    args.format = Some(SbomFormatArg::Yaml);
    args.output_file = Some(out.clone());
    args.graph = Some(graph.clone());

    let report = generate(&args).await;
    assert_eq!(report.sbom_type, SbomType::CycloneDx);
    assert_eq!(report.format, SbomFormat::Json, "CycloneDX is always JSON");

    let bom: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("bom written")).expect("valid JSON");
    assert_eq!(bom["bomFormat"], "CycloneDX");
    assert_eq!(bom["metadata"]["component"]["name"], "demo-app");

    let dot = fs::read_to_string(&graph).expect("graph written");
    assert!(dot.starts_with("digraph \"demo-app\" {"));
    assert!(dot.contains("\"serde_json@1.0.120\" -> \"itoa@1.0.11\";"));
}

#[tokio::test]
async fn test_generate_missing_lockfile_writes_nothing() {
    let dir = TempDir::new().expect("should create temp dir");
    let out = dir.path().join("sbom.spdx");
    let mut args = offline_args(dir.path());
    args.output_file = Some(out.clone());

    let plan = GeneratePlan::resolve(&args, &RustbomConfig::default()).expect("valid plan");
    let scanner = SbomScannerBuilder::new()
        .config(plan.scanner.clone())
        .build()
        .expect("scanner builds");

    let err = run(&scanner, &plan)
        .await
        .expect_err("directory without Cargo.lock is an invalid module");
    assert_eq!(err.exit_code(), 3);
    assert!(!out.exists(), "no output on failure");
}

#[tokio::test]
async fn test_generate_unknown_application_writes_nothing() {
    let dir = project_dir();
    let out = dir.path().join("sbom.json");
    let graph = dir.path().join("deps.dot");
    let mut args = offline_args(dir.path());
    args.application = Some("not-in-lockfile".to_owned());
    args.format = Some(SbomFormatArg::Json);
    args.output_file = Some(out.clone());
    args.graph = Some(graph.clone());

    let plan = GeneratePlan::resolve(&args, &RustbomConfig::default()).expect("valid plan");
    let scanner = SbomScannerBuilder::new()
        .config(plan.scanner.clone())
        .build()
        .expect("scanner builds");

    let err = run(&scanner, &plan)
        .await
        .expect_err("root application absent from the lockfile is an invalid module");
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("not-in-lockfile"));
    assert!(!out.exists(), "no SBOM on failure");
    assert!(!graph.exists(), "no graph on failure");
}

#[test]
fn test_generate_requires_application() {
    let dir = project_dir();
    let mut args = offline_args(dir.path());
    args.application = None;

    let err = GeneratePlan::resolve(&args, &RustbomConfig::default())
        .expect_err("application is required");
    assert_eq!(err.exit_code(), 2);
}
