#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`SbomScannerError`)
//! - [`config`]: Scanner configuration (`SbomScannerConfig`, builder)
//! - [`types`]: Domain types (`PackageDeclaration`, `PackageRecord`, `RelationshipEdge`, `SbomDocument`)
//! - [`parser`]: Lockfile parsers (`LockfileParser` trait, `CargoLockParser`, `LockfileDetector`)
//! - [`index`]: Package index keyed by `(name, version)` (`PackageIndex`)
//! - [`reconcile`]: Dependency reconciliation (`reconcile`, `Reconciliation`)
//! - [`registry`]: Registry collaborator (`RegistryClient` trait, `CratesIoClient`, `StaticRegistry`)
//! - [`supplier`]: Supplier classification from originator text
//! - [`license`]: License normalization (`LicenseNormalizer` trait, `SpdxLicenseNormalizer`)
//! - [`enrich`]: Concurrent metadata enrichment (`Enricher`, `EnrichmentSummary`)
//! - [`sbom`]: SBOM document generation (`SbomGenerator`, SPDX, CycloneDX, DOT)
//! - [`scanner`]: Main orchestrator (`SbomScanner`, `SbomScannerBuilder`, `ScanResult`)
//!
//! # Architecture
//!
//! ```text
//! dependency_dir --> LockfileDetector --> CargoLockParser --> Vec<PackageDeclaration>
//!                                                                    |
//!                                                               reconcile()
//!                                                                    |
//!                                          PackageIndex + Vec<RelationshipEdge>
//!                                                                    |
//!                                         Enricher --> RegistryClient (crates.io)
//!                                                                    |
//!                                                               ScanResult
//!                                                                    |
//!                                            +-----------------------+
//!                                            |                       |
//!                                      SbomGenerator             sbom::dot
//!                                            |                       |
//!                                      SbomDocument             DOT graph
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod index;
pub mod license;
pub mod parser;
pub mod reconcile;
pub mod registry;
pub mod sbom;
pub mod scanner;
pub mod supplier;
pub mod types;

// --- Public API Re-exports ---

// Scanner (main orchestrator)
pub use scanner::{SbomScanner, SbomScannerBuilder, ScanResult};

// Configuration
pub use config::{SbomScannerConfig, SbomScannerConfigBuilder};

// Error
pub use error::SbomScannerError;

// Types
pub use types::{
    DependencySpec, PackageDeclaration, PackageKey, PackageRecord, PackageSource,
    RelationshipEdge, RelationshipKind, SbomDocument, SbomFormat, SbomType, Supplier, SupplierKind,
};

// Parser
pub use parser::cargo::CargoLockParser;
pub use parser::{LockfileDetector, LockfileParser};

// Reconciliation
pub use index::{PackageId, PackageIndex};
pub use reconcile::{Reconciliation, reconcile};

// Enrichment
pub use enrich::{Enricher, EnrichmentSummary};
pub use license::{LicenseNormalizer, SpdxLicenseNormalizer};
pub use registry::crates_io::CratesIoClient;
pub use registry::{RegistryClient, RegistryMetadata, StaticRegistry};

// SBOM Generator
pub use sbom::{SbomGenerator, SbomInput};
