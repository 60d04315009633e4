//! CLI-specific error types and exit code mapping

use rustbom_core::error::{RustbomError, SbomError};
use rustbom_sbom_scanner::SbomScannerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Neither `-a/--application` nor `scan.application` names the root package.
    #[error(
        "no root application given: pass -a/--application or set scan.application in rustbom.toml"
    )]
    MissingApplication,

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from rustbom-core.
    #[error("{0}")]
    Core(#[from] RustbomError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                         |
    /// |------|-------------------------------------------------|
    /// | 0    | Success                                         |
    /// | 1    | General / command error                         |
    /// | 2    | Configuration error or missing root application |
    /// | 3    | Invalid module (lockfile absent, empty, broken) |
    /// | 10   | IO error                                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::MissingApplication => 2,
            Self::Io(_) => 10,
            Self::Core(RustbomError::Config(_)) => 2,
            Self::Core(RustbomError::Sbom(SbomError::InvalidModule(_) | SbomError::ParseFailed(_))) => 3,
            Self::Core(RustbomError::Io(_)) => 10,
            Self::Core(RustbomError::Sbom(_)) | Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<SbomScannerError> for CliError {
    fn from(e: SbomScannerError) -> Self {
        Self::Core(e.into())
    }
}
