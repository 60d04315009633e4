//! Output formatting abstraction for text vs JSON rendering
//!
//! Command reports flow through [`OutputWriter`], which handles format switching.
//! SBOM and graph artifacts bypass it and go through [`write_artifact`], since
//! their format is chosen by `--sbom` / `--format` rather than `--output`.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Where a command report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStream {
    /// Standard output
    Stdout,
    /// Standard error (used when stdout carries the SBOM itself)
    Stderr,
}

/// Abstraction for writing CLI reports in different formats.
///
/// Subcommand handlers call `writer.render(&payload)` where `payload`
/// implements both `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rustbom_cli::output::OutputWriter;
    /// use rustbom_cli::cli::OutputFormat;
    ///
    /// let writer = OutputWriter::new(OutputFormat::Text);
    /// ```
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        self.render_on(ReportStream::Stdout, payload)
    }

    /// Render a payload to the given standard stream.
    pub fn render_on<T: Render + Serialize>(
        &self,
        stream: ReportStream,
        payload: &T,
    ) -> Result<(), CliError> {
        match stream {
            ReportStream::Stdout => self.render_to(&mut std::io::stdout().lock(), payload),
            ReportStream::Stderr => self.render_to(&mut std::io::stderr().lock(), payload),
        }
    }

    /// Render a payload into an arbitrary writer.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render_to<T: Render + Serialize>(
        &self,
        w: &mut dyn Write,
        payload: &T,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => {
                payload.render_text(w)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Write a generated artifact to `path`, or to stdout when `path` is `None`.
///
/// A trailing newline is appended when the content lacks one.
pub async fn write_artifact(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            let mut bytes = content.as_bytes().to_vec();
            if !content.ends_with('\n') {
                bytes.push(b'\n');
            }
            tokio::fs::write(path, bytes).await?;
        }
        None => {
            let mut handle = std::io::stdout().lock();
            handle.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(handle)?;
            }
            handle.flush()?;
        }
    }
    Ok(())
}
