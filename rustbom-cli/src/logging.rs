//! Logging initialization for the rustbom CLI.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `RustbomConfig` plus the `--log-level` / `--debug` flags. All log output
//! goes to stderr so that an SBOM written to stdout stays machine-readable.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustbom_core::config::GeneralConfig;

/// Pick the filter directive to use.
///
/// Precedence: `--debug`, then `--log-level`, then `RUST_LOG`, then the
/// configured `general.log_level`.
pub fn filter_directive(
    config: &GeneralConfig,
    log_level_override: Option<&str>,
    debug: bool,
    rust_log: Option<String>,
) -> String {
    if debug {
        return "debug".to_owned();
    }
    if let Some(level) = log_level_override {
        return level.to_owned();
    }
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => config.log_level.clone(),
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable colored output (default)
pub fn init_tracing(
    config: &GeneralConfig,
    log_level_override: Option<&str>,
    debug: bool,
) -> Result<()> {
    let directive = filter_directive(
        config,
        log_level_override,
        debug,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let env_filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", directive, e))?;

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}
