use std::path::PathBuf;

use report_core::error::{ReportError, Result};
use report_core::settings::Settings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is the CLI's uppercase level name, mapped to a
/// [`tracing_subscriber::EnvFilter`] directive. Unrecognised names fall back
/// to `"info"`. Diagnostics go to stderr so the report itself owns stdout.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-path resolution ───────────────────────────────────────────────────────

/// Check that the configured data directory exists and return it.
///
/// The source file paths themselves are checked later by the store; this
/// catches a wrong `--data-dir` before any parsing starts.
pub fn resolve_data_dir(settings: &Settings) -> Result<PathBuf> {
    if !settings.data_dir.exists() {
        return Err(ReportError::DataPathNotFound(settings.data_dir.clone()));
    }
    Ok(settings.data_dir.clone())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
