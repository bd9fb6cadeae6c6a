//! Tracing subscriber setup.
//!
//! Logs go to stderr and, when a log file is configured (`logging.file` or
//! `$GATEWAY_LOG_FILE`), are also appended to that file. `RUST_LOG` wins over
//! `logging.level`.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::defaults::{DEFAULT_LOG_LEVEL, LOG_FILE_ENV_VAR};
use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

/// Resolve the log file path: `$GATEWAY_LOG_FILE` first, then config.
pub fn log_file_path(config: &LoggingConfig) -> Option<PathBuf> {
    resolve_log_file(std::env::var_os(LOG_FILE_ENV_VAR), config)
}

fn resolve_log_file(env_value: Option<OsString>, config: &LoggingConfig) -> Option<PathBuf> {
    env_value
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| config.file.clone())
}

/// Plain stderr subscriber for use before the config is loaded.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_target(false)
        .finish()
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(config.format, std::io::stderr, true)];

    // A log file that cannot be opened is not fatal; stderr still works.
    let mut file_error = None;
    if let Some(path) = log_file_path(config) {
        match open_append(&path) {
            Ok(file) => layers.push(fmt_layer(config.format, Mutex::new(file), false)),
            Err(e) => file_error = Some((path, e)),
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some((path, e)) = file_error {
        tracing::warn!(path = %path.display(), error = %e, "Could not open log file, logging to stderr only");
    }
    Ok(())
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
