// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output goes to stderr so stdout stays reserved for the run summary.
//! With the `file-logging` feature and a log directory, every event is also
//! written as JSON to `<log_dir>/neuropart.log`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "neuropart.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writer alive; logs are flushed on drop
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_file: Option<PathBuf>,
    installed: bool,
}

impl LoggingGuard {
    /// Path of the JSON log file, if one is being written
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// False when another global subscriber was already installed
    pub fn installed(&self) -> bool {
        self.installed
    }
}

/// Initialize logging
///
/// # Arguments
/// * `debug_flags` - Crates logged at DEBUG
/// * `default_level` - Level for everything else (e.g. `"info"`)
/// * `log_dir` - Directory for the JSON log file (`file-logging` feature)
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place and report `installed() == false`.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: Option<&Path>,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(default_level);
    let make_filter =
        || EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug_flags.any_enabled())
        .with_filter(make_filter()?)
        .boxed();
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guard, log_file) = match log_dir {
        Some(dir) => {
            let (layer, guard, path) = file_layer(dir, make_filter()?)?;
            layers.push(layer);
            (Some(guard), Some(path))
        }
        None => (None, None),
    };

    #[cfg(not(feature = "file-logging"))]
    let log_file: Option<PathBuf> = None;

    let installed = Registry::default().with(layers).try_init().is_ok();

    #[cfg(not(feature = "file-logging"))]
    if let Some(dir) = log_dir {
        tracing::warn!(
            "Log directory {} ignored: built without the file-logging feature",
            dir.display()
        );
    }

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guard: file_guard,
        log_file,
        installed,
    })
}

#[cfg(feature = "file-logging")]
fn file_layer(
    dir: &Path,
    filter: EnvFilter,
) -> Result<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(filter)
        .boxed();

    Ok((layer, guard, dir.join(LOG_FILE_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        let flags = CrateDebugFlags::from_names(["neuropart-observability"]);
        let first = init_logging(&flags, "info", None).unwrap();
        let second = init_logging(&flags, "info", None).unwrap();

        assert!(!(first.installed() && second.installed()));
        assert!(second.log_file().is_none());
    }

    #[test]
    fn test_invalid_default_level_is_an_error() {
        let flags = CrateDebugFlags::default();
        assert!(init_logging(&flags, "neuropart=loud", None).is_err());
    }
}
