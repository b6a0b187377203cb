// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: a non-blocking file appender plus an `EnvFilter` derived
//! from the configured log level (overridable via `RUST_LOG`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Install the global subscriber. The returned guard must be held for the
/// supervisor's entire lifetime — dropping it stops the background writer
/// thread and silently truncates buffered log lines.
pub fn init(log_file: &Path, level: LogLevel) -> std::io::Result<WorkerGuard> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file_appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or_else(|| Path::new(".")),
        log_file.file_name().unwrap_or_else(|| std::ffi::OsStr::new("wardend.log")),
    );
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|error| std::io::Error::other(error.to_string()))?;

    Ok(guard)
}

/// Write a single-line startup marker, used by operators grepping the log
/// for successive supervisor lifetimes.
pub fn write_startup_marker() {
    tracing::info!(pid = std::process::id(), "wardend starting up");
}

pub fn write_startup_error(error: &dyn std::error::Error) {
    tracing::error!(%error, "wardend failed to start");
}
