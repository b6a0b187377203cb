// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration: working directory, socket paths, log sink, and
//! the `name -> JobConfig` table. Loaded from a TOML file; shell-variable
//! expansion and path resolution are the config loader's job, not ours (§6),
//! so every path here is already resolved by the time it reaches [`DaemonConfig`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use warden_core::job::{JobConfig, JobName};

/// Log verbosity, mapped onto a `tracing` [`EnvFilter`](tracing_subscriber::EnvFilter) directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// The validated, in-memory configuration the core consumes (§6).
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    pub working_dir: PathBuf,
    pub control_socket: PathBuf,
    pub event_socket: PathBuf,
    pub lock_file: PathBuf,
    pub log_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    #[serde(default, rename = "job")]
    jobs: Vec<JobConfig>,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("parsing config file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
    #[error("duplicate job name {0:?}")]
    DuplicateJob(String),
}

impl DaemonConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: DaemonConfig = toml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        let mut seen = std::collections::HashSet::new();
        for job in &config.jobs {
            if !seen.insert(job.name.clone()) {
                return Err(ConfigError::DuplicateJob(job.name.as_str().to_string()));
            }
        }
        Ok(config)
    }

    /// The configured jobs as a lookup table, in the order they were declared.
    pub fn job_table(&self) -> HashMap<JobName, JobConfig> {
        self.jobs.iter().cloned().map(|job| (job.name.clone(), job)).collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
