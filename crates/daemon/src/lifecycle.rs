// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance enforcement and startup/shutdown housekeeping. Modeled on
//! the lock-file dance of a typical Unix daemon: an exclusive advisory lock
//! on a well-known file prevents two supervisors from managing the same
//! sockets and jobs at once.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::DaemonConfig;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("wardend is already running (lock held on {path})")]
    AlreadyRunning { path: PathBuf },
    #[error("opening lock file {path}: {source}")]
    LockFile { path: PathBuf, #[source] source: std::io::Error },
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Holds the daemon's configuration and its exclusive lock file for the
/// supervisor's entire lifetime. Dropping this releases the lock.
pub struct DaemonState {
    pub config: DaemonConfig,
    lock_file: File,
}

impl DaemonState {
    /// Load configuration and acquire the single-instance lock. Returns
    /// [`LifecycleError::AlreadyRunning`] if another supervisor already
    /// holds it — a fatal startup error per §7.
    pub fn start(config_path: &Path) -> Result<Self, LifecycleError> {
        let config = DaemonConfig::load(config_path)?;
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&config.lock_file)
            .map_err(|source| LifecycleError::LockFile { path: config.lock_file.clone(), source })?;
        lock_file.try_lock_exclusive().map_err(|_| LifecycleError::AlreadyRunning {
            path: config.lock_file.clone(),
        })?;
        let mut lock_file = lock_file;
        let _ = lock_file.set_len(0);
        let _ = write!(lock_file, "{}", std::process::id());
        Ok(Self { config, lock_file })
    }

    /// Remove the control and event socket files so a future startup does
    /// not have to race a stale bind. The lock is released when `self` drops.
    pub fn shutdown(&self) {
        let _ = std::fs::remove_file(&self.config.control_socket);
        let _ = std::fs::remove_file(&self.config.event_socket);
    }
}

impl Drop for DaemonState {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.lock_file);
        let _ = std::fs::remove_file(&self.config.lock_file);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
