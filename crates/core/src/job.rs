// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job configuration, phase, and mutable per-job state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// The POSIX signal sent to stop a job's child process by default (SIGTERM).
pub const DEFAULT_STOP_SIGNAL: i32 = 15;

/// A validated, non-empty job name. Immutable once a job's configuration is
/// loaded; used as the key into the job table and as the wire-level `job`
/// field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobName(String);

impl JobName {
    /// Construct a job name, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidJobName> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvalidJobName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for JobName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("job name must not be empty")]
pub struct InvalidJobName;

/// Job configuration, immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: JobName,
    /// Command string interpreted by a POSIX shell (`sh -c <command>`).
    pub command: String,
    /// Path to read stdin from; missing defaults to the null device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<PathBuf>,
    /// Path to append stdout to; missing defaults to the null device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<PathBuf>,
    /// Path to append stderr to; missing defaults to the null device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<PathBuf>,
    /// Environment overlay applied on top of the daemon's own environment;
    /// overlay wins on key collision.
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,
    /// POSIX signal number sent to request a graceful stop.
    #[serde(default = "default_stop_signal")]
    pub stop_signal: i32,
    #[serde(default)]
    pub autostart: bool,
    #[serde(default)]
    pub restart: bool,
    /// Informational only; surfaced in `list-jobs`/`status` payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_stop_signal() -> i32 {
    DEFAULT_STOP_SIGNAL
}

fn default_cwd() -> PathBuf {
    PathBuf::from(".")
}

impl JobConfig {
    pub fn builder(name: JobName, command: impl Into<String>) -> JobConfigBuilder {
        JobConfigBuilder {
            name,
            command: command.into(),
            stdin: None,
            stdout: None,
            stderr: None,
            env: HashMap::new(),
            cwd: PathBuf::from("."),
            stop_signal: DEFAULT_STOP_SIGNAL,
            autostart: false,
            restart: false,
            description: None,
        }
    }
}

pub struct JobConfigBuilder {
    name: JobName,
    command: String,
    stdin: Option<PathBuf>,
    stdout: Option<PathBuf>,
    stderr: Option<PathBuf>,
    env: HashMap<String, String>,
    cwd: PathBuf,
    stop_signal: i32,
    autostart: bool,
    restart: bool,
    description: Option<String>,
}

impl JobConfigBuilder {
    crate::setters! {
        into {
            cwd: PathBuf,
        }
        set {
            env: HashMap<String, String>,
            stop_signal: i32,
            autostart: bool,
            restart: bool,
        }
        option {
            stdin: PathBuf,
            stdout: PathBuf,
            stderr: PathBuf,
            description: String,
        }
    }

    pub fn build(self) -> JobConfig {
        JobConfig {
            name: self.name,
            command: self.command,
            stdin: self.stdin,
            stdout: self.stdout,
            stderr: self.stderr,
            env: self.env,
            cwd: self.cwd,
            stop_signal: self.stop_signal,
            autostart: self.autostart,
            restart: self.restart,
            description: self.description,
        }
    }
}

/// Observable lifecycle phase of a job.
///
/// `CooldownPending` is an internal phase only: it is not a distinct
/// user-visible phase any more than "Stopped-pending-reap" is (see
/// [`Phase::is_externally_running`]) — from the outside a job with no live
/// child is simply stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Stopped,
    Running,
    CooldownPending,
}

crate::simple_display! {
    Phase {
        Stopped => "stopped",
        Running => "running",
        CooldownPending => "cooldown_pending",
    }
}

impl Phase {
    /// Collapse the internal three-phase model to the two-valued phase the
    /// wire protocol and CLI expose.
    pub fn is_externally_running(self) -> bool {
        matches!(self, Phase::Running)
    }

    pub fn as_wire_str(self) -> &'static str {
        if self.is_externally_running() {
            "RUNNING"
        } else {
            "STOPPED"
        }
    }
}

/// Mutable per-job state. One instance per configured job, for the
/// supervisor's entire lifetime.
#[derive(Debug, Clone)]
pub struct JobState {
    pub phase: Phase,
    /// The OS process id, defined only while `phase == Running`.
    pub pid: Option<u32>,
    /// Monotonic timestamp of the most recent child termination.
    pub last_exit_time: Option<Instant>,
    /// Monotonic timestamp at which a `CooldownPending` job becomes
    /// eligible to respawn.
    pub cooldown_until: Option<Instant>,
    /// Incremented on every spawn; discards stale reap events.
    pub generation: u64,
    /// Exit status of the most recently reaped child, if any. Not part of
    /// the wire protocol; surfaced only through logs (S4).
    pub last_exit_status: Option<i32>,
}

impl JobState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Stopped,
            pid: None,
            last_exit_time: None,
            cooldown_until: None,
            generation: 0,
            last_exit_status: None,
        }
    }
}

impl Default for JobState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
