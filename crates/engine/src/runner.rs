// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job runner (§4.A): owns no state of its own. `spawn` and `signal` are
//! synchronous helpers invoked directly from the dispatch loop — §5
//! permits the dispatcher to block on these two bounded syscalls.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::process::Stdio;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use warden_core::job::JobConfig;

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("failed to open {path} for job stdio: {source}")]
    Stdio { path: String, #[source] source: std::io::Error },
    #[error("failed to spawn /bin/sh: {0}")]
    Exec(#[source] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("invalid signal number {0}")]
    InvalidSignal(i32),
    #[error("failed to signal pid {pid}: {source}")]
    Kill { pid: u32, #[source] source: Errno },
}

/// Spawn the job's command under `/bin/sh -c`, with stdio redirected per
/// config and the daemon's environment overlaid by `config.env`. The
/// returned pid is not reaped by this function or the [`std::process::Child`]
/// it briefly owns: reaping is the signal reaper's job (§4.G), via a
/// process-wide non-blocking `waitpid`, so the `Child` handle is dropped
/// here without ever being waited on.
pub fn spawn(config: &JobConfig) -> Result<u32, SpawnError> {
    let stdin = open_input(config.stdin.as_deref())?;
    let stdout = open_output(config.stdout.as_deref())?;
    let stderr = open_output(config.stderr.as_deref())?;

    let child = std::process::Command::new("/bin/sh")
        .arg("-c")
        .arg(&config.command)
        .current_dir(&config.cwd)
        .envs(&config.env)
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .spawn()
        .map_err(SpawnError::Exec)?;

    Ok(child.id())
}

/// Send `signo` to `pid`. Not an error if the process has already exited
/// (tolerates the race with the reaper, per §4.A).
pub fn signal(pid: u32, signo: i32) -> Result<(), SignalError> {
    let signal = Signal::try_from(signo).map_err(|_| SignalError::InvalidSignal(signo))?;
    match kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(source) => Err(SignalError::Kill { pid, source }),
    }
}

fn open_input(path: Option<&Path>) -> Result<File, SpawnError> {
    match path {
        Some(path) => {
            OpenOptions::new().read(true).open(path).map_err(|source| SpawnError::Stdio {
                path: path.display().to_string(),
                source,
            })
        }
        None => open_null(),
    }
}

fn open_output(path: Option<&Path>) -> Result<File, SpawnError> {
    match path {
        Some(path) => {
            OpenOptions::new().append(true).create(true).open(path).map_err(|source| {
                SpawnError::Stdio { path: path.display().to_string(), source }
            })
        }
        None => open_null(),
    }
}

fn open_null() -> Result<File, SpawnError> {
    OpenOptions::new().read(true).write(true).open("/dev/null").map_err(|source| {
        SpawnError::Stdio { path: "/dev/null".into(), source }
    })
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
