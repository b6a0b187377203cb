// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal reaper (§4.G). `tokio::signal::unix::signal(SignalKind::child())`
//! plays the role of the self-pipe described in §9: the OS coalesces
//! repeated SIGCHLD into one wakeup, so every wake drains *all* available
//! children with a non-blocking wait rather than assuming one wake means one
//! exited child.

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc::Sender;

use crate::dispatcher::Message;

/// Runs until `tx` is closed (supervisor shutdown). Installing the SIGCHLD
/// handler can only fail at startup, so a failure here is fatal (§7).
pub async fn run(tx: Sender<Message>) -> std::io::Result<()> {
    let mut sigchld = signal(SignalKind::child())?;
    loop {
        if sigchld.recv().await.is_none() {
            return Ok(());
        }
        drain(&tx);
    }
}

fn drain(tx: &Sender<Message>) {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, status)) => {
                send(tx, pid.as_raw() as u32, status);
            }
            Ok(WaitStatus::Signaled(pid, signal, _core_dumped)) => {
                send(tx, pid.as_raw() as u32, 128 + signal as i32);
            }
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return,
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(_) => return,
        }
    }
}

fn send(tx: &Sender<Message>, pid: u32, exit_status: i32) {
    if tx.try_send(Message::ChildExited { pid, exit_status }).is_err() {
        tracing::error!(pid, "dispatch queue full or closed, dropping reap event");
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
