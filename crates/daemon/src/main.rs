// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardend`: the job supervisor daemon entry point. Wires together the
//! dispatch loop, socket frontends, and signal reaper per §5 — one task
//! owns the dispatcher; everything else talks to it through a channel.

use std::path::PathBuf;
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use warden_core::clock::{Clock, SystemClock};
use warden_daemon::dispatcher::{Dispatcher, Outcome};
use warden_daemon::lifecycle::DaemonState;
use warden_daemon::{listener, logging, reaper};

/// How often the dispatch loop checks due cooldown timers and shutdown
/// completion. Cooldowns are specified to the second, so this is plenty
/// tight without busy-waiting.
const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Request queue depth (§5: "a single ordered request queue"). Generous
/// relative to expected control/event traffic; a full queue only happens
/// under sustained overload, at which point backpressure on `send` is the
/// correct behavior.
const QUEUE_DEPTH: usize = 1024;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/etc/wardend/warden.toml"));

    let state = match DaemonState::start(&config_path) {
        Ok(state) => state,
        Err(error) => {
            eprintln!("wardend: {error}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let _logging_guard = match logging::init(&state.config.log_file, state.config.log_level) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("wardend: failed to initialize logging: {error}");
            return std::process::ExitCode::FAILURE;
        }
    };
    logging::write_startup_marker();

    let control_listener = match listener::bind(&state.config.control_socket) {
        Ok(listener) => listener,
        Err(error) => {
            logging::write_startup_error(&error);
            return std::process::ExitCode::FAILURE;
        }
    };
    let event_listener = match listener::bind(&state.config.event_socket) {
        Ok(listener) => listener,
        Err(error) => {
            logging::write_startup_error(&error);
            return std::process::ExitCode::FAILURE;
        }
    };

    let (tx, mut rx) = mpsc::channel(QUEUE_DEPTH);
    let mut dispatcher = Dispatcher::new(state.config.job_table(), SystemClock);
    dispatcher.run_autostart();

    tokio::spawn(reaper::run(tx.clone()));
    tokio::spawn(listener::control::run(control_listener, tx.clone()));
    tokio::spawn(listener::event::run(event_listener, tx.clone()));
    drop(tx);

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sig) => sig,
        Err(error) => {
            logging::write_startup_error(&error);
            return std::process::ExitCode::FAILURE;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(sig) => sig,
        Err(error) => {
            logging::write_startup_error(&error);
            return std::process::ExitCode::FAILURE;
        }
    };
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            message = rx.recv() => {
                match message {
                    Some(message) => dispatcher.handle_message(message),
                    None => break, // all frontend/reaper tasks gone: nothing left to serve
                }
            }
            _ = tick.tick() => {
                if dispatcher.tick(SystemClock.now()) == Outcome::ShuttingDown {
                    break;
                }
            }
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, shutting down gracefully");
                dispatcher.shutdown_from_signal();
            }
            _ = sigint.recv() => {
                tracing::info!("received SIGINT, shutting down gracefully");
                dispatcher.shutdown_from_signal();
            }
        }
    }

    state.shutdown();
    tracing::info!("wardend exiting");
    std::process::ExitCode::SUCCESS
}
