// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job lifecycle engine: spawning and signaling child processes,
//! restart throttling, and the per-job state machine. Pure with respect to
//! the network and the event bus — every function here is synchronously
//! testable with a [`warden_core::Clock`].

pub mod runner;
pub mod state_machine;
pub mod throttle;

pub use runner::{signal, spawn, SignalError, SpawnError};
pub use state_machine::{transition, Request as StateRequest};
pub use throttle::{Decision, RestartThrottle};
