// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job state machine (§4.C).
//!
//! Idempotent cases (`start` on `Running`, `stop` on `Stopped`) are not
//! rows in this table — they are `AlreadyRunning`/`AlreadyStopped` checks
//! the dispatcher makes against `JobState::phase` before ever calling
//! [`transition`], per the error table in §7. Everything that reaches this
//! function is a genuine transition.

use std::time::Instant;

use warden_core::clock::Clock;
use warden_core::effect::Effect;
use warden_core::error::DispatchError;
use warden_core::event::{Event, ExternalPhase};
use warden_core::job::{JobConfig, JobState, Phase};

use crate::runner;
use crate::throttle::{Decision, RestartThrottle};

/// An event the state machine reacts to.
#[derive(Debug, Clone, Copy)]
pub enum Request {
    /// Client asked to start a `Stopped` or `CooldownPending` job.
    Start,
    /// Client asked to stop a `Running` or `CooldownPending` job.
    Stop,
    /// The reaper observed this job's child exit.
    ChildExited { generation: u64, exit_status: i32 },
    /// The cooldown timer for this job fired.
    TimerFired,
}

/// Apply `request` to `state`, returning the effects the dispatcher must
/// perform (bus publication, timer (re)scheduling). `spawn`/`signal` are
/// invoked inline, not deferred as effects (see module docs on [`crate`]).
pub fn transition(
    state: &mut JobState,
    config: &JobConfig,
    request: Request,
    clock: &impl Clock,
) -> Result<Vec<Effect>, DispatchError> {
    match request {
        Request::Start => start(state, config, clock),
        Request::Stop => stop(state, config),
        Request::ChildExited { generation, exit_status } => {
            child_exited(state, config, generation, exit_status, clock)
        }
        Request::TimerFired => timer_fired(state, config, clock),
    }
}

fn start(
    state: &mut JobState,
    config: &JobConfig,
    clock: &impl Clock,
) -> Result<Vec<Effect>, DispatchError> {
    let mut effects = Vec::new();
    if state.phase == Phase::CooldownPending {
        effects.push(Effect::CancelTimer { job: config.name.clone() });
        state.cooldown_until = None;
    }
    let pid = runner::spawn(config).map_err(|source| DispatchError::SpawnFailed {
        job: config.name.clone(),
        reason: source.to_string(),
    })?;
    state.phase = Phase::Running;
    state.pid = Some(pid);
    state.generation += 1;
    effects.push(publish(config, ExternalPhase::Running, clock.now()));
    Ok(effects)
}

fn stop(state: &mut JobState, config: &JobConfig) -> Result<Vec<Effect>, DispatchError> {
    match state.phase {
        Phase::Running => {
            if let Some(pid) = state.pid {
                let _ = runner::signal(pid, config.stop_signal);
            }
            // Phase stays Running: "Stopped-pending-reap" is not a distinct
            // user-visible phase. STOPPED publishes on reap, not here.
            Ok(Vec::new())
        }
        Phase::CooldownPending => {
            state.phase = Phase::Stopped;
            state.cooldown_until = None;
            Ok(vec![Effect::CancelTimer { job: config.name.clone() }])
        }
        Phase::Stopped => Ok(Vec::new()),
    }
}

fn child_exited(
    state: &mut JobState,
    config: &JobConfig,
    generation: u64,
    exit_status: i32,
    clock: &impl Clock,
) -> Result<Vec<Effect>, DispatchError> {
    if generation != state.generation {
        // Stale reap: the pid belonged to a superseded incarnation.
        return Ok(Vec::new());
    }
    let now = clock.now();
    state.pid = None;
    state.last_exit_status = Some(exit_status);

    if !config.restart {
        state.phase = Phase::Stopped;
        state.last_exit_time = Some(now);
        tracing::info!(
            job = config.name.as_str(),
            exit_status,
            "child exited, restart disabled, not respawning"
        );
        return Ok(vec![publish(config, ExternalPhase::Stopped, now)]);
    }

    let decision = RestartThrottle::on_exit(true, state.last_exit_time, now);
    state.last_exit_time = Some(now);

    match decision {
        Decision::DoNotRespawn => {
            state.phase = Phase::Stopped;
            Ok(vec![publish(config, ExternalPhase::Stopped, now)])
        }
        Decision::RespawnImmediately => {
            let mut effects = vec![publish(config, ExternalPhase::Stopped, now)];
            match runner::spawn(config) {
                Ok(pid) => {
                    state.phase = Phase::Running;
                    state.pid = Some(pid);
                    state.generation += 1;
                    effects.push(publish(config, ExternalPhase::Running, clock.now()));
                    Ok(effects)
                }
                Err(source) => {
                    state.phase = Phase::Stopped;
                    Err(DispatchError::SpawnFailed {
                        job: config.name.clone(),
                        reason: source.to_string(),
                    })
                }
            }
        }
        Decision::Defer(until) => {
            state.phase = Phase::CooldownPending;
            state.cooldown_until = Some(until);
            Ok(vec![
                publish(config, ExternalPhase::Stopped, now),
                Effect::ScheduleTimer { job: config.name.clone(), at: until },
            ])
        }
    }
}

fn timer_fired(
    state: &mut JobState,
    config: &JobConfig,
    clock: &impl Clock,
) -> Result<Vec<Effect>, DispatchError> {
    if state.phase != Phase::CooldownPending {
        return Ok(Vec::new());
    }
    state.cooldown_until = None;
    match runner::spawn(config) {
        Ok(pid) => {
            state.phase = Phase::Running;
            state.pid = Some(pid);
            state.generation += 1;
            Ok(vec![publish(config, ExternalPhase::Running, clock.now())])
        }
        Err(source) => {
            state.phase = Phase::Stopped;
            Err(DispatchError::SpawnFailed {
                job: config.name.clone(),
                reason: source.to_string(),
            })
        }
    }
}

fn publish(config: &JobConfig, phase: ExternalPhase, at: Instant) -> Effect {
    Effect::Publish(Event::new(config.name.clone(), phase, at))
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
