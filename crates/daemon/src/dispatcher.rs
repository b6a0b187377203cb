// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatcher (§4.E): the single logical critical section through
//! which every job-table mutation, spawn, signal, and event publication
//! passes. Everything here is synchronous and non-blocking except the
//! bounded `spawn`/`signal` syscalls the state machine performs inline —
//! there is no `.await` anywhere in this module, by design (§5).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use warden_core::clock::Clock;
use warden_core::error::DispatchError;
use warden_core::job::{JobConfig, JobName, JobState, Phase};
use warden_engine::state_machine::{self, Request as EngineRequest};
use warden_engine::runner;
use warden_wire::{ErrorCode, JobStatusEntry, Payload, Request, Response};

use crate::bus::EventBus;

/// Bound on how long `terminate` waits for reaps before escalating to KILL.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// A message delivered to the dispatch loop from any concurrent task. This
/// is the "single ordered request queue" of §5: every mutation of dispatcher
/// state arrives through here, never through a shared lock.
pub enum Message {
    Control { request: Request, respond_to: oneshot::Sender<Response> },
    Subscribe {
        filter: Option<JobName>,
        respond_to: oneshot::Sender<(crate::bus::SubscriberId, tokio::sync::mpsc::Receiver<warden_core::event::Event>)>,
    },
    Unsubscribe(crate::bus::SubscriberId),
    ChildExited { pid: u32, exit_status: i32 },
}

/// What the caller of [`Dispatcher::tick`] should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    ShuttingDown,
}

struct Slot {
    config: JobConfig,
    state: JobState,
}

struct PendingWait {
    job: JobName,
    respond_to: oneshot::Sender<Response>,
}

struct ShutdownState {
    deadline: Instant,
    respond_to: oneshot::Sender<Response>,
}

pub struct Dispatcher<C> {
    jobs: HashMap<JobName, Slot>,
    bus: EventBus,
    clock: C,
    timer_queue: BinaryHeap<Reverse<(Instant, JobName)>>,
    live_pids: HashMap<u32, (JobName, u64)>,
    pending_waits: Vec<PendingWait>,
    shutdown: Option<ShutdownState>,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(jobs: HashMap<JobName, JobConfig>, clock: C) -> Self {
        let jobs = jobs
            .into_iter()
            .map(|(name, config)| (name, Slot { config, state: JobState::new() }))
            .collect();
        Self {
            jobs,
            bus: EventBus::new(),
            clock,
            timer_queue: BinaryHeap::new(),
            live_pids: HashMap::new(),
            pending_waits: Vec::new(),
            shutdown: None,
        }
    }

    /// Inject a synthetic start-request for every `autostart` job (§4.C),
    /// before the command frontends open.
    pub fn run_autostart(&mut self) {
        let names: Vec<JobName> =
            self.jobs.iter().filter(|(_, slot)| slot.config.autostart).map(|(name, _)| name.clone()).collect();
        for name in names {
            self.run_transition(&name, EngineRequest::Start);
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_some()
    }

    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::Control { request, respond_to } => self.handle_control(request, respond_to),
            Message::Subscribe { filter, respond_to } => {
                let handle = self.bus.subscribe(filter);
                let _ = respond_to.send(handle);
            }
            Message::Unsubscribe(id) => self.bus.unsubscribe(id),
            Message::ChildExited { pid, exit_status } => self.handle_child_exited(pid, exit_status),
        }
    }

    fn handle_control(&mut self, request: Request, respond_to: oneshot::Sender<Response>) {
        match request {
            Request::Start { job } => {
                let response = self.start(&job);
                let _ = respond_to.send(response);
            }
            Request::Stop { job } => {
                let response = self.stop(&job);
                let _ = respond_to.send(response);
            }
            Request::Status { job } => {
                let response = self.status(&job);
                let _ = respond_to.send(response);
            }
            Request::ListJobs => {
                let _ = respond_to.send(self.list_jobs());
            }
            Request::Wait { job } => self.wait(job, respond_to),
            Request::Terminate => self.begin_shutdown(respond_to),
        }
    }

    fn job_name(&self, raw: &str) -> Option<JobName> {
        self.jobs.keys().find(|name| name.as_str() == raw).cloned()
    }

    fn start(&mut self, raw: &str) -> Response {
        let Some(name) = self.job_name(raw) else {
            return unknown_job_response(raw);
        };
        if self.jobs[&name].state.phase == Phase::Running {
            return dispatch_error_response(DispatchError::AlreadyRunning(name));
        }
        match self.run_transition(&name, EngineRequest::Start) {
            Ok(()) => Response::Ok(None),
            Err(err) => dispatch_error_response(err),
        }
    }

    fn stop(&mut self, raw: &str) -> Response {
        let Some(name) = self.job_name(raw) else {
            return unknown_job_response(raw);
        };
        if self.jobs[&name].state.phase == Phase::Stopped {
            return dispatch_error_response(DispatchError::AlreadyStopped(name));
        }
        match self.run_transition(&name, EngineRequest::Stop) {
            Ok(()) => Response::Ok(None),
            Err(err) => dispatch_error_response(err),
        }
    }

    fn status(&self, raw: &str) -> Response {
        let Some(name) = self.job_name(raw) else {
            return unknown_job_response(raw);
        };
        let phase = self.jobs[&name].state.phase.as_wire_str().to_string();
        Response::Ok(Some(Payload::Phase(phase)))
    }

    fn list_jobs(&self) -> Response {
        let mut entries: Vec<JobStatusEntry> = self
            .jobs
            .iter()
            .map(|(name, slot)| JobStatusEntry {
                name: name.as_str().to_string(),
                status: slot.state.phase.as_wire_str().to_string(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Response::Ok(Some(Payload::Jobs(entries)))
    }

    fn wait(&mut self, raw: String, respond_to: oneshot::Sender<Response>) {
        let Some(name) = self.job_name(&raw) else {
            let _ = respond_to.send(unknown_job_response(&raw));
            return;
        };
        self.pending_waits.push(PendingWait { job: name, respond_to });
    }

    /// Begin graceful shutdown on receipt of SIGTERM/SIGINT — no client is
    /// waiting on a response, unlike the `terminate` control command.
    pub fn shutdown_from_signal(&mut self) {
        let (respond_to, _ignored) = oneshot::channel();
        self.begin_shutdown(respond_to);
    }

    fn begin_shutdown(&mut self, respond_to: oneshot::Sender<Response>) {
        if self.shutdown.is_some() {
            let _ = respond_to.send(Response::Ok(None));
            return;
        }
        for slot in self.jobs.values() {
            if let (Phase::Running, Some(pid)) = (slot.state.phase, slot.state.pid) {
                let _ = runner::signal(pid, slot.config.stop_signal);
            }
        }
        self.shutdown =
            Some(ShutdownState { deadline: self.clock.now() + SHUTDOWN_GRACE, respond_to });
    }

    fn running_count(&self) -> usize {
        self.jobs.values().filter(|slot| slot.state.phase == Phase::Running).count()
    }

    fn handle_child_exited(&mut self, pid: u32, exit_status: i32) {
        let Some((name, generation)) = self.live_pids.remove(&pid) else {
            tracing::warn!(pid, "reap for untracked pid");
            return;
        };
        let _ = self.run_transition(&name, EngineRequest::ChildExited { generation, exit_status });
    }

    /// Drain due cooldown timers and, if shutting down, check for
    /// completion. Called periodically by the dispatch loop (§9: cooldown
    /// timers are a priority queue drained between external requests).
    pub fn tick(&mut self, now: Instant) -> Outcome {
        while let Some(Reverse((at, _))) = self.timer_queue.peek() {
            if *at > now {
                break;
            }
            let Reverse((at, name)) = self.timer_queue.pop().unwrap();
            let still_pending = self
                .jobs
                .get(&name)
                .is_some_and(|slot| slot.state.phase == Phase::CooldownPending && slot.state.cooldown_until == Some(at));
            if still_pending {
                let _ = self.run_transition(&name, EngineRequest::TimerFired);
            }
        }

        if let Some(shutdown) = &self.shutdown {
            if self.running_count() == 0 || now >= shutdown.deadline {
                self.finish_shutdown();
                return Outcome::ShuttingDown;
            }
        }
        Outcome::Continue
    }

    fn finish_shutdown(&mut self) {
        for slot in self.jobs.values() {
            if let (Phase::Running, Some(pid)) = (slot.state.phase, slot.state.pid) {
                let _ = runner::signal(pid, nix::sys::signal::Signal::SIGKILL as i32);
            }
        }
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.respond_to.send(Response::Ok(None));
        }
    }

    fn run_transition(&mut self, name: &JobName, request: EngineRequest) -> Result<(), DispatchError> {
        let Some(slot) = self.jobs.get_mut(name) else { return Ok(()) };
        let result = state_machine::transition(&mut slot.state, &slot.config, request, &self.clock);
        let effects = match result {
            Ok(effects) => effects,
            Err(err) => {
                tracing::warn!(job = name.as_str(), error = %err, "spawn failed");
                Vec::new()
            }
        };
        if let Some(pid) = slot.state.pid {
            self.live_pids.insert(pid, (name.clone(), slot.state.generation));
        }
        for effect in effects {
            self.apply_effect(name, effect);
        }
        result.map(|_| ())
    }

    fn apply_effect(&mut self, name: &JobName, effect: warden_core::effect::Effect) {
        use warden_core::effect::Effect;
        match effect {
            Effect::Publish(event) => {
                let (matured, remaining): (Vec<PendingWait>, Vec<PendingWait>) =
                    self.pending_waits.drain(..).partition(|wait| &wait.job == name);
                self.pending_waits = remaining;
                self.bus.publish(event);
                for wait in matured {
                    let _ = wait.respond_to.send(Response::Ok(None));
                }
            }
            Effect::ScheduleTimer { job, at } => self.timer_queue.push(Reverse((at, job))),
            Effect::CancelTimer { .. } => {}
        }
    }
}

/// Map a [`DispatchError`] to the wire-level response it produces, via its
/// own `wire_code()` (§6/§7: one error model, not two).
fn dispatch_error_response(err: DispatchError) -> Response {
    let code = match err.wire_code() {
        "UNKNOWN_JOB" => ErrorCode::UnknownJob,
        "ALREADY_RUNNING" => ErrorCode::AlreadyRunning,
        "ALREADY_STOPPED" => ErrorCode::AlreadyStopped,
        "SPAWN_FAILED" => ErrorCode::SpawnFailed,
        _ => ErrorCode::BadRequest,
    };
    Response::Err(code)
}

/// A job name absent from the job table. `raw` is almost always a valid,
/// non-empty [`JobName`] (the CLI validates before sending); the fallback
/// only matters for a malformed request with an empty `job` field, which
/// can't be represented as a `DispatchError::UnknownJob` at all.
fn unknown_job_response(raw: &str) -> Response {
    match JobName::new(raw.to_string()) {
        Ok(name) => dispatch_error_response(DispatchError::UnknownJob(name)),
        Err(_) => Response::Err(ErrorCode::UnknownJob),
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
