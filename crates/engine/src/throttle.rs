// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart throttle (§4.B): advisory policy deciding whether and when a
//! crashed job may respawn. Never spawns anything itself.

use std::time::{Duration, Instant};

/// Interval within which a second crash is considered "rapid".
pub const RAPID_WINDOW: Duration = Duration::from_secs(5);
/// Minimum delay imposed after a rapid repeat crash.
pub const COOLDOWN: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    RespawnImmediately,
    Defer(Instant),
    DoNotRespawn,
}

pub struct RestartThrottle;

impl RestartThrottle {
    /// Decide how to react to a child exit. `last_exit_time` is the job's
    /// previous exit timestamp, if any; the caller is responsible for
    /// updating it to `now` after calling this (the throttle itself holds
    /// no state between calls).
    pub fn on_exit(restart_enabled: bool, last_exit_time: Option<Instant>, now: Instant) -> Decision {
        if !restart_enabled {
            return Decision::DoNotRespawn;
        }
        match last_exit_time {
            Some(last) if now.duration_since(last) <= RAPID_WINDOW => {
                Decision::Defer(now + COOLDOWN)
            }
            _ => Decision::RespawnImmediately,
        }
    }
}

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;
