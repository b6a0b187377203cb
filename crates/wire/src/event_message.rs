// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-socket message shape (§6): `{"job": name, "status": "RUNNING"|"STOPPED"}`.

use serde::{Deserialize, Serialize};
use warden_core::event::{Event, ExternalPhase};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub job: String,
    pub status: String,
}

impl From<&Event> for EventMessage {
    fn from(event: &Event) -> Self {
        let status = match event.phase {
            ExternalPhase::Running => "RUNNING",
            ExternalPhase::Stopped => "STOPPED",
        };
        EventMessage { job: event.job.to_string(), status: status.into() }
    }
}

#[cfg(test)]
#[path = "event_message_tests.rs"]
mod tests;
