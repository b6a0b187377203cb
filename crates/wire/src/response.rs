// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-socket response shapes (§6).

use serde::{Deserialize, Serialize};

/// One entry of a `list-jobs` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusEntry {
    pub name: String,
    pub status: String,
}

/// The `payload` field of a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Phase(String),
    Jobs(Vec<JobStatusEntry>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "UNKNOWN_JOB")]
    UnknownJob,
    #[serde(rename = "ALREADY_RUNNING")]
    AlreadyRunning,
    #[serde(rename = "ALREADY_STOPPED")]
    AlreadyStopped,
    #[serde(rename = "SPAWN_FAILED")]
    SpawnFailed,
    #[serde(rename = "BAD_REQUEST")]
    BadRequest,
}

/// A control-socket response: `{"ok": true, "payload": ...}` or
/// `{"ok": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResponseWire", try_from = "ResponseWire")]
pub enum Response {
    Ok(Option<Payload>),
    Err(ErrorCode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseWire {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ErrorCode>,
}

impl From<Response> for ResponseWire {
    fn from(response: Response) -> Self {
        match response {
            Response::Ok(payload) => ResponseWire { ok: true, payload, error: None },
            Response::Err(error) => ResponseWire { ok: false, payload: None, error: Some(error) },
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("response has ok=false with no error, or ok=true with an error set")]
pub struct MalformedResponse;

impl TryFrom<ResponseWire> for Response {
    type Error = MalformedResponse;

    fn try_from(wire: ResponseWire) -> Result<Self, Self::Error> {
        match (wire.ok, wire.error) {
            (true, None) => Ok(Response::Ok(wire.payload)),
            (false, Some(error)) => Ok(Response::Err(error)),
            _ => Err(MalformedResponse),
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
