// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-socket request shapes (§6).

use serde::{Deserialize, Serialize};

/// A request sent to the control endpoint. One JSON object per
/// newline-delimited message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Request {
    #[serde(rename = "start")]
    Start { job: String },
    #[serde(rename = "stop")]
    Stop { job: String },
    #[serde(rename = "status")]
    Status { job: String },
    #[serde(rename = "list-jobs")]
    ListJobs,
    #[serde(rename = "wait")]
    Wait { job: String },
    #[serde(rename = "terminate")]
    Terminate,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
