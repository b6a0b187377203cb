// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single request/response round trip over the control socket.

use std::path::Path;

use tokio::io::BufReader;
use tokio::net::UnixStream;

use warden_wire::{read_message, write_message, Request, Response};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connecting to {path}: {source}")]
    Connect { path: std::path::PathBuf, #[source] source: std::io::Error },
    #[error(transparent)]
    Protocol(#[from] warden_wire::ProtocolError),
    #[error("connection closed before a response arrived")]
    NoResponse,
}

pub async fn send(socket: &Path, request: Request) -> Result<Response, ClientError> {
    let stream = UnixStream::connect(socket)
        .await
        .map_err(|source| ClientError::Connect { path: socket.to_path_buf(), source })?;
    let (read_half, mut write_half) = stream.into_split();
    write_message(&mut write_half, &request).await?;

    let mut reader = BufReader::new(read_half);
    let line = read_message(&mut reader).await?.ok_or(ClientError::NoResponse)?;
    Ok(warden_wire::decode(&line)?)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
