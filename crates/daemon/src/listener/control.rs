// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control endpoint: one accepted connection may carry many
//! newline-delimited request/response pairs (§4.F parenthetical —
//! "or per newline-delimited message").

use tokio::io::BufReader;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};

use warden_wire::{read_message, write_message, Request, Response};

use crate::dispatcher::Message;

pub async fn run(listener: UnixListener, tx: mpsc::Sender<Message>) {
    loop {
        let (stream, _addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(error) => {
                tracing::warn!(%error, "control socket accept failed");
                continue;
            }
        };
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(error) = handle_connection(stream, tx).await {
                tracing::debug!(%error, "control connection ended");
            }
        });
    }
}

async fn handle_connection(
    stream: UnixStream,
    tx: mpsc::Sender<Message>,
) -> Result<(), warden_wire::ProtocolError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let Some(line) = read_message(&mut reader).await? else {
            return Ok(());
        };
        let response = match warden_wire::decode::<Request>(&line) {
            Ok(request) => dispatch(&tx, request).await,
            Err(_) => Response::Err(warden_wire::ErrorCode::BadRequest),
        };
        write_message(&mut write_half, &response).await?;
    }
}

async fn dispatch(tx: &mpsc::Sender<Message>, request: Request) -> Response {
    let (respond_to, reply) = oneshot::channel();
    if tx.send(Message::Control { request, respond_to }).await.is_err() {
        return Response::Err(warden_wire::ErrorCode::BadRequest);
    }
    reply.await.unwrap_or(Response::Err(warden_wire::ErrorCode::BadRequest))
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
