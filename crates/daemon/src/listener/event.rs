// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event endpoint: each accepted connection becomes one subscriber,
//! streaming newline-delimited `{"job":..,"status":..}` records until the
//! client disconnects (§4.F, §6).

use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};

use warden_wire::{write_message, EventMessage};

use crate::bus::SubscriberId;
use crate::dispatcher::Message;

pub async fn run(listener: UnixListener, tx: mpsc::Sender<Message>) {
    loop {
        let (stream, _addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(error) => {
                tracing::warn!(%error, "event socket accept failed");
                continue;
            }
        };
        let tx = tx.clone();
        tokio::spawn(handle_connection(stream, tx));
    }
}

async fn handle_connection(mut stream: UnixStream, tx: mpsc::Sender<Message>) {
    let (id, mut events) = match subscribe(&tx).await {
        Some(pair) => pair,
        None => return,
    };

    while let Some(event) = events.recv().await {
        let message = EventMessage::from(&event);
        if write_message(&mut stream, &message).await.is_err() {
            break;
        }
    }

    let _ = tx.send(Message::Unsubscribe(id)).await;
}

async fn subscribe(
    tx: &mpsc::Sender<Message>,
) -> Option<(SubscriberId, mpsc::Receiver<warden_core::event::Event>)> {
    let (respond_to, reply) = oneshot::channel();
    tx.send(Message::Subscribe { filter: None, respond_to }).await.ok()?;
    reply.await.ok()
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
