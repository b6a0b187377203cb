// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus (§4.D): single-producer, multi-subscriber fanout of state-change
//! records. Every subscriber gets its own bounded channel; a subscriber whose
//! channel fills up (it is not reading fast enough) is disconnected rather
//! than having records silently dropped in front of it.

use warden_core::event::Event;

/// Per-subscriber buffer depth before the slow-consumer policy kicks in.
pub const HIGH_WATER_MARK: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub(crate) u64);

struct Subscriber {
    id: SubscriberId,
    filter: Option<warden_core::job::JobName>,
    sender: tokio::sync::mpsc::Sender<Event>,
}

/// Owned by the dispatcher; never shared or locked (§5: the job table and
/// subscriber set are private to the dispatcher).
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self { subscribers: Vec::new(), next_id: 0 }
    }

    /// Register a subscriber, optionally filtered to a single job. Returns
    /// its handle and the receiving end of its channel.
    pub fn subscribe(
        &mut self,
        filter: Option<warden_core::job::JobName>,
    ) -> (SubscriberId, tokio::sync::mpsc::Receiver<Event>) {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = tokio::sync::mpsc::channel(HIGH_WATER_MARK);
        self.subscribers.push(Subscriber { id, filter, sender });
        (id, receiver)
    }

    /// Idempotent: unsubscribing an id that is not (or no longer) registered
    /// is a no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|sub| sub.id != id);
    }

    /// Publish to every current subscriber whose filter matches. Subscribers
    /// whose buffer is full are disconnected (dropping the sender closes
    /// their receiver, which ends their socket-frontend task).
    pub fn publish(&mut self, event: Event) {
        self.subscribers.retain(|sub| {
            if let Some(filter) = &sub.filter {
                if filter != &event.job {
                    return true;
                }
            }
            match sub.sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = sub.id.0, "slow subscriber disconnected");
                    false
                }
                Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
