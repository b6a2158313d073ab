// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The thread-safe handoff between producer and consumer.
//!
//! One unbounded FIFO channel carries commands from the builder to the
//! server; a second carries acknowledgements (handle destructions) back so
//! the producer can recycle arena slots. The queue itself is the only piece
//! of shared state; everything on either side of it is single-threaded.

use crate::command::{Command, DrawKey};
use plume_core::handle::RawHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// A consumer-to-producer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The object behind `RawHandle` was destroyed; its slot may be reused.
    Destroyed(RawHandle),
}

/// The FIFO connecting one producer thread to one consumer thread.
#[derive(Debug)]
pub struct CommandQueue {
    commands_tx: flume::Sender<Command>,
    commands_rx: flume::Receiver<Command>,
    acks_tx: flume::Sender<Acknowledgement>,
    acks_rx: flume::Receiver<Acknowledgement>,
    next_draw_key: AtomicU64,
    disconnected: AtomicBool,
}

impl CommandQueue {
    /// Creates a queue. Shared by exactly one builder and one server.
    pub fn new() -> Arc<Self> {
        let (commands_tx, commands_rx) = flume::unbounded();
        let (acks_tx, acks_rx) = flume::unbounded();
        Arc::new(Self {
            commands_tx,
            commands_rx,
            acks_tx,
            acks_rx,
            next_draw_key: AtomicU64::new(1),
            disconnected: AtomicBool::new(false),
        })
    }

    /// Enqueues a command. After [`disconnect`](Self::disconnect) the
    /// command is dropped with an error log; the producer API stays
    /// non-panicking through teardown.
    pub(crate) fn send(&self, command: Command) {
        if self.disconnected.load(Ordering::Acquire) {
            log::error!("CommandQueue: dropping {command:?} after disconnect");
            return;
        }
        if let Err(e) = self.commands_tx.send(command) {
            log::error!("CommandQueue: failed to send command: {e}");
        }
    }

    /// The consumer's end of the command channel.
    pub(crate) fn commands(&self) -> &flume::Receiver<Command> {
        &self.commands_rx
    }

    /// Posts an acknowledgement back to the producer.
    pub(crate) fn acknowledge(&self, ack: Acknowledgement) {
        if let Err(e) = self.acks_tx.send(ack) {
            log::debug!("CommandQueue: acknowledgement dropped: {e}");
        }
    }

    /// The producer's end of the acknowledgement channel.
    pub(crate) fn acknowledgements(&self) -> &flume::Receiver<Acknowledgement> {
        &self.acks_rx
    }

    /// Allocates a fresh draw key. Each render target gets exactly one,
    /// lazily, on first draw.
    pub fn create_draw_key(&self) -> DrawKey {
        DrawKey(self.next_draw_key.fetch_add(1, Ordering::Relaxed))
    }

    /// Marks the queue as shut down. Already-enqueued commands still drain;
    /// new sends are dropped. The server's drain loop observes this and
    /// stops.
    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::Release);
    }

    /// `true` once [`disconnect`](Self::disconnect) was called.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_keys_are_unique() {
        let queue = CommandQueue::new();
        let a = queue.create_draw_key();
        let b = queue.create_draw_key();
        assert_ne!(a, b);
    }

    #[test]
    fn disconnect_drops_new_sends_but_keeps_queued() {
        let queue = CommandQueue::new();
        queue.send(Command::RunOnce(Box::new(|_| {})));
        queue.disconnect();
        queue.send(Command::RunOnce(Box::new(|_| {})));
        // The pre-disconnect command is still there; the post-disconnect one
        // was dropped.
        assert_eq!(queue.commands().len(), 1);
        assert!(queue.is_disconnected());
    }
}
