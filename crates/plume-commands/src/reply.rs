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

//! Reply channels correlating asynchronous results to their requests.
//!
//! Every command that produces a result carries the sending half of a
//! single-shot channel; the caller keeps the [`Reply`]. Producers choose how
//! to consume it — poll it, block with a timeout, or drop it if the outcome
//! doesn't matter. Subscriptions are the multi-shot variant of the same
//! idea.

use crate::command::RequestId;
use plume_core::runtime::PropertyUpdate;
use std::time::Duration;

/// Why a command failed on the consumer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The file bytes could not be decoded.
    #[error("file decode failed: {0}")]
    DecodeFailed(String),
    /// A named artboard/state machine/view model/property does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// What kind of thing was looked up.
        kind: &'static str,
        /// The name that missed.
        name: String,
    },
    /// The command referenced a destroyed or never-resolved handle.
    #[error("command referenced a dead or unresolved handle")]
    InvalidHandle,
    /// The property exists but has a different type.
    #[error("property '{name}' has a different type")]
    WrongType {
        /// The property name.
        name: String,
    },
    /// The queue was disconnected before the reply arrived.
    #[error("the command queue is disconnected")]
    Disconnected,
}

/// The sending half of a reply, carried inside the command.
pub(crate) type ReplySender<T> = flume::Sender<Result<T, CommandError>>;

/// A pending asynchronous result, keyed by its [`RequestId`].
///
/// Replies arrive after the consumer drains the command; until then
/// [`try_take`](Reply::try_take) returns `None`. Dropping a `Reply` is fine —
/// the consumer's send just goes nowhere.
#[derive(Debug)]
pub struct Reply<T> {
    request_id: RequestId,
    receiver: flume::Receiver<Result<T, CommandError>>,
}

impl<T> Reply<T> {
    /// The request this reply answers.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Non-blocking poll. `None` while the command has not executed yet.
    pub fn try_take(&self) -> Option<Result<T, CommandError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => Some(Err(CommandError::Disconnected)),
        }
    }

    /// Blocks until the result arrives.
    pub fn wait(&self) -> Result<T, CommandError> {
        self.receiver
            .recv()
            .unwrap_or(Err(CommandError::Disconnected))
    }

    /// Blocks up to `timeout`. `None` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, CommandError>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(flume::RecvTimeoutError::Timeout) => None,
            Err(flume::RecvTimeoutError::Disconnected) => Some(Err(CommandError::Disconnected)),
        }
    }
}

/// Creates a single-shot reply channel for `request_id`.
pub(crate) fn reply_channel<T>(request_id: RequestId) -> (ReplySender<T>, Reply<T>) {
    let (sender, receiver) = flume::bounded(1);
    (
        sender,
        Reply {
            request_id,
            receiver,
        },
    )
}

/// A stream of property updates from a subscription.
#[derive(Debug)]
pub struct Subscription {
    request_id: RequestId,
    receiver: flume::Receiver<PropertyUpdate>,
}

impl Subscription {
    /// The request that registered this subscription; quote it to
    /// unsubscribe.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Non-blocking poll for the next update.
    pub fn try_next(&self) -> Option<PropertyUpdate> {
        self.receiver.try_recv().ok()
    }

    /// Drains every update currently queued.
    pub fn drain(&self) -> Vec<PropertyUpdate> {
        self.receiver.try_iter().collect()
    }

    /// Blocks up to `timeout` for the next update.
    pub fn next_timeout(&self, timeout: Duration) -> Option<PropertyUpdate> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

/// Creates a subscription stream for `request_id`.
pub(crate) fn subscription_channel(
    request_id: RequestId,
) -> (flume::Sender<PropertyUpdate>, Subscription) {
    let (sender, receiver) = flume::unbounded();
    (
        sender,
        Subscription {
            request_id,
            receiver,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_polls_empty_then_delivers() {
        let (sender, reply) = reply_channel::<u32>(RequestId(7));
        assert_eq!(reply.request_id(), RequestId(7));
        assert!(reply.try_take().is_none());
        sender.send(Ok(42)).unwrap();
        assert_eq!(reply.try_take(), Some(Ok(42)));
    }

    #[test]
    fn dropped_sender_reads_as_disconnected() {
        let (sender, reply) = reply_channel::<u32>(RequestId(1));
        drop(sender);
        assert_eq!(reply.try_take(), Some(Err(CommandError::Disconnected)));
    }

    #[test]
    fn subscription_drains_in_order() {
        use plume_core::runtime::PropertyValue;
        let (sender, subscription) = subscription_channel(RequestId(3));
        for i in 0..3 {
            sender
                .send(PropertyUpdate {
                    name: "speed".into(),
                    value: PropertyValue::Number(i as f32),
                })
                .unwrap();
        }
        let updates = subscription.drain();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[2].value, PropertyValue::Number(2.0));
    }
}
