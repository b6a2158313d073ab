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

//! # Plume Commands
//!
//! The cross-thread command pipeline. A producer-side [`CommandBuilder`]
//! encodes intents (load a file, instantiate an artboard, set a view-model
//! property, draw) as plain-data commands, a thread-safe [`CommandQueue`]
//! hands them across, and the consumer-side [`CommandServer`] drains the
//! queue once per render tick and applies every command, in enqueue order,
//! to the live runtime objects.
//!
//! The producer never blocks; results travel back through per-request reply
//! channels. Handles are allocated optimistically before the consumer-side
//! object exists, so producers can chain commands without round trips.

pub mod builder;
pub mod command;
pub mod queue;
pub mod reply;
pub mod server;

pub use builder::{CommandBuilder, CommandSet};
pub use command::{
    Command, DirectDrawCallback, DrawArtboardCommand, DrawCommand, DrawKey, RequestId,
    ServerCallback,
};
pub use queue::{Acknowledgement, CommandQueue};
pub use reply::{CommandError, Reply, Subscription};
pub use server::CommandServer;
