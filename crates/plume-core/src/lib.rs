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

//! # Plume Core
//!
//! Foundational crate containing the contracts the rest of the pipeline is
//! written against: the math primitives, the generation-tagged handle arena,
//! the native animation-runtime interface, and the backend-agnostic GPU
//! device interface.
//!
//! Nothing in this crate touches a thread or a GPU; it defines the "what",
//! while `plume-renderer` and `plume-commands` provide the "how".

#![warn(missing_docs)]

pub mod gpu;
pub mod handle;
pub mod math;
pub mod runtime;
pub mod utils;

pub use handle::{
    ArtboardHandle, FileHandle, HandleArena, HandleState, RawHandle, RenderImageHandle,
    RenderTargetHandle, StateMachineHandle, ViewModelHandle,
};
