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

//! The native animation-runtime contract.
//!
//! The command server drives a vector-animation runtime it does not own:
//! file decoding, artboard behavior, state machine evaluation and view-model
//! data binding are a fixed third-party concern, expressed here as traits.
//! The pipeline never reaches through this boundary; everything it needs is
//! a method on one of these objects.
//!
//! The one place the flow reverses is drawing: an artboard renders itself by
//! writing spans, records and draw batches into a [`DrawSink`], which the
//! renderer implements on top of its per-frame buffer rings.

pub mod contract;
pub mod error;
pub mod sink;
pub mod value;

pub use contract::{
    ArtboardResource, FileResource, SharedArtboard, SharedStateMachine, SharedViewModel,
    StateMachineResource, VectorRuntime, ViewModelInstanceResource,
};
pub use error::DecodeError;
pub use sink::DrawSink;
pub use value::{
    DataType, DefaultViewModelInfo, EnumDefinition, FileMetadata, PointerEvent,
    PropertyDefinition, PropertyUpdate, PropertyValue,
};
