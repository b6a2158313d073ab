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

//! # Plume Renderer
//!
//! The GPU backend of the vector pipeline. Owns the persistent GPU resources
//! (gradient and tessellation textures, static patch geometry, per-frame
//! buffer rings) and turns a recorded frame into an ordered sequence of
//! render passes against the abstract [`GpuDevice`](plume_core::gpu::GpuDevice).
//!
//! Everything here runs on the consumer (render) thread; no other thread may
//! touch this state.

pub mod context;
pub mod flush;
pub mod frame;
pub mod geometry;
pub mod headless;
pub mod lazy_texture;
pub mod passes;
pub mod pipeline_cache;
pub mod ring;
pub mod settings;
pub mod structured;
pub mod target;

pub use context::{FlushStats, RenderContext};
pub use flush::{FlushDescriptor, InterlockMode, LoadAction};
pub use frame::FrameRecorder;
pub use headless::{DeviceCall, HeadlessDevice};
pub use settings::RendererSettings;
pub use target::RenderTarget;
