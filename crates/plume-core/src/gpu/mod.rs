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

//! Backend-agnostic GPU device contract.
//!
//! This module defines the "common language" the renderer speaks to whatever
//! native graphics API hosts it. It contains the abstract [`GpuDevice`] and
//! recording traits, the resource descriptors and ids, the pipeline state
//! model, and the byte-exact data structures the vector pipeline streams
//! into GPU buffers. The 'how' lives in a concrete device implementation
//! (the `plume-renderer` crate ships a recording headless one; a production
//! host supplies its own on top of its RHI).

pub mod buffer;
pub mod command;
pub mod data;
pub mod device;
pub mod error;
pub mod pipeline;
pub mod texture;

pub use buffer::{BufferDescriptor, BufferId, BufferUsage};
pub use command::{
    BindingResource, ClearValue, ColorAttachment, CommandBufferId, LoadOp, RenderPassDescriptor,
    StoreOp,
};
pub use data::{
    ContourData, DrawBatch, DrawType, FlushUniforms, GradientSpan, ImageDrawUniforms, PaintAuxData,
    PaintData, PathData, ShaderFeatures, TessVertexSpan, TriangleVertex,
};
pub use device::{AdapterInfo, BackendType, CommandEncoder, DeviceType, GpuDevice, RenderPass};
pub use error::{RenderError, ResourceError};
pub use pipeline::{
    BlendComponent, BlendEquation, BlendFactor, BlendOperation, BlendStateDescriptor, ColorWrites,
    CompareFunction, CullMode, DepthStencilStateDescriptor, FrontFace, IndexFormat, PipelineState,
    PolygonMode, PrimitiveTopology, RenderPipelineDescriptor, RenderPipelineId, ShaderKind,
    StencilFaceState, StencilOperation, StencilState, VertexLayout,
};
pub use texture::{
    Extent2D, SamplerDescriptor, SamplerFilter, SamplerId, TextureDescriptor, TextureFormat,
    TextureId, TextureUsage,
};
