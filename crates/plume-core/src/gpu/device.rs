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

//! The abstract GPU device and command recording traits.

use super::buffer::{BufferDescriptor, BufferId};
use super::command::{
    BindingResource, ClearValue, CommandBufferId, RenderPassDescriptor,
};
use super::error::ResourceError;
use super::pipeline::{IndexFormat, RenderPipelineDescriptor, RenderPipelineId};
use super::texture::{
    Extent2D, SamplerDescriptor, SamplerId, TextureDescriptor, TextureId,
};
use std::fmt::Debug;
use std::ops::Range;

/// A backend-agnostic representation of a graphics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendType {
    /// Vulkan API.
    Vulkan,
    /// Apple's Metal API.
    Metal,
    /// Microsoft's DirectX 12 API.
    Dx12,
    /// Microsoft's DirectX 11 API.
    Dx11,
    /// OpenGL API.
    OpenGL,
    /// A recording/headless device with no GPU behind it.
    Headless,
    /// An unknown or unsupported backend.
    #[default]
    Unknown,
}

/// The physical type of a graphics device (GPU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceType {
    /// A GPU integrated into the CPU.
    IntegratedGpu,
    /// A discrete, dedicated GPU.
    DiscreteGpu,
    /// A software renderer running on the CPU.
    Cpu,
    /// An unknown or unsupported device type.
    #[default]
    Unknown,
}

/// Identifying information about the adapter behind a device.
#[derive(Debug, Clone, Default)]
pub struct AdapterInfo {
    /// Human-readable adapter name.
    pub name: String,
    /// Which API the device runs on.
    pub backend_type: BackendType,
    /// What kind of hardware backs it.
    pub device_type: DeviceType,
}

/// A trait representing an active render pass, used for recording draws.
///
/// A `RenderPass` object is obtained from a [`CommandEncoder`]; dropping it
/// ends the pass.
pub trait RenderPass<'pass> {
    /// Sets the active render pipeline for subsequent draw calls.
    fn set_pipeline(&mut self, pipeline: RenderPipelineId);

    /// Sets the viewport rectangle in pixels.
    fn set_viewport(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Sets the scissor rectangle in pixels.
    fn set_scissor(&mut self, x: u32, y: u32, width: u32, height: u32);

    /// Sets the stencil reference value for subsequent draws.
    fn set_stencil_reference(&mut self, reference: u32);

    /// Binds a shader-visible resource to a numbered slot.
    fn set_binding(&mut self, slot: u32, resource: BindingResource);

    /// Binds a vertex buffer to a specific stream slot.
    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferId, offset: u64);

    /// Binds an index buffer for indexed drawing.
    fn set_index_buffer(&mut self, buffer: BufferId, offset: u64, format: IndexFormat);

    /// Records a non-indexed draw call.
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);

    /// Records an indexed draw call.
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>);
}

/// A trait for an object that records a sequence of GPU commands.
///
/// The encoder is stateful; render passes borrow it mutably, so only one pass
/// can be open at a time.
pub trait CommandEncoder {
    /// Begins a new render pass, returning the recording object.
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        descriptor: &RenderPassDescriptor<'encoder>,
    ) -> Box<dyn RenderPass<'encoder> + 'encoder>;

    /// Clears a storage texture outside any pass.
    fn clear_texture(&mut self, texture: TextureId, value: ClearValue);

    /// Finalizes recording and returns a handle to the command buffer.
    fn finish(self: Box<Self>) -> CommandBufferId;
}

/// The device interface the renderer is written against.
///
/// Implementations own the native API objects behind the opaque ids. All
/// methods take `&self`; a device is expected to be internally synchronized
/// the way native graphics devices are.
pub trait GpuDevice: Send + Sync + Debug + 'static {
    /// Creates a new GPU buffer.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Creates a new GPU buffer initialized with `data`. Preferred for
    /// static geometry.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Destroys a GPU buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Writes `data` into a buffer at `offset`.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Creates a new GPU texture.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Destroys a GPU texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Uploads texel data covering `size` texels from the origin.
    fn write_texture(
        &self,
        id: TextureId,
        data: &[u8],
        bytes_per_row: Option<u32>,
        size: Extent2D,
    ) -> Result<(), ResourceError>;

    /// Creates a sampler.
    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError>;

    /// Compiles (or retrieves) a render pipeline object.
    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError>;

    /// Destroys a render pipeline object.
    fn destroy_render_pipeline(&self, id: RenderPipelineId) -> Result<(), ResourceError>;

    /// Creates a new command encoder to record GPU commands.
    fn create_command_encoder(&self, label: Option<&str>) -> Box<dyn CommandEncoder>;

    /// Submits a previously recorded command buffer for execution.
    fn submit(&self, command_buffer: CommandBufferId);

    /// Identifying information about the adapter.
    fn adapter_info(&self) -> AdapterInfo;

    /// Indicates whether a named capability is available (e.g.
    /// `"raster-order-views"`, `"typed-uav-loads"`).
    fn supports_feature(&self, feature_name: &str) -> bool;
}
