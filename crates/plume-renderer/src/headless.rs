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

//! A recording device with no GPU behind it.
//!
//! The headless device implements the full [`GpuDevice`] contract and logs
//! every operation it receives. Commands recorded into an encoder surface in
//! the log only once the command buffer is submitted, mirroring how a real
//! device defers execution; immediate operations (buffer and texture writes)
//! log at call time. Tests and the demo assert on the resulting call stream.

use plume_core::gpu::{
    AdapterInfo, BackendType, BindingResource, BufferDescriptor, BufferId, ClearValue,
    CommandBufferId, CommandEncoder, DeviceType, Extent2D, GpuDevice, IndexFormat, LoadOp,
    PrimitiveTopology, RenderPass, RenderPassDescriptor, RenderPipelineDescriptor,
    RenderPipelineId, ResourceError, SamplerDescriptor, SamplerId, ShaderKind, TextureDescriptor,
    TextureId, VertexLayout,
};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Mutex};

/// One recorded device operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    /// A buffer was created.
    CreateBuffer {
        /// Assigned id.
        id: BufferId,
        /// Descriptor label.
        label: Option<String>,
        /// Requested size in bytes.
        size: u64,
    },
    /// A buffer was destroyed.
    DestroyBuffer(BufferId),
    /// Bytes were uploaded into a buffer.
    WriteBuffer {
        /// Target buffer.
        id: BufferId,
        /// Upload offset.
        offset: u64,
        /// Upload length in bytes.
        len: u64,
    },
    /// A texture was created.
    CreateTexture {
        /// Assigned id.
        id: TextureId,
        /// Descriptor label.
        label: Option<String>,
        /// Texture dimensions.
        size: Extent2D,
    },
    /// A texture was destroyed.
    DestroyTexture(TextureId),
    /// Texels were uploaded into a texture.
    WriteTexture {
        /// Target texture.
        id: TextureId,
        /// Upload length in bytes.
        len: u64,
    },
    /// A sampler was created.
    CreateSampler(SamplerId),
    /// A pipeline object was compiled.
    CreatePipeline {
        /// Assigned id.
        id: RenderPipelineId,
        /// Shader program of the pipeline.
        shader: ShaderKind,
        /// Vertex layout of the pipeline.
        vertex_layout: VertexLayout,
        /// Primitive topology of the pipeline.
        topology: PrimitiveTopology,
    },
    /// A pipeline object was destroyed.
    DestroyPipeline(RenderPipelineId),
    /// A storage texture was cleared outside a pass.
    ClearTexture {
        /// Cleared texture.
        texture: TextureId,
        /// Clear value.
        value: ClearValue,
    },
    /// A render pass began.
    BeginPass {
        /// Pass label.
        label: Option<String>,
        /// Color attachment texture and load op, when rasterizing into one.
        color_attachment: Option<(TextureId, LoadOp)>,
    },
    /// A pipeline was bound.
    SetPipeline(RenderPipelineId),
    /// The viewport was set.
    SetViewport {
        /// Viewport width in pixels.
        width: f32,
        /// Viewport height in pixels.
        height: f32,
    },
    /// The scissor rectangle was set.
    SetScissor {
        /// Scissor width in pixels.
        width: u32,
        /// Scissor height in pixels.
        height: u32,
    },
    /// The stencil reference was set.
    SetStencilReference(u32),
    /// A resource was bound to a slot.
    SetBinding {
        /// Binding slot.
        slot: u32,
    },
    /// A vertex buffer was bound.
    SetVertexBuffer {
        /// Stream slot.
        slot: u32,
        /// Bound buffer.
        buffer: BufferId,
    },
    /// An index buffer was bound.
    SetIndexBuffer {
        /// Bound buffer.
        buffer: BufferId,
    },
    /// A non-indexed draw was recorded.
    Draw {
        /// Vertex range.
        vertices: Range<u32>,
        /// Instance range.
        instances: Range<u32>,
    },
    /// An indexed draw was recorded.
    DrawIndexed {
        /// Index range.
        indices: Range<u32>,
        /// Base vertex added to each index.
        base_vertex: i32,
        /// Instance range.
        instances: Range<u32>,
    },
    /// A render pass ended.
    EndPass,
    /// A command buffer was submitted.
    Submit(CommandBufferId),
}

#[derive(Debug, Default)]
struct DeviceState {
    next_id: usize,
    next_command_buffer: u64,
    calls: Vec<DeviceCall>,
    pending: HashMap<u64, Vec<DeviceCall>>,
}

impl DeviceState {
    fn next(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

/// A [`GpuDevice`] that records instead of rendering.
#[derive(Debug)]
pub struct HeadlessDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl HeadlessDevice {
    /// Creates a fresh recording device.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(DeviceState::default())),
        })
    }

    /// Returns and clears the recorded call log.
    pub fn take_calls(&self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.state.lock().unwrap().calls)
    }

    /// A copy of the recorded call log.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of draw calls in the log.
    pub fn draw_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::Draw { .. } | DeviceCall::DrawIndexed { .. }))
            .count()
    }
}

impl GpuDevice for HeadlessDevice {
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        let mut state = self.state.lock().unwrap();
        let id = BufferId(state.next());
        state.calls.push(DeviceCall::CreateBuffer {
            id,
            label: descriptor.label.as_ref().map(|l| l.to_string()),
            size: descriptor.size,
        });
        Ok(id)
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let id = self.create_buffer(descriptor)?;
        self.state.lock().unwrap().calls.push(DeviceCall::WriteBuffer {
            id,
            offset: 0,
            len: data.len() as u64,
        });
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(DeviceCall::DestroyBuffer(id));
        Ok(())
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        self.state.lock().unwrap().calls.push(DeviceCall::WriteBuffer {
            id,
            offset,
            len: data.len() as u64,
        });
        Ok(())
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        let mut state = self.state.lock().unwrap();
        let id = TextureId(state.next());
        state.calls.push(DeviceCall::CreateTexture {
            id,
            label: descriptor.label.as_ref().map(|l| l.to_string()),
            size: descriptor.size,
        });
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(DeviceCall::DestroyTexture(id));
        Ok(())
    }

    fn write_texture(
        &self,
        id: TextureId,
        data: &[u8],
        _bytes_per_row: Option<u32>,
        _size: Extent2D,
    ) -> Result<(), ResourceError> {
        self.state.lock().unwrap().calls.push(DeviceCall::WriteTexture {
            id,
            len: data.len() as u64,
        });
        Ok(())
    }

    fn create_sampler(&self, _descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError> {
        let mut state = self.state.lock().unwrap();
        let id = SamplerId(state.next());
        state.calls.push(DeviceCall::CreateSampler(id));
        Ok(id)
    }

    fn create_render_pipeline(
        &self,
        descriptor: &RenderPipelineDescriptor,
    ) -> Result<RenderPipelineId, ResourceError> {
        let mut state = self.state.lock().unwrap();
        let id = RenderPipelineId(state.next());
        state.calls.push(DeviceCall::CreatePipeline {
            id,
            shader: descriptor.shader,
            vertex_layout: descriptor.vertex_layout,
            topology: descriptor.topology,
        });
        Ok(id)
    }

    fn destroy_render_pipeline(&self, id: RenderPipelineId) -> Result<(), ResourceError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(DeviceCall::DestroyPipeline(id));
        Ok(())
    }

    fn create_command_encoder(&self, label: Option<&str>) -> Box<dyn CommandEncoder> {
        Box::new(HeadlessEncoder {
            state: Arc::clone(&self.state),
            label: label.map(|l| l.to_string()),
            calls: Vec::new(),
        })
    }

    fn submit(&self, command_buffer: CommandBufferId) {
        let mut state = self.state.lock().unwrap();
        match state.pending.remove(&command_buffer.0) {
            Some(recorded) => {
                state.calls.extend(recorded);
                state.calls.push(DeviceCall::Submit(command_buffer));
            }
            None => {
                log::error!("HeadlessDevice: submit of unknown command buffer {command_buffer:?}");
            }
        }
    }

    fn adapter_info(&self) -> AdapterInfo {
        AdapterInfo {
            name: "Headless".to_string(),
            backend_type: BackendType::Headless,
            device_type: DeviceType::Cpu,
        }
    }

    fn supports_feature(&self, feature_name: &str) -> bool {
        matches!(feature_name, "typed-uav-loads")
    }
}

struct HeadlessEncoder {
    state: Arc<Mutex<DeviceState>>,
    label: Option<String>,
    calls: Vec<DeviceCall>,
}

impl CommandEncoder for HeadlessEncoder {
    fn begin_render_pass<'encoder>(
        &'encoder mut self,
        descriptor: &RenderPassDescriptor<'encoder>,
    ) -> Box<dyn RenderPass<'encoder> + 'encoder> {
        self.calls.push(DeviceCall::BeginPass {
            label: descriptor.label.map(|l| l.to_string()),
            color_attachment: descriptor
                .color_attachment
                .map(|attachment| (attachment.texture, attachment.load)),
        });
        Box::new(HeadlessPass {
            calls: &mut self.calls,
        })
    }

    fn clear_texture(&mut self, texture: TextureId, value: ClearValue) {
        self.calls.push(DeviceCall::ClearTexture { texture, value });
    }

    fn finish(self: Box<Self>) -> CommandBufferId {
        let mut state = self.state.lock().unwrap();
        state.next_command_buffer += 1;
        let id = CommandBufferId(state.next_command_buffer);
        log::trace!(
            "HeadlessEncoder({:?}): finished with {} calls",
            self.label,
            self.calls.len()
        );
        state.pending.insert(id.0, self.calls);
        id
    }
}

struct HeadlessPass<'encoder> {
    calls: &'encoder mut Vec<DeviceCall>,
}

impl Drop for HeadlessPass<'_> {
    fn drop(&mut self) {
        self.calls.push(DeviceCall::EndPass);
    }
}

impl<'pass> RenderPass<'pass> for HeadlessPass<'pass> {
    fn set_pipeline(&mut self, pipeline: RenderPipelineId) {
        self.calls.push(DeviceCall::SetPipeline(pipeline));
    }

    fn set_viewport(&mut self, _x: f32, _y: f32, width: f32, height: f32) {
        self.calls.push(DeviceCall::SetViewport { width, height });
    }

    fn set_scissor(&mut self, _x: u32, _y: u32, width: u32, height: u32) {
        self.calls.push(DeviceCall::SetScissor { width, height });
    }

    fn set_stencil_reference(&mut self, reference: u32) {
        self.calls.push(DeviceCall::SetStencilReference(reference));
    }

    fn set_binding(&mut self, slot: u32, _resource: BindingResource) {
        self.calls.push(DeviceCall::SetBinding { slot });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferId, _offset: u64) {
        self.calls.push(DeviceCall::SetVertexBuffer { slot, buffer });
    }

    fn set_index_buffer(&mut self, buffer: BufferId, _offset: u64, _format: IndexFormat) {
        self.calls.push(DeviceCall::SetIndexBuffer { buffer });
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.calls.push(DeviceCall::Draw {
            vertices,
            instances,
        });
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.calls.push(DeviceCall::DrawIndexed {
            indices,
            base_vertex,
            instances,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::gpu::BufferUsage;
    use std::borrow::Cow;

    #[test]
    fn encoded_work_surfaces_only_after_submit() {
        let device = HeadlessDevice::new();
        let mut encoder = device.create_command_encoder(Some("test"));
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("pass"),
                color_attachment: None,
            });
            pass.draw(0..3, 0..1);
        }
        let buffer = encoder.finish();
        assert_eq!(device.calls(), vec![], "nothing visible before submit");
        device.submit(buffer);
        let calls = device.take_calls();
        assert!(matches!(calls.first(), Some(DeviceCall::BeginPass { .. })));
        assert!(matches!(calls.last(), Some(DeviceCall::Submit(_))));
    }

    #[test]
    fn immediate_writes_log_at_call_time() {
        let device = HeadlessDevice::new();
        let buffer = device
            .create_buffer(&BufferDescriptor {
                label: Some(Cow::Borrowed("b")),
                size: 16,
                usage: BufferUsage::VERTEX,
            })
            .unwrap();
        device.write_buffer(buffer, 0, &[0; 8]).unwrap();
        let calls = device.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[1], DeviceCall::WriteBuffer { len: 8, .. }));
    }
}
