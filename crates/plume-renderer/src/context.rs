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

//! The render context: persistent GPU state plus per-flush pass sequencing.
//!
//! Constructed once at startup and threaded explicitly into everything that
//! needs it; there is no ambient/global context. All state here is owned
//! exclusively by the consumer (render) thread.

use crate::flush::{FlushDescriptor, InterlockMode, LoadAction};
use crate::frame::FrameRecorder;
use crate::geometry::{
    build_patch_indices, build_patch_vertices, GRAD_TEXTURE_WIDTH, IMAGE_RECT_INDICES,
    IMAGE_RECT_VERTICES, TESS_SPAN_INDICES, TESS_TEXTURE_WIDTH,
};
use crate::lazy_texture::LazyTexture;
use crate::passes::{self, bindings};
use crate::pipeline_cache::PipelineCache;
use crate::ring::{BufferRing, MappedBuffer};
use crate::settings::RendererSettings;
use crate::structured::StructuredBuffer;
use crate::target::RenderTarget;
use plume_core::gpu::{
    BindingResource, BufferDescriptor, BufferId, BufferUsage, ClearValue, ColorAttachment,
    ColorWrites, ContourData, DrawType, Extent2D, FlushUniforms, GpuDevice, ImageDrawUniforms,
    LoadOp, PaintAuxData, PaintData, PathData, RenderError, ResourceError, SamplerDescriptor,
    SamplerFilter, SamplerId, ShaderFeatures, StoreOp,
};
use plume_core::math::Color;
use std::borrow::Cow;
use std::sync::Arc;

/// Running counters over the context's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Completed flushes.
    pub flush_count: u64,
    /// Render passes emitted.
    pub pass_count: u64,
    /// Draw calls emitted.
    pub draw_count: u64,
}

/// Owns the persistent GPU resources of the vector pipeline and sequences
/// per-flush pass invocation.
pub struct RenderContext {
    device: Arc<dyn GpuDevice>,
    settings: RendererSettings,
    pipelines: PipelineCache,

    pub(crate) flush_uniform_ring: BufferRing,
    pub(crate) image_draw_uniform_ring: BufferRing,
    pub(crate) grad_span_ring: BufferRing,
    pub(crate) tess_span_ring: BufferRing,
    pub(crate) triangle_ring: BufferRing,

    pub(crate) path_buffer: StructuredBuffer<PathData>,
    pub(crate) paint_buffer: StructuredBuffer<PaintData>,
    pub(crate) paint_aux_buffer: StructuredBuffer<PaintAuxData>,
    pub(crate) contour_buffer: StructuredBuffer<ContourData>,

    gradient_texture: LazyTexture,
    tessellation_texture: LazyTexture,
    atlas_texture: LazyTexture,

    patch_vertex_buffer: BufferId,
    patch_index_buffer: BufferId,
    image_rect_vertex_buffer: BufferId,
    image_rect_index_buffer: BufferId,
    tess_span_index_buffer: BufferId,

    linear_sampler: SamplerId,
    mipmap_sampler: SamplerId,

    stats: FlushStats,
}

impl RenderContext {
    /// Creates the context, allocating static geometry and samplers up
    /// front. Per-frame rings start at the configured initial capacity and
    /// grow on demand.
    pub fn new(
        device: Arc<dyn GpuDevice>,
        settings: RendererSettings,
    ) -> Result<Self, ResourceError> {
        let dev = device.as_ref();
        let slots = settings.frames_in_flight.max(2);
        let cap = settings.initial_ring_capacity.max(256);

        let patch_vertices = build_patch_vertices();
        let patch_indices = build_patch_indices();
        let patch_vertex_buffer = dev.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("plume.patch_vertices")),
                size: std::mem::size_of_val(patch_vertices.as_slice()) as u64,
                usage: BufferUsage::VERTEX,
            },
            bytemuck::cast_slice(&patch_vertices),
        )?;
        let patch_index_buffer = dev.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("plume.patch_indices")),
                size: std::mem::size_of_val(patch_indices.as_slice()) as u64,
                usage: BufferUsage::INDEX,
            },
            bytemuck::cast_slice(&patch_indices),
        )?;
        let image_rect_vertex_buffer = dev.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("plume.image_rect_vertices")),
                size: std::mem::size_of_val(&IMAGE_RECT_VERTICES) as u64,
                usage: BufferUsage::VERTEX,
            },
            bytemuck::cast_slice(&IMAGE_RECT_VERTICES),
        )?;
        let image_rect_index_buffer = dev.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("plume.image_rect_indices")),
                size: std::mem::size_of_val(&IMAGE_RECT_INDICES) as u64,
                usage: BufferUsage::INDEX,
            },
            bytemuck::cast_slice(&IMAGE_RECT_INDICES),
        )?;
        let tess_span_index_buffer = dev.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Borrowed("plume.tess_span_indices")),
                size: std::mem::size_of_val(&TESS_SPAN_INDICES) as u64,
                usage: BufferUsage::INDEX,
            },
            bytemuck::cast_slice(&TESS_SPAN_INDICES),
        )?;

        let linear_sampler = dev.create_sampler(&SamplerDescriptor {
            label: Some(Cow::Borrowed("plume.linear")),
            filter: SamplerFilter::Linear,
        })?;
        let mipmap_sampler = dev.create_sampler(&SamplerDescriptor {
            label: Some(Cow::Borrowed("plume.mipmap")),
            filter: SamplerFilter::LinearMipmap,
        })?;

        use plume_core::gpu::{TextureFormat, TextureUsage};
        Ok(Self {
            flush_uniform_ring: BufferRing::new(
                dev,
                "plume.flush_uniforms",
                BufferUsage::UNIFORM | BufferUsage::VOLATILE,
                slots,
                cap,
            )?,
            image_draw_uniform_ring: BufferRing::new(
                dev,
                "plume.image_draw_uniforms",
                BufferUsage::UNIFORM | BufferUsage::VOLATILE,
                slots,
                cap,
            )?,
            grad_span_ring: BufferRing::new(
                dev,
                "plume.grad_spans",
                BufferUsage::VERTEX | BufferUsage::VOLATILE,
                slots,
                cap,
            )?,
            tess_span_ring: BufferRing::new(
                dev,
                "plume.tess_spans",
                BufferUsage::VERTEX | BufferUsage::VOLATILE,
                slots,
                cap,
            )?,
            triangle_ring: BufferRing::new(
                dev,
                "plume.triangles",
                BufferUsage::VERTEX | BufferUsage::VOLATILE,
                slots,
                cap,
            )?,
            path_buffer: StructuredBuffer::new("plume.paths"),
            paint_buffer: StructuredBuffer::new("plume.paints"),
            paint_aux_buffer: StructuredBuffer::new("plume.paint_aux"),
            contour_buffer: StructuredBuffer::new("plume.contours"),
            gradient_texture: LazyTexture::new(
                "plume.gradient",
                TextureFormat::Rgba8Unorm,
                TextureUsage::SAMPLED | TextureUsage::RENDER_TARGET,
            ),
            tessellation_texture: LazyTexture::new(
                "plume.tessellation",
                TextureFormat::Rgba32Uint,
                TextureUsage::SAMPLED | TextureUsage::RENDER_TARGET,
            ),
            atlas_texture: LazyTexture::new(
                "plume.atlas",
                TextureFormat::R16Float,
                TextureUsage::SAMPLED | TextureUsage::RENDER_TARGET,
            ),
            patch_vertex_buffer,
            patch_index_buffer,
            image_rect_vertex_buffer,
            image_rect_index_buffer,
            tess_span_index_buffer,
            linear_sampler,
            mipmap_sampler,
            pipelines: PipelineCache::new(),
            device,
            settings,
            stats: FlushStats::default(),
        })
    }

    /// The device this context renders through.
    pub fn device(&self) -> Arc<dyn GpuDevice> {
        Arc::clone(&self.device)
    }

    /// The settings the context was built with.
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Lifetime counters.
    pub fn stats(&self) -> FlushStats {
        self.stats
    }

    /// Number of pipeline objects compiled so far.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Allocates a render target compatible with this context.
    pub fn create_render_target(
        &self,
        width: u32,
        height: u32,
    ) -> Result<RenderTarget, ResourceError> {
        RenderTarget::new(self.device.as_ref(), width, height)
    }

    /// Opens a frame bracket on `target` and returns the recorder draws go
    /// into. The bracket closes when the recorder's `end_frame` flushes.
    pub fn begin_frame<'a>(
        &'a mut self,
        target: &'a mut RenderTarget,
        load_action: LoadAction,
        clear_color: Color,
    ) -> Result<FrameRecorder<'a>, RenderError> {
        target.begin_frame()?;
        Ok(FrameRecorder::new(self, target, load_action, clear_color))
    }

    /// Grows the gradient span ring to at least `size_in_bytes`.
    pub fn resize_grad_span_buffer(&mut self, size_in_bytes: u64) -> Result<(), ResourceError> {
        self.grad_span_ring.resize(self.device.as_ref(), size_in_bytes)
    }

    /// Maps the gradient span ring for this frame's spans.
    pub fn map_grad_span_buffer(&mut self, len: u64) -> Result<MappedBuffer<'_>, ResourceError> {
        self.grad_span_ring.map(self.device.as_ref(), len)
    }

    /// Grows the tessellation span ring to at least `size_in_bytes`.
    pub fn resize_tess_span_buffer(&mut self, size_in_bytes: u64) -> Result<(), ResourceError> {
        self.tess_span_ring.resize(self.device.as_ref(), size_in_bytes)
    }

    /// Maps the tessellation span ring for this frame's spans.
    pub fn map_tess_span_buffer(&mut self, len: u64) -> Result<MappedBuffer<'_>, ResourceError> {
        self.tess_span_ring.map(self.device.as_ref(), len)
    }

    /// Grows the triangle vertex ring to at least `size_in_bytes`.
    pub fn resize_triangle_buffer(&mut self, size_in_bytes: u64) -> Result<(), ResourceError> {
        self.triangle_ring.resize(self.device.as_ref(), size_in_bytes)
    }

    /// Maps the triangle vertex ring for this frame's triangles.
    pub fn map_triangle_buffer(&mut self, len: u64) -> Result<MappedBuffer<'_>, ResourceError> {
        self.triangle_ring.map(self.device.as_ref(), len)
    }

    /// Grows the flush uniform ring to at least `size_in_bytes`.
    pub fn resize_flush_uniform_buffer(&mut self, size_in_bytes: u64) -> Result<(), ResourceError> {
        self.flush_uniform_ring
            .resize(self.device.as_ref(), size_in_bytes)
    }

    /// Maps the flush uniform ring for this frame's uniforms.
    pub fn map_flush_uniform_buffer(&mut self, len: u64) -> Result<MappedBuffer<'_>, ResourceError> {
        self.flush_uniform_ring.map(self.device.as_ref(), len)
    }

    /// Grows the image draw uniform ring to at least `size_in_bytes`.
    pub fn resize_image_draw_uniform_buffer(
        &mut self,
        size_in_bytes: u64,
    ) -> Result<(), ResourceError> {
        self.image_draw_uniform_ring
            .resize(self.device.as_ref(), size_in_bytes)
    }

    /// Maps the image draw uniform ring for this frame's records.
    pub fn map_image_draw_uniform_buffer(
        &mut self,
        len: u64,
    ) -> Result<MappedBuffer<'_>, ResourceError> {
        self.image_draw_uniform_ring.map(self.device.as_ref(), len)
    }

    /// Ensures the gradient texture holds at least `height` ramp rows.
    pub fn resize_gradient_texture(&mut self, height: u32) -> Result<(), ResourceError> {
        let height = height.min(self.settings.max_gradient_texture_height);
        self.gradient_texture
            .require(self.device.as_ref(), Extent2D::new(GRAD_TEXTURE_WIDTH, height))
            .map(|_| ())
    }

    /// Ensures the tessellation texture holds at least `height` rows.
    pub fn resize_tessellation_texture(&mut self, height: u32) -> Result<(), ResourceError> {
        let height = height.min(self.settings.max_tessellation_texture_height);
        self.tessellation_texture
            .require(
                self.device.as_ref(),
                Extent2D::new(TESS_TEXTURE_WIDTH, height),
            )
            .map(|_| ())
    }

    /// Executes one flush: gradient update, tessellation update, the ordered
    /// draw batches, and (in atomic mode) the terminal resolve — in that
    /// fixed order. Rings rotate strictly after the command buffer is
    /// submitted.
    pub fn flush(
        &mut self,
        target: &mut RenderTarget,
        desc: &FlushDescriptor,
    ) -> Result<(), RenderError> {
        if !target.is_recording() {
            return Err(RenderError::FrameStateViolation(
                "flush without a begin_frame bracket".into(),
            ));
        }
        let device_arc = Arc::clone(&self.device);
        let device = device_arc.as_ref();
        let atomic = desc.interlock_mode == InterlockMode::Atomics;
        let viewport = (target.width(), target.height());

        let mut encoder = device.create_command_encoder(Some("plume.flush"));
        let mut passes_emitted: u64 = 0;

        // Storage records for this flush.
        let path_buffer = self.path_buffer.sync(device)?;
        let _ = self.paint_buffer.sync(device)?;
        let _ = self.paint_aux_buffer.sync(device)?;
        let contour_buffer = self.contour_buffer.sync(device)?;

        // Coverage (and clip, when clipping is in play) start the flush in a
        // known state.
        encoder.clear_texture(target.coverage(), ClearValue::Uint(desc.coverage_clear_value));
        if desc
            .combined_shader_features
            .contains(ShaderFeatures::ENABLE_CLIPPING)
        {
            encoder.clear_texture(target.clip(), ClearValue::Uint(0));
        }

        let mut common: Vec<(u32, BindingResource)> = vec![
            (
                bindings::FLUSH_UNIFORMS,
                BindingResource::UniformBuffer {
                    buffer: self.flush_uniform_ring.current_buffer(),
                    offset: desc.flush_uniform_offset,
                    size: std::mem::size_of::<FlushUniforms>() as u64,
                },
            ),
            (
                bindings::LINEAR_SAMPLER,
                BindingResource::Sampler(self.linear_sampler),
            ),
            (
                bindings::MIPMAP_SAMPLER,
                BindingResource::Sampler(self.mipmap_sampler),
            ),
        ];
        if desc.path_count > 0 {
            if path_buffer.is_some() {
                common.push((
                    bindings::PATH_BUFFER,
                    self.path_buffer
                        .binding(desc.first_path as u64, desc.path_count as u64),
                ));
                common.push((
                    bindings::PAINT_BUFFER,
                    self.paint_buffer
                        .binding(desc.first_path as u64, desc.path_count as u64),
                ));
                common.push((
                    bindings::PAINT_AUX_BUFFER,
                    self.paint_aux_buffer
                        .binding(desc.first_path as u64, desc.path_count as u64),
                ));
            } else {
                log::error!("flush claims {} paths but none were recorded", desc.path_count);
            }
        }
        if desc.contour_count > 0 && contour_buffer.is_some() {
            common.push((
                bindings::CONTOUR_BUFFER,
                self.contour_buffer
                    .binding(desc.first_contour as u64, desc.contour_count as u64),
            ));
        }

        // 1) Gradient ramps.
        if desc.grad_span_count > 0 {
            let grad_height = desc
                .grad_data_height
                .min(self.settings.max_gradient_texture_height);
            let grad_texture = self
                .gradient_texture
                .require(device, Extent2D::new(GRAD_TEXTURE_WIDTH, grad_height))?;
            passes::gradient_pass(
                device,
                &mut self.pipelines,
                &mut *encoder,
                grad_texture,
                self.grad_span_ring.current_buffer(),
                0,
                desc.grad_span_count,
                grad_height,
                &common,
            )?;
            passes_emitted += 1;
        }

        // 2) Tessellation.
        if desc.tess_vertex_span_count > 0 {
            let tess_height = desc
                .tess_data_height
                .min(self.settings.max_tessellation_texture_height);
            let tess_texture = self
                .tessellation_texture
                .require(device, Extent2D::new(TESS_TEXTURE_WIDTH, tess_height))?;
            passes::tessellation_pass(
                device,
                &mut self.pipelines,
                &mut *encoder,
                tess_texture,
                self.tess_span_ring.current_buffer(),
                0,
                self.tess_span_index_buffer,
                desc.tess_vertex_span_count,
                tess_height,
                &common,
            )?;
            passes_emitted += 1;
        }

        // 3) Feather atlas accumulation: fills add, strokes take the max.
        if !desc.atlas_fill_batches.is_empty() || !desc.atlas_stroke_batches.is_empty() {
            let (atlas_width, atlas_height) = desc.atlas_size;
            let atlas_texture = self.atlas_texture.require(
                device,
                Extent2D::new(atlas_width.max(1), atlas_height.max(1)),
            )?;
            let mut atlas_load = LoadOp::Clear([0.0; 4]);
            for batch in &desc.atlas_fill_batches {
                passes::atlas_coverage_pass(
                    device,
                    &mut self.pipelines,
                    &mut *encoder,
                    batch,
                    true,
                    atlas_texture,
                    std::mem::replace(&mut atlas_load, LoadOp::Load),
                    desc.atlas_size,
                    self.patch_vertex_buffer,
                    self.patch_index_buffer,
                    &common,
                )?;
                passes_emitted += 1;
            }
            for batch in &desc.atlas_stroke_batches {
                passes::atlas_coverage_pass(
                    device,
                    &mut self.pipelines,
                    &mut *encoder,
                    batch,
                    false,
                    atlas_texture,
                    std::mem::replace(&mut atlas_load, LoadOp::Load),
                    desc.atlas_size,
                    self.patch_vertex_buffer,
                    self.patch_index_buffer,
                    &common,
                )?;
                passes_emitted += 1;
            }
        }

        // Draw passes sample whatever the update passes produced.
        if let Some(texture) = self.gradient_texture.id() {
            common.push((bindings::GRAD_TEXTURE, BindingResource::Texture(texture)));
        }
        if let Some(texture) = self.tessellation_texture.id() {
            common.push((bindings::TESS_TEXTURE, BindingResource::Texture(texture)));
        }
        if let Some(texture) = self.atlas_texture.id() {
            common.push((bindings::ATLAS_TEXTURE, BindingResource::Texture(texture)));
        }
        if atomic {
            common.push((
                bindings::COVERAGE_TEXTURE,
                BindingResource::StorageTexture(target.coverage()),
            ));
            common.push((
                bindings::CLIP_TEXTURE,
                BindingResource::StorageTexture(target.clip()),
            ));
            common.push((
                bindings::COLOR_TEXTURE,
                BindingResource::StorageTexture(target.texture()),
            ));
        }

        // 4) Color load/clear.
        let mut color_load = match desc.load_action {
            LoadAction::Clear => LoadOp::Clear(desc.clear_color.to_rgba_premul_f32()),
            LoadAction::Preserve => LoadOp::Load,
            LoadAction::DontCare => LoadOp::DontCare,
        };
        if atomic && desc.load_action == LoadAction::Clear {
            encoder.clear_texture(
                target.texture(),
                ClearValue::Float(desc.clear_color.to_rgba_premul_f32()),
            );
        }

        // 5) The ordered draw batches.
        for batch in &desc.draw_list {
            if batch.element_count == 0 {
                continue;
            }
            let mut batch = batch.clone();
            if atomic {
                // One shader permutation covers the whole frame in atomic
                // mode, and color reaches the target through storage writes.
                batch.shader_features = desc.combined_shader_features;
                batch.pipeline.color_writes = ColorWrites::EMPTY;
            }
            batch.pipeline.wireframe = desc.wireframe;

            let color_attachment = if atomic {
                None
            } else {
                let load = std::mem::replace(&mut color_load, LoadOp::Load);
                Some(ColorAttachment {
                    texture: target.texture(),
                    load,
                    store: StoreOp::Store,
                })
            };

            let mut pass_bindings = common.clone();
            match batch.draw_type {
                DrawType::MidpointFanPatches
                | DrawType::MidpointFanCenterAaPatches
                | DrawType::OuterCurvePatches => {
                    passes::patch_pass(
                        device,
                        &mut self.pipelines,
                        &mut *encoder,
                        &batch,
                        color_attachment,
                        viewport,
                        self.patch_vertex_buffer,
                        self.patch_index_buffer,
                        &pass_bindings,
                    )?;
                }
                DrawType::InteriorTriangulation => {
                    passes::interior_triangles_pass(
                        device,
                        &mut self.pipelines,
                        &mut *encoder,
                        &batch,
                        color_attachment,
                        viewport,
                        self.triangle_ring.current_buffer(),
                        &pass_bindings,
                    )?;
                }
                DrawType::AtlasBlit => {
                    passes::atlas_blit_pass(
                        device,
                        &mut self.pipelines,
                        &mut *encoder,
                        &batch,
                        color_attachment,
                        viewport,
                        self.triangle_ring.current_buffer(),
                        &pass_bindings,
                    )?;
                }
                DrawType::ImageRect => {
                    let Some(image) = batch.image_texture else {
                        log::error!("image rect batch without a texture; skipping");
                        continue;
                    };
                    pass_bindings.push((bindings::IMAGE_TEXTURE, BindingResource::Texture(image)));
                    pass_bindings.push((
                        bindings::IMAGE_DRAW_UNIFORMS,
                        BindingResource::UniformBuffer {
                            buffer: self.image_draw_uniform_ring.current_buffer(),
                            offset: batch.image_draw_data_offset as u64,
                            size: std::mem::size_of::<ImageDrawUniforms>() as u64,
                        },
                    ));
                    passes::image_rect_pass(
                        device,
                        &mut self.pipelines,
                        &mut *encoder,
                        &batch,
                        color_attachment,
                        viewport,
                        self.image_rect_vertex_buffer,
                        self.image_rect_index_buffer,
                        &pass_bindings,
                    )?;
                }
                DrawType::ImageMesh => {
                    let Some(image) = batch.image_texture else {
                        log::error!("image mesh batch without a texture; skipping");
                        continue;
                    };
                    pass_bindings.push((bindings::IMAGE_TEXTURE, BindingResource::Texture(image)));
                    pass_bindings.push((
                        bindings::IMAGE_DRAW_UNIFORMS,
                        BindingResource::UniformBuffer {
                            buffer: self.image_draw_uniform_ring.current_buffer(),
                            offset: batch.image_draw_data_offset as u64,
                            size: std::mem::size_of::<ImageDrawUniforms>() as u64,
                        },
                    ));
                    passes::image_mesh_pass(
                        device,
                        &mut self.pipelines,
                        &mut *encoder,
                        &batch,
                        color_attachment,
                        viewport,
                        &pass_bindings,
                    )?;
                }
                DrawType::AtomicResolve => {
                    passes::atomic_resolve_pass(
                        device,
                        &mut self.pipelines,
                        &mut *encoder,
                        &batch,
                        color_attachment,
                        viewport,
                        &pass_bindings,
                    )?;
                }
            }
            passes_emitted += 1;
        }

        // 6) Submit, then and only then rotate the rings to their next
        // generation.
        let command_buffer = encoder.finish();
        device.submit(command_buffer);
        self.flush_uniform_ring.rotate();
        self.image_draw_uniform_ring.rotate();
        self.grad_span_ring.rotate();
        self.tess_span_ring.rotate();
        self.triangle_ring.rotate();
        self.path_buffer.clear();
        self.paint_buffer.clear();
        self.paint_aux_buffer.clear();
        self.contour_buffer.clear();

        self.stats.flush_count += 1;
        self.stats.pass_count += passes_emitted;
        self.stats.draw_count += passes_emitted;
        target.finish_frame();
        Ok(())
    }

    /// Releases every GPU resource the context owns. The context must not be
    /// used afterwards.
    pub fn release_resources(&mut self) {
        let device_arc = Arc::clone(&self.device);
        let device = device_arc.as_ref();
        self.pipelines.destroy(device);
        self.flush_uniform_ring.destroy(device);
        self.image_draw_uniform_ring.destroy(device);
        self.grad_span_ring.destroy(device);
        self.tess_span_ring.destroy(device);
        self.triangle_ring.destroy(device);
        self.path_buffer.destroy(device);
        self.paint_buffer.destroy(device);
        self.paint_aux_buffer.destroy(device);
        self.contour_buffer.destroy(device);
        self.gradient_texture.destroy(device);
        self.tessellation_texture.destroy(device);
        self.atlas_texture.destroy(device);
        for buffer in [
            self.patch_vertex_buffer,
            self.patch_index_buffer,
            self.image_rect_vertex_buffer,
            self.image_rect_index_buffer,
            self.tess_span_index_buffer,
        ] {
            if let Err(e) = device.destroy_buffer(buffer) {
                log::warn!("RenderContext: failed to destroy static buffer: {e}");
            }
        }
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("adapter", &self.device.adapter_info().name)
            .field("stats", &self.stats)
            .field("pipelines", &self.pipelines.len())
            .finish()
    }
}
