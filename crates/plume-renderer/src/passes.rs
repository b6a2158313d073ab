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

//! Stateless pass builders.
//!
//! Each function emits exactly one render pass with one draw call and the
//! correct fixed-function state for its pass family. The only state they
//! share is the pipeline cache, threaded in explicitly; nothing here is
//! reachable through globals.

use crate::geometry::{
    patch_base_index, patch_index_count, GRAD_SPAN_TRI_STRIP_VERTEX_COUNT, GRAD_TEXTURE_WIDTH,
    IMAGE_RECT_INDICES, TESS_SPAN_INDICES, TESS_TEXTURE_WIDTH,
};
use crate::pipeline_cache::PipelineCache;
use plume_core::gpu::{
    BindingResource, BufferId, ColorAttachment, CommandEncoder, CullMode, DrawBatch, GpuDevice,
    IndexFormat, PipelineState, PrimitiveTopology, RenderPassDescriptor, ResourceError,
    ShaderKind, TextureId, VertexLayout,
};
use plume_core::gpu::{ColorWrites, LoadOp, StoreOp};
use std::ops::Range;

/// Binding slots shared by every pass family. The shader side hard-codes the
/// same numbers.
pub mod bindings {
    /// Per-flush uniform block.
    pub const FLUSH_UNIFORMS: u32 = 0;
    /// Path record buffer.
    pub const PATH_BUFFER: u32 = 1;
    /// Paint record buffer.
    pub const PAINT_BUFFER: u32 = 2;
    /// Auxiliary paint record buffer.
    pub const PAINT_AUX_BUFFER: u32 = 3;
    /// Contour record buffer.
    pub const CONTOUR_BUFFER: u32 = 4;
    /// Tessellation texture.
    pub const TESS_TEXTURE: u32 = 5;
    /// Gradient ramp texture.
    pub const GRAD_TEXTURE: u32 = 6;
    /// Sampled image texture of image draws.
    pub const IMAGE_TEXTURE: u32 = 7;
    /// Per-image-draw uniform block.
    pub const IMAGE_DRAW_UNIFORMS: u32 = 8;
    /// Atomic coverage storage texture.
    pub const COVERAGE_TEXTURE: u32 = 9;
    /// Clip-index storage texture.
    pub const CLIP_TEXTURE: u32 = 10;
    /// Color storage texture (atomic mode).
    pub const COLOR_TEXTURE: u32 = 11;
    /// Linear sampler.
    pub const LINEAR_SAMPLER: u32 = 12;
    /// Mipmap sampler.
    pub const MIPMAP_SAMPLER: u32 = 13;
    /// Feather atlas texture.
    pub const ATLAS_TEXTURE: u32 = 14;
}

enum DrawCall {
    Arrays {
        vertices: Range<u32>,
        instances: Range<u32>,
    },
    Indexed {
        indices: Range<u32>,
        base_vertex: i32,
        instances: Range<u32>,
    },
}

struct PassSpec<'a> {
    label: &'static str,
    shader: ShaderKind,
    vertex_layout: VertexLayout,
    topology: PrimitiveTopology,
    state: PipelineState,
    color_attachment: Option<ColorAttachment>,
    viewport: (u32, u32),
    bindings: &'a [(u32, BindingResource)],
    vertex_buffers: &'a [(u32, BufferId, u64)],
    index_buffer: Option<(BufferId, IndexFormat)>,
    draw: DrawCall,
}

fn run_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    spec: PassSpec,
) -> Result<(), ResourceError> {
    // Resolve the pipeline before opening the pass; compilation must not
    // happen inside a pass bracket.
    let pipeline = pipelines.get_or_create(
        device,
        spec.shader,
        spec.vertex_layout,
        spec.topology,
        &spec.state,
    )?;

    let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
        label: Some(spec.label),
        color_attachment: spec.color_attachment,
    });
    pass.set_pipeline(pipeline);
    let (width, height) = spec.viewport;
    pass.set_viewport(0.0, 0.0, width as f32, height as f32);
    pass.set_scissor(0, 0, width, height);
    if let Some(stencil) = &spec.state.stencil {
        pass.set_stencil_reference(stencil.reference as u32);
    }
    for (slot, resource) in spec.bindings {
        pass.set_binding(*slot, *resource);
    }
    for (slot, buffer, offset) in spec.vertex_buffers {
        pass.set_vertex_buffer(*slot, *buffer, *offset);
    }
    if let Some((buffer, format)) = spec.index_buffer {
        pass.set_index_buffer(buffer, 0, format);
    }
    match spec.draw {
        DrawCall::Arrays {
            vertices,
            instances,
        } => pass.draw(vertices, instances),
        DrawCall::Indexed {
            indices,
            base_vertex,
            instances,
        } => pass.draw_indexed(indices, base_vertex, instances),
    }
    Ok(())
}

fn opaque_state() -> PipelineState {
    PipelineState {
        color_writes: ColorWrites::ALL,
        ..Default::default()
    }
}

/// Rasterizes the frame's gradient spans into rows of the gradient texture.
#[allow(clippy::too_many_arguments)]
pub fn gradient_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    grad_texture: TextureId,
    span_buffer: BufferId,
    span_buffer_offset: u64,
    span_count: u32,
    grad_data_height: u32,
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.gradient",
            shader: ShaderKind::GradientRamp,
            vertex_layout: VertexLayout::Gradient,
            topology: PrimitiveTopology::TriangleStrip,
            state: opaque_state(),
            color_attachment: Some(ColorAttachment {
                texture: grad_texture,
                load: LoadOp::Load,
                store: StoreOp::Store,
            }),
            viewport: (GRAD_TEXTURE_WIDTH, grad_data_height),
            bindings,
            vertex_buffers: &[(0, span_buffer, span_buffer_offset)],
            index_buffer: None,
            draw: DrawCall::Arrays {
                vertices: 0..GRAD_SPAN_TRI_STRIP_VERTEX_COUNT,
                instances: 0..span_count,
            },
        },
    )
}

/// Evaluates the frame's curve spans into the tessellation texture.
#[allow(clippy::too_many_arguments)]
pub fn tessellation_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    tess_texture: TextureId,
    span_buffer: BufferId,
    span_buffer_offset: u64,
    span_index_buffer: BufferId,
    span_count: u32,
    tess_data_height: u32,
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    let mut state = opaque_state();
    state.cull_mode = Some(CullMode::Back);
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.tessellation",
            shader: ShaderKind::Tessellation,
            vertex_layout: VertexLayout::Tessellation,
            topology: PrimitiveTopology::TriangleList,
            state,
            color_attachment: Some(ColorAttachment {
                texture: tess_texture,
                load: LoadOp::DontCare,
                store: StoreOp::Store,
            }),
            viewport: (TESS_TEXTURE_WIDTH, tess_data_height),
            bindings,
            vertex_buffers: &[(0, span_buffer, span_buffer_offset)],
            index_buffer: Some((span_index_buffer, IndexFormat::Uint16)),
            draw: DrawCall::Indexed {
                indices: 0..TESS_SPAN_INDICES.len() as u32,
                base_vertex: 0,
                instances: 0..span_count,
            },
        },
    )
}

/// Draws one batch of instanced path patches over the static patch geometry.
#[allow(clippy::too_many_arguments)]
pub fn patch_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    batch: &DrawBatch,
    color_attachment: Option<ColorAttachment>,
    viewport: (u32, u32),
    patch_vertex_buffer: BufferId,
    patch_index_buffer: BufferId,
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    let base_index = patch_base_index(batch.draw_type);
    let index_count = patch_index_count(batch.draw_type);
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.patches",
            shader: ShaderKind::PathPatch,
            vertex_layout: VertexLayout::Paths,
            topology: PrimitiveTopology::TriangleList,
            state: batch.pipeline,
            color_attachment,
            viewport,
            bindings,
            vertex_buffers: &[(0, patch_vertex_buffer, 0)],
            index_buffer: Some((patch_index_buffer, IndexFormat::Uint16)),
            draw: DrawCall::Indexed {
                indices: base_index..base_index + index_count,
                base_vertex: 0,
                instances: batch.base_element..batch.base_element + batch.element_count,
            },
        },
    )
}

/// Draws one batch of pre-triangulated interior coverage.
#[allow(clippy::too_many_arguments)]
pub fn interior_triangles_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    batch: &DrawBatch,
    color_attachment: Option<ColorAttachment>,
    viewport: (u32, u32),
    triangle_buffer: BufferId,
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.interior_triangles",
            shader: ShaderKind::InteriorTriangles,
            vertex_layout: VertexLayout::InteriorTriangles,
            topology: PrimitiveTopology::TriangleList,
            state: batch.pipeline,
            color_attachment,
            viewport,
            bindings,
            vertex_buffers: &[(0, triangle_buffer, 0)],
            index_buffer: None,
            draw: DrawCall::Arrays {
                vertices: batch.base_element..batch.base_element + batch.element_count,
                instances: 0..1,
            },
        },
    )
}

/// Accumulates one batch of feathered coverage into the atlas texture.
///
/// Fill coverage adds; stroke coverage takes the per-texel maximum. Atlas
/// batches draw instanced patch geometry, so `batch.draw_type` must be a
/// patch family.
#[allow(clippy::too_many_arguments)]
pub fn atlas_coverage_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    batch: &DrawBatch,
    fill: bool,
    atlas_texture: TextureId,
    atlas_load: LoadOp,
    atlas_size: (u32, u32),
    patch_vertex_buffer: BufferId,
    patch_index_buffer: BufferId,
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    let base_index = patch_base_index(batch.draw_type);
    let index_count = patch_index_count(batch.draw_type);
    let state = PipelineState {
        blend_equation: if fill {
            plume_core::gpu::BlendEquation::Additive
        } else {
            plume_core::gpu::BlendEquation::Max
        },
        color_writes: ColorWrites::ALL,
        ..Default::default()
    };
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: if fill {
                "plume.atlas_fill"
            } else {
                "plume.atlas_stroke"
            },
            shader: if fill {
                ShaderKind::AtlasFill
            } else {
                ShaderKind::AtlasStroke
            },
            vertex_layout: VertexLayout::Paths,
            topology: PrimitiveTopology::TriangleList,
            state,
            color_attachment: Some(ColorAttachment {
                texture: atlas_texture,
                load: atlas_load,
                store: StoreOp::Store,
            }),
            viewport: atlas_size,
            bindings,
            vertex_buffers: &[(0, patch_vertex_buffer, 0)],
            index_buffer: Some((patch_index_buffer, IndexFormat::Uint16)),
            draw: DrawCall::Indexed {
                indices: base_index..base_index + index_count,
                base_vertex: 0,
                instances: batch.base_element..batch.base_element + batch.element_count,
            },
        },
    )
}

/// Blits feathered coverage accumulated in the atlas into the target.
#[allow(clippy::too_many_arguments)]
pub fn atlas_blit_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    batch: &DrawBatch,
    color_attachment: Option<ColorAttachment>,
    viewport: (u32, u32),
    triangle_buffer: BufferId,
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.atlas_blit",
            shader: ShaderKind::AtlasBlit,
            vertex_layout: VertexLayout::InteriorTriangles,
            topology: PrimitiveTopology::TriangleList,
            state: batch.pipeline,
            color_attachment,
            viewport,
            bindings,
            vertex_buffers: &[(0, triangle_buffer, 0)],
            index_buffer: None,
            draw: DrawCall::Arrays {
                vertices: batch.base_element..batch.base_element + batch.element_count,
                instances: 0..1,
            },
        },
    )
}

/// Draws a full-texture image rectangle.
#[allow(clippy::too_many_arguments)]
pub fn image_rect_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    batch: &DrawBatch,
    color_attachment: Option<ColorAttachment>,
    viewport: (u32, u32),
    rect_vertex_buffer: BufferId,
    rect_index_buffer: BufferId,
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.image_rect",
            shader: ShaderKind::ImageRect,
            vertex_layout: VertexLayout::ImageRect,
            topology: PrimitiveTopology::TriangleList,
            state: batch.pipeline,
            color_attachment,
            viewport,
            bindings,
            vertex_buffers: &[(0, rect_vertex_buffer, 0)],
            index_buffer: Some((rect_index_buffer, IndexFormat::Uint16)),
            draw: DrawCall::Indexed {
                indices: 0..IMAGE_RECT_INDICES.len() as u32,
                base_vertex: 0,
                instances: 0..1,
            },
        },
    )
}

/// Draws a textured mesh with caller-supplied vertex, UV and index buffers.
///
/// Returns [`ResourceError::InvalidHandle`] when the batch is missing any of
/// its mesh buffers; an image-mesh batch without them cannot have come from
/// a well-formed frame.
#[allow(clippy::too_many_arguments)]
pub fn image_mesh_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    batch: &DrawBatch,
    color_attachment: Option<ColorAttachment>,
    viewport: (u32, u32),
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    let (vertex_buffer, uv_buffer, index_buffer) =
        match (batch.vertex_buffer, batch.uv_buffer, batch.index_buffer) {
            (Some(v), Some(uv), Some(i)) => (v, uv, i),
            _ => return Err(ResourceError::InvalidHandle),
        };
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.image_mesh",
            shader: ShaderKind::ImageMesh,
            vertex_layout: VertexLayout::ImageMesh,
            topology: PrimitiveTopology::TriangleList,
            state: batch.pipeline,
            color_attachment,
            viewport,
            bindings,
            vertex_buffers: &[(0, vertex_buffer, 0), (1, uv_buffer, 0)],
            index_buffer: Some((index_buffer, IndexFormat::Uint16)),
            draw: DrawCall::Indexed {
                indices: 0..batch.element_count,
                base_vertex: 0,
                instances: 0..1,
            },
        },
    )
}

/// The terminal coverage-to-color resolve of an atomic-mode flush.
pub fn atomic_resolve_pass(
    device: &dyn GpuDevice,
    pipelines: &mut PipelineCache,
    encoder: &mut dyn CommandEncoder,
    batch: &DrawBatch,
    color_attachment: Option<ColorAttachment>,
    viewport: (u32, u32),
    bindings: &[(u32, BindingResource)],
) -> Result<(), ResourceError> {
    run_pass(
        device,
        pipelines,
        encoder,
        PassSpec {
            label: "plume.atomic_resolve",
            shader: ShaderKind::AtomicResolve,
            vertex_layout: VertexLayout::Resolve,
            topology: PrimitiveTopology::TriangleStrip,
            state: batch.pipeline,
            color_attachment,
            viewport,
            bindings,
            vertex_buffers: &[],
            index_buffer: None,
            draw: DrawCall::Arrays {
                vertices: 0..4,
                instances: 0..1,
            },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DeviceCall, HeadlessDevice};
    use plume_core::gpu::DrawType;

    #[test]
    fn gradient_pass_draws_one_strip_per_span() {
        let device = HeadlessDevice::new();
        let mut pipelines = PipelineCache::new();
        let texture = TextureId(100);
        let spans = BufferId(200);
        let mut encoder = device.create_command_encoder(Some("test"));
        gradient_pass(
            &*device,
            &mut pipelines,
            &mut *encoder,
            texture,
            spans,
            0,
            7,
            3,
            &[],
        )
        .unwrap();
        let id = encoder.finish();
        device.submit(id);
        let calls = device.take_calls();
        assert!(calls.iter().any(|c| matches!(
            c,
            DeviceCall::Draw { vertices, instances }
                if *vertices == (0..GRAD_SPAN_TRI_STRIP_VERTEX_COUNT) && *instances == (0..7)
        )));
    }

    #[test]
    fn patch_pass_selects_the_family_index_window() {
        let device = HeadlessDevice::new();
        let mut pipelines = PipelineCache::new();
        let batch = DrawBatch::new(DrawType::OuterCurvePatches, 5, 2);
        let mut encoder = device.create_command_encoder(Some("test"));
        patch_pass(
            &*device,
            &mut pipelines,
            &mut *encoder,
            &batch,
            None,
            (64, 64),
            BufferId(1),
            BufferId(2),
            &[],
        )
        .unwrap();
        let id = encoder.finish();
        device.submit(id);
        let calls = device.take_calls();
        let base = patch_base_index(DrawType::OuterCurvePatches);
        let count = patch_index_count(DrawType::OuterCurvePatches);
        assert!(calls.iter().any(|c| matches!(
            c,
            DeviceCall::DrawIndexed { indices, instances, .. }
                if *indices == (base..base + count) && *instances == (2..7)
        )));
    }

    #[test]
    fn image_mesh_without_buffers_is_rejected() {
        let device = HeadlessDevice::new();
        let mut pipelines = PipelineCache::new();
        let batch = DrawBatch::new(DrawType::ImageMesh, 6, 0);
        let mut encoder = device.create_command_encoder(Some("test"));
        let result = image_mesh_pass(
            &*device,
            &mut pipelines,
            &mut *encoder,
            &batch,
            None,
            (64, 64),
            &[],
        );
        assert!(matches!(result, Err(ResourceError::InvalidHandle)));
    }

    #[test]
    fn tess_span_constants_agree() {
        use crate::geometry::TESS_SPAN_VERTEX_COUNT;
        assert_eq!(TESS_SPAN_VERTEX_COUNT, 8);
        assert!(TESS_SPAN_INDICES
            .iter()
            .all(|i| (*i as u32) < TESS_SPAN_VERTEX_COUNT));
    }
}
