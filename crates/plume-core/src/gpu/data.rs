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

//! The byte-exact data structures streamed into GPU buffers each frame, and
//! the draw-batch model the flush loop consumes.
//!
//! Every record here is `Pod`: the runtime writes them into ring-buffer
//! shadow memory and the renderer uploads the bytes verbatim. Field layouts
//! are part of the shader contract and must not be reordered.

use super::buffer::BufferId;
use super::pipeline::PipelineState;
use super::texture::TextureId;
use crate::plume_bitflags;
use bytemuck::{Pod, Zeroable};

/// One horizontal span of a gradient color ramp, rasterized into a row of
/// the gradient texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct GradientSpan {
    /// Left edge in fixed point across the gradient texture width.
    pub x0_fixed: u32,
    /// Right edge in fixed point.
    pub x1_fixed: u32,
    /// Destination row in the gradient texture.
    pub y: u32,
    /// Span flags (left/right edge sentinel bits).
    pub flags: u32,
    /// Color at the left edge, packed ARGB.
    pub color0: u32,
    /// Color at the right edge, packed ARGB.
    pub color1: u32,
    pub(crate) _pad: [u32; 2],
}

impl GradientSpan {
    /// Creates a span covering `[x0, x1]` of row `y`, interpolating
    /// `color0 -> color1`.
    pub fn new(x0_fixed: u32, x1_fixed: u32, y: u32, color0: u32, color1: u32) -> Self {
        Self {
            x0_fixed,
            x1_fixed,
            y,
            flags: 0,
            color0,
            color1,
            _pad: [0; 2],
        }
    }
}

/// One curve segment handed to the tessellation shader, which expands it
/// into tessellated vertices in the tessellation texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct TessVertexSpan {
    /// Cubic control points `p0..p3`, packed as two float4s.
    pub pts: [[f32; 4]; 2],
    /// Tangent direction at the join following this segment.
    pub join_tangent: [f32; 2],
    /// Destination row in the tessellation texture.
    pub y: f32,
    /// Reflection row for the mirrored (right-to-left) half.
    pub reflection_y: f32,
    /// First tessellated vertex index of this segment.
    pub x0: i32,
    /// One past the last tessellated vertex index.
    pub x1: i32,
    /// Parametric segment counts packed by the encoder.
    pub segment_counts: u32,
    /// Owning contour id with the encoder's flag bits.
    pub contour_id_with_flags: u32,
}

/// Per-path record for the path storage buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PathData {
    /// The path's 2x3 transform, row-padded to two float4s.
    pub matrix: [f32; 6],
    /// Stroke radius; zero for fills.
    pub stroke_radius: f32,
    /// Z index used for depth-mode ordering.
    pub z_index: u32,
}

/// Per-path paint record for the paint storage buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct PaintData {
    /// Paint type and flags packed by the encoder.
    pub params: u32,
    /// Solid color, or gradient row for ramp paints, packed ARGB.
    pub color: u32,
}

/// Auxiliary paint record (gradient/image transform and clip rect).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PaintAuxData {
    /// Inverse paint transform, row-padded to two float4s.
    pub matrix: [f32; 6],
    /// Gradient texture coordinate transform.
    pub grad_coords: [f32; 2],
    /// Clip-rect inverse transform, row-padded.
    pub clip_rect_inverse_matrix: [f32; 6],
    /// Clip-rect inverse translate.
    pub clip_rect_inverse_translate: [f32; 2],
}

/// Per-contour record for the contour storage buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct ContourData {
    /// The contour midpoint, used for midpoint-fan triangulation.
    pub midpoint: [f32; 2],
    /// Index of the owning path record.
    pub path_id: u32,
    /// First tessellated vertex of the contour.
    pub vertex_index0: u32,
}

/// A vertex of a pre-triangulated interior (or atlas blit) triangle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct TriangleVertex {
    /// Position in artboard space.
    pub point: [f32; 2],
    /// Winding weight (+1/-1) carried in the z lane.
    pub weight: f32,
    /// Index of the owning path record.
    pub path_id: u32,
}

/// The per-flush uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct FlushUniforms {
    /// Gradient texture inverse height (normalizes ramp rows).
    pub grad_inverse_viewport_y: f32,
    /// Tessellation texture inverse height.
    pub tess_inverse_viewport_y: f32,
    /// Render target width in pixels.
    pub render_target_width: u32,
    /// Render target height in pixels.
    pub render_target_height: u32,
    /// Value the coverage buffer was cleared to this flush.
    pub coverage_clear_value: u32,
    /// Granularity between path ids of consecutive flushes.
    pub path_id_granularity: u32,
    /// Update bounds of this flush in pixels (left, top, right, bottom).
    pub render_target_update_bounds: [i32; 4],
    /// Color to substitute when a paint lookup misses (debug aid).
    pub debug_color: u32,
    /// Reserved; keeps the block 16-byte aligned.
    pub reserved: u32,
}

/// The per-image-draw uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct ImageDrawUniforms {
    /// Image local-to-target transform, row-padded.
    pub matrix: [f32; 6],
    /// Image opacity in `[0, 1]`.
    pub opacity: f32,
    /// Z index used for depth-mode ordering.
    pub z_index: u32,
    /// Index of the clip record applied to this image, zero for none.
    pub clip_id: u32,
    /// Blend mode ordinal applied by the resolve.
    pub blend_mode: u32,
    /// Index of the paint record backing this image draw.
    pub paint_id: u32,
    /// Reserved; keeps the block 16-byte aligned.
    pub reserved: u32,
}

plume_bitflags! {
    /// Optional shader features a draw batch may require.
    ///
    /// In atomic interlock mode the flush combines all batches' features so a
    /// single resolve shader permutation covers the frame.
    pub struct ShaderFeatures: u32 {
        /// Path clipping is in use.
        const ENABLE_CLIPPING = 1 << 0;
        /// Rectangular clip with transform is in use.
        const ENABLE_CLIP_RECT = 1 << 1;
        /// A non-src-over blend mode is present.
        const ENABLE_ADVANCED_BLEND = 1 << 2;
        /// Even-odd fill rule is present.
        const ENABLE_EVEN_ODD = 1 << 3;
        /// Clipping inside clipping.
        const ENABLE_NESTED_CLIPPING = 1 << 4;
        /// Feathered (blurred-edge) paths are present.
        const ENABLE_FEATHER = 1 << 5;
        /// HSL blend modes are present. Never supported by this backend;
        /// kept so feature sets combined from file content stay faithful.
        const ENABLE_HSL_BLEND_MODES = 1 << 6;
    }
}

/// The homogeneous kind of GPU work a [`DrawBatch`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawType {
    /// Instanced midpoint-fan patches over the static patch geometry.
    MidpointFanPatches,
    /// Midpoint fans with center anti-aliasing geometry.
    MidpointFanCenterAaPatches,
    /// Instanced outer-curve (stroke/AA border) patches.
    OuterCurvePatches,
    /// Pre-triangulated interior coverage from the triangle buffer.
    InteriorTriangulation,
    /// Blit of feathered coverage accumulated in the atlas texture.
    AtlasBlit,
    /// A full-texture image rectangle.
    ImageRect,
    /// A textured mesh with caller-supplied buffers.
    ImageMesh,
    /// The terminal coverage-to-color resolve in atomic mode.
    AtomicResolve,
}

/// A typed, ordered unit of GPU work within one flush.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    /// What kind of work this batch performs.
    pub draw_type: DrawType,
    /// Number of instances / vertices, interpreted per [`DrawType`].
    pub element_count: u32,
    /// First instance / vertex, interpreted per [`DrawType`].
    pub base_element: u32,
    /// Shader features this batch requires.
    pub shader_features: ShaderFeatures,
    /// Fixed-function state for this batch.
    pub pipeline: PipelineState,
    /// The texture sampled by image draws.
    pub image_texture: Option<TextureId>,
    /// Byte offset of this draw's [`ImageDrawUniforms`] record.
    pub image_draw_data_offset: u32,
    /// Vertex positions for [`DrawType::ImageMesh`].
    pub vertex_buffer: Option<BufferId>,
    /// UV coordinates for [`DrawType::ImageMesh`].
    pub uv_buffer: Option<BufferId>,
    /// Index buffer for [`DrawType::ImageMesh`].
    pub index_buffer: Option<BufferId>,
}

impl DrawBatch {
    /// Creates a batch of `draw_type` with the given element window and
    /// default state; callers fill in the rest as needed.
    pub fn new(draw_type: DrawType, element_count: u32, base_element: u32) -> Self {
        Self {
            draw_type,
            element_count,
            base_element,
            shader_features: ShaderFeatures::EMPTY,
            pipeline: PipelineState {
                color_writes: super::pipeline::ColorWrites::ALL,
                ..Default::default()
            },
            image_texture: None,
            image_draw_data_offset: 0,
            vertex_buffer: None,
            uv_buffer: None,
            index_buffer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_pod_with_stable_sizes() {
        // These sizes are shader-visible strides; a change here is a shader
        // contract break.
        assert_eq!(std::mem::size_of::<GradientSpan>(), 32);
        assert_eq!(std::mem::size_of::<TessVertexSpan>(), 64);
        assert_eq!(std::mem::size_of::<PathData>(), 32);
        assert_eq!(std::mem::size_of::<PaintData>(), 8);
        assert_eq!(std::mem::size_of::<PaintAuxData>(), 64);
        assert_eq!(std::mem::size_of::<ContourData>(), 16);
        assert_eq!(std::mem::size_of::<TriangleVertex>(), 16);
        assert_eq!(std::mem::size_of::<FlushUniforms>(), 48);
        assert_eq!(std::mem::size_of::<ImageDrawUniforms>(), 48);
    }

    #[test]
    fn batch_defaults() {
        let batch = DrawBatch::new(DrawType::MidpointFanPatches, 12, 3);
        assert_eq!(batch.element_count, 12);
        assert_eq!(batch.base_element, 3);
        assert!(batch.image_texture.is_none());
        assert!(batch.shader_features.is_empty());
    }
}
