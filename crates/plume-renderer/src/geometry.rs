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

//! Static geometry shared by every flush.
//!
//! Path patches are instanced over one immutable vertex/index buffer pair
//! holding all three patch families back to back; a draw selects its family
//! with a base index and per-family index count. The layout here and the
//! vertex shader's expectations must agree, so the tables are exercised by
//! tests rather than trusted.

use bytemuck::{Pod, Zeroable};
use plume_core::gpu::DrawType;

/// Fixed width of the gradient ramp texture, in texels.
pub const GRAD_TEXTURE_WIDTH: u32 = 512;

/// Fixed width of the tessellation texture, in texels.
pub const TESS_TEXTURE_WIDTH: u32 = 2048;

/// Vertices in the triangle strip instanced per gradient span.
pub const GRAD_SPAN_TRI_STRIP_VERTEX_COUNT: u32 = 4;

/// Fixed width of the feather atlas texture, in texels.
pub const ATLAS_TEXTURE_WIDTH: u32 = 1024;

/// Height the feather atlas starts at; it grows on demand.
pub const ATLAS_TEXTURE_INITIAL_HEIGHT: u32 = 512;

/// Curve segments per midpoint-fan patch.
pub const MIDPOINT_FAN_PATCH_SEGMENT_SPAN: u32 = 8;

/// Curve segments per outer-curve patch.
pub const OUTER_CURVE_PATCH_SEGMENT_SPAN: u32 = 17;

/// Index count of one midpoint-fan patch instance (one triangle per segment).
pub const MIDPOINT_FAN_PATCH_INDEX_COUNT: u32 = MIDPOINT_FAN_PATCH_SEGMENT_SPAN * 3;

/// Index count of one center-AA midpoint-fan patch instance (fan plus an
/// anti-aliasing skirt of one extra triangle per segment).
pub const MIDPOINT_FAN_CENTER_AA_PATCH_INDEX_COUNT: u32 = MIDPOINT_FAN_PATCH_SEGMENT_SPAN * 3 * 2;

/// Index count of one outer-curve patch instance.
pub const OUTER_CURVE_PATCH_INDEX_COUNT: u32 = OUTER_CURVE_PATCH_SEGMENT_SPAN * 3;

/// Base index of the midpoint-fan family in the shared patch index buffer.
pub const MIDPOINT_FAN_PATCH_BASE_INDEX: u32 = 0;

/// Base index of the center-AA midpoint-fan family.
pub const MIDPOINT_FAN_CENTER_AA_PATCH_BASE_INDEX: u32 = MIDPOINT_FAN_PATCH_INDEX_COUNT;

/// Base index of the outer-curve family.
pub const OUTER_CURVE_PATCH_BASE_INDEX: u32 =
    MIDPOINT_FAN_CENTER_AA_PATCH_BASE_INDEX + MIDPOINT_FAN_CENTER_AA_PATCH_INDEX_COUNT;

/// Total number of indices in the shared patch index buffer.
pub const PATCH_INDEX_BUFFER_COUNT: u32 =
    OUTER_CURVE_PATCH_BASE_INDEX + OUTER_CURVE_PATCH_INDEX_COUNT;

/// Vertices per tessellation span instance (forward and mirrored quads).
pub const TESS_SPAN_VERTEX_COUNT: u32 = 8;

/// Index pattern of one tessellation span instance.
pub const TESS_SPAN_INDICES: [u16; 12] = [0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7];

/// One vertex of the static patch geometry. The shader decodes the packed
/// params into fan position, edge outset and segment id.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PatchVertex {
    /// `(local_vertex_id, outset, fill_coverage, params)` as the vertex
    /// shader consumes them.
    pub params: [f32; 4],
}

/// One vertex of the static image-rect geometry.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct ImageRectVertex {
    /// Corner position in `[0, 1]` and its anti-aliasing offset direction.
    pub params: [f32; 4],
}

/// The static unit-quad vertices image rects are drawn with.
pub const IMAGE_RECT_VERTICES: [ImageRectVertex; 4] = [
    ImageRectVertex {
        params: [0.0, 0.0, -1.0, -1.0],
    },
    ImageRectVertex {
        params: [1.0, 0.0, 1.0, -1.0],
    },
    ImageRectVertex {
        params: [1.0, 1.0, 1.0, 1.0],
    },
    ImageRectVertex {
        params: [0.0, 1.0, -1.0, 1.0],
    },
];

/// Index list for the image-rect quad.
pub const IMAGE_RECT_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// The base index a patch draw of `draw_type` starts at in the shared patch
/// index buffer.
///
/// Panics for non-patch draw types; calling it with one is a pipeline bug.
pub fn patch_base_index(draw_type: DrawType) -> u32 {
    match draw_type {
        DrawType::MidpointFanPatches => MIDPOINT_FAN_PATCH_BASE_INDEX,
        DrawType::MidpointFanCenterAaPatches => MIDPOINT_FAN_CENTER_AA_PATCH_BASE_INDEX,
        DrawType::OuterCurvePatches => OUTER_CURVE_PATCH_BASE_INDEX,
        other => panic!("patch_base_index called for non-patch draw type {other:?}"),
    }
}

/// The per-instance index count of a patch draw of `draw_type`.
///
/// Panics for non-patch draw types; calling it with one is a pipeline bug.
pub fn patch_index_count(draw_type: DrawType) -> u32 {
    match draw_type {
        DrawType::MidpointFanPatches => MIDPOINT_FAN_PATCH_INDEX_COUNT,
        DrawType::MidpointFanCenterAaPatches => MIDPOINT_FAN_CENTER_AA_PATCH_INDEX_COUNT,
        DrawType::OuterCurvePatches => OUTER_CURVE_PATCH_INDEX_COUNT,
        other => panic!("patch_index_count called for non-patch draw type {other:?}"),
    }
}

/// Builds the shared patch vertex buffer: one fan ring per family, center
/// vertices last so families can share ring vertices by index.
pub fn build_patch_vertices() -> Vec<PatchVertex> {
    let mut vertices = Vec::new();
    // Midpoint-fan ring + center.
    for i in 0..=MIDPOINT_FAN_PATCH_SEGMENT_SPAN {
        vertices.push(PatchVertex {
            params: [i as f32, 1.0, 1.0, 0.0],
        });
    }
    vertices.push(PatchVertex {
        params: [0.0, 0.0, 1.0, 1.0],
    });
    // Center-AA skirt ring (zero-coverage outer edge).
    for i in 0..=MIDPOINT_FAN_PATCH_SEGMENT_SPAN {
        vertices.push(PatchVertex {
            params: [i as f32, 1.0, 0.0, 2.0],
        });
    }
    // Outer-curve strip: an inner and outer vertex per segment boundary.
    for i in 0..=OUTER_CURVE_PATCH_SEGMENT_SPAN {
        vertices.push(PatchVertex {
            params: [i as f32, 0.0, 1.0, 3.0],
        });
        vertices.push(PatchVertex {
            params: [i as f32, 1.0, 0.0, 3.0],
        });
    }
    vertices
}

/// Builds the shared patch index buffer matching [`build_patch_vertices`].
pub fn build_patch_indices() -> Vec<u16> {
    let mut indices = Vec::with_capacity(PATCH_INDEX_BUFFER_COUNT as usize);
    let fan_center = (MIDPOINT_FAN_PATCH_SEGMENT_SPAN + 1) as u16;
    // Midpoint fan: center + two consecutive ring vertices per triangle.
    for i in 0..MIDPOINT_FAN_PATCH_SEGMENT_SPAN as u16 {
        indices.extend_from_slice(&[fan_center, i, i + 1]);
    }
    // Center-AA: the fan again, then a skirt quad strip stitched to the
    // zero-coverage ring.
    let skirt_base = fan_center + 1;
    for i in 0..MIDPOINT_FAN_PATCH_SEGMENT_SPAN as u16 {
        indices.extend_from_slice(&[fan_center, i, i + 1]);
        indices.extend_from_slice(&[i, skirt_base + i, i + 1]);
    }
    // Outer curve: quad strip of (inner, outer) pairs, split into triangles.
    let strip_base = skirt_base + MIDPOINT_FAN_PATCH_SEGMENT_SPAN as u16 + 1;
    for i in 0..OUTER_CURVE_PATCH_SEGMENT_SPAN as u16 {
        let inner0 = strip_base + i * 2;
        let outer0 = inner0 + 1;
        let inner1 = inner0 + 2;
        if i % 2 == 0 {
            indices.extend_from_slice(&[inner0, outer0, inner1]);
        } else {
            indices.extend_from_slice(&[outer0, inner1, inner0]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_buffer_matches_layout_tables() {
        let indices = build_patch_indices();
        assert_eq!(indices.len() as u32, PATCH_INDEX_BUFFER_COUNT);

        // Families must tile the buffer exactly.
        assert_eq!(MIDPOINT_FAN_PATCH_BASE_INDEX, 0);
        assert_eq!(
            MIDPOINT_FAN_CENTER_AA_PATCH_BASE_INDEX,
            MIDPOINT_FAN_PATCH_INDEX_COUNT
        );
        assert_eq!(
            OUTER_CURVE_PATCH_BASE_INDEX,
            MIDPOINT_FAN_CENTER_AA_PATCH_BASE_INDEX + MIDPOINT_FAN_CENTER_AA_PATCH_INDEX_COUNT
        );
    }

    #[test]
    fn indices_stay_in_vertex_range() {
        let vertices = build_patch_vertices();
        let indices = build_patch_indices();
        let max = *indices.iter().max().unwrap() as usize;
        assert!(
            max < vertices.len(),
            "index {max} out of range for {} vertices",
            vertices.len()
        );
    }

    #[test]
    fn base_index_lookup_covers_patch_types() {
        use plume_core::gpu::DrawType;
        assert_eq!(patch_base_index(DrawType::MidpointFanPatches), 0);
        assert_eq!(
            patch_index_count(DrawType::OuterCurvePatches),
            OUTER_CURVE_PATCH_INDEX_COUNT
        );
    }

    #[test]
    #[should_panic(expected = "non-patch draw type")]
    fn base_index_rejects_non_patch_types() {
        use plume_core::gpu::DrawType;
        let _ = patch_base_index(DrawType::ImageRect);
    }
}
