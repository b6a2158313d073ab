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

//! The per-flush descriptor driving pass sequencing.

use plume_core::gpu::{DrawBatch, ShaderFeatures};
use plume_core::math::Color;
use serde::{Deserialize, Serialize};

/// What happens to the color target's prior contents at flush start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// Clear to the descriptor's clear color.
    Clear,
    /// Keep what is already in the target.
    Preserve,
    /// Prior contents are irrelevant.
    DontCare,
}

/// How draws synchronize their read-modify-write of coverage and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterlockMode {
    /// Hardware raster-order views serialize overlapping fragments; draws
    /// blend straight into the color target.
    RasterOrdered,
    /// Coverage is accumulated through atomic storage operations and a
    /// terminal resolve pass writes color.
    Atomics,
}

/// Parameters of one GPU flush: everything the pass pipeline needs to turn
/// the frame's recorded data into draw submissions.
#[derive(Debug, Clone)]
pub struct FlushDescriptor {
    /// What happens to the target's prior contents.
    pub load_action: LoadAction,
    /// Clear color used when `load_action` is [`LoadAction::Clear`].
    pub clear_color: Color,
    /// Value the coverage buffer is cleared to.
    pub coverage_clear_value: u32,
    /// Number of gradient spans written this flush; zero skips the gradient
    /// update pass.
    pub grad_span_count: u32,
    /// Occupied height of the gradient texture, in ramp rows.
    pub grad_data_height: u32,
    /// Number of tessellation spans written; zero skips the tessellation
    /// update pass.
    pub tess_vertex_span_count: u32,
    /// Occupied height of the tessellation texture, in rows.
    pub tess_data_height: u32,
    /// First path record visible to this flush.
    pub first_path: u32,
    /// Number of path (and paint) records.
    pub path_count: u32,
    /// First contour record visible to this flush.
    pub first_contour: u32,
    /// Number of contour records.
    pub contour_count: u32,
    /// Byte offset of this flush's uniforms in the flush-uniform ring.
    pub flush_uniform_offset: u64,
    /// Union of all batches' shader features.
    pub combined_shader_features: ShaderFeatures,
    /// Interlock strategy for this flush.
    pub interlock_mode: InterlockMode,
    /// Wireframe rasterization toggle.
    pub wireframe: bool,
    /// Occupied size of the feather atlas, in texels.
    pub atlas_size: (u32, u32),
    /// Feathered fill coverage accumulated into the atlas (additive blend)
    /// before the draw list runs.
    pub atlas_fill_batches: Vec<DrawBatch>,
    /// Feathered stroke coverage accumulated into the atlas (max blend).
    pub atlas_stroke_batches: Vec<DrawBatch>,
    /// The ordered draw batches of this flush.
    pub draw_list: Vec<DrawBatch>,
}
