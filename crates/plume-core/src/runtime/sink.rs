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

//! The recording surface an artboard draws into.

use crate::gpu::{
    ContourData, DrawBatch, GradientSpan, ImageDrawUniforms, PaintAuxData, PaintData, PathData,
    TessVertexSpan, TriangleVertex,
};
use crate::math::Mat2D;

/// The per-frame recording surface the renderer hands to artboards.
///
/// A sink accumulates everything one flush needs: gradient and tessellation
/// spans, the per-path storage records, triangle vertices, and the ordered
/// draw batches that consume them. The transform stack scopes the
/// fit/alignment framing applied around each artboard draw.
pub trait DrawSink {
    /// Pushes a copy of the current transform onto the stack.
    fn save(&mut self);

    /// Pops the transform stack. Unbalanced restores are a caller bug and
    /// are logged, not fatal.
    fn restore(&mut self);

    /// Multiplies the current transform by `matrix`.
    fn transform(&mut self, matrix: &Mat2D);

    /// The current top of the transform stack.
    fn current_transform(&self) -> Mat2D;

    /// Queues one gradient ramp span for the gradient update pass.
    fn push_gradient_span(&mut self, span: GradientSpan);

    /// Queues one curve segment for the tessellation update pass.
    fn push_tess_span(&mut self, span: TessVertexSpan);

    /// Registers a path with its paint records; returns the path id draws
    /// reference.
    fn push_path(&mut self, path: PathData, paint: PaintData, aux: PaintAuxData) -> u32;

    /// Registers a contour record; returns the contour id.
    fn push_contour(&mut self, contour: ContourData) -> u32;

    /// Appends pre-triangulated vertices to the triangle buffer; returns the
    /// base vertex of the appended range.
    fn push_triangles(&mut self, vertices: &[TriangleVertex]) -> u32;

    /// Registers the uniforms of one image draw; returns the byte offset an
    /// image batch references them by.
    fn push_image_draw(&mut self, uniforms: ImageDrawUniforms) -> u32;

    /// Queues a feathered-fill coverage batch for the atlas stage; atlas
    /// batches run after the tessellation update and before the draw list.
    fn push_atlas_fill(&mut self, batch: DrawBatch);

    /// Queues a feathered-stroke coverage batch for the atlas stage.
    fn push_atlas_stroke(&mut self, batch: DrawBatch);

    /// Appends one ordered draw batch to the flush.
    fn push_batch(&mut self, batch: DrawBatch);
}
