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

//! The per-frame recorder artboards draw into.

use crate::flush::{FlushDescriptor, LoadAction};
use crate::context::RenderContext;
use crate::target::RenderTarget;
use plume_core::gpu::{
    ContourData, DrawBatch, DrawType, FlushUniforms, GradientSpan, ImageDrawUniforms,
    PaintAuxData, PaintData, PathData, RenderError, ShaderFeatures, TessVertexSpan, TriangleVertex,
};
use plume_core::math::{Color, Mat2D};
use plume_core::runtime::DrawSink;

/// Records one frame's worth of spans, storage records and draw batches,
/// then turns them into a [`FlushDescriptor`] and flushes.
///
/// A recorder dropped without [`end_frame`](FrameRecorder::end_frame) leaves
/// its target mid-bracket; the target must be `reset()` before reuse. That
/// path is logged loudly because it usually means a frame was abandoned by
/// an error path.
pub struct FrameRecorder<'a> {
    context: &'a mut RenderContext,
    target: &'a mut RenderTarget,
    load_action: LoadAction,
    clear_color: Color,

    transforms: Vec<Mat2D>,
    grad_spans: Vec<GradientSpan>,
    tess_spans: Vec<TessVertexSpan>,
    triangles: Vec<TriangleVertex>,
    image_draws: Vec<ImageDrawUniforms>,
    batches: Vec<DrawBatch>,
    atlas_fill_batches: Vec<DrawBatch>,
    atlas_stroke_batches: Vec<DrawBatch>,
    combined_features: ShaderFeatures,
    grad_rows: u32,
    tess_rows: u32,
    flushed: bool,
}

impl<'a> FrameRecorder<'a> {
    pub(crate) fn new(
        context: &'a mut RenderContext,
        target: &'a mut RenderTarget,
        load_action: LoadAction,
        clear_color: Color,
    ) -> Self {
        Self {
            context,
            target,
            load_action,
            clear_color,
            transforms: vec![Mat2D::IDENTITY],
            grad_spans: Vec::new(),
            tess_spans: Vec::new(),
            triangles: Vec::new(),
            image_draws: Vec::new(),
            batches: Vec::new(),
            atlas_fill_batches: Vec::new(),
            atlas_stroke_batches: Vec::new(),
            combined_features: ShaderFeatures::EMPTY,
            grad_rows: 0,
            tess_rows: 0,
            flushed: false,
        }
    }

    /// Dimensions of the target being recorded.
    pub fn target_size(&self) -> (u32, u32) {
        (self.target.width(), self.target.height())
    }

    /// Number of draw batches recorded so far.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Uploads everything recorded, builds the flush descriptor and flushes
    /// the frame. Consumes the recorder and closes the target's bracket.
    pub fn end_frame(mut self) -> Result<(), RenderError> {
        let result = self.finish();
        self.flushed = true;
        result
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        let interlock_mode = self.context.settings().interlock_mode;
        let wireframe = self.context.settings().wireframe;

        // In atomic mode a terminal resolve turns accumulated coverage into
        // color. It participates in batch ordering like any other batch.
        let mut batches = std::mem::take(&mut self.batches);
        if interlock_mode == crate::flush::InterlockMode::Atomics && !batches.is_empty() {
            let mut resolve = DrawBatch::new(DrawType::AtomicResolve, 1, 0);
            resolve.shader_features = self.combined_features;
            batches.push(resolve);
        }

        // Upload this frame's ring data. Guards upload on drop; the rings
        // rotate inside flush(), after submission.
        let grad_spans = std::mem::take(&mut self.grad_spans);
        if !grad_spans.is_empty() {
            let bytes = std::mem::size_of_val(grad_spans.as_slice()) as u64;
            self.context.resize_grad_span_buffer(bytes)?;
            self.context
                .map_grad_span_buffer(bytes)?
                .write_records(&grad_spans);
        }
        let tess_spans = std::mem::take(&mut self.tess_spans);
        if !tess_spans.is_empty() {
            let bytes = std::mem::size_of_val(tess_spans.as_slice()) as u64;
            self.context.resize_tess_span_buffer(bytes)?;
            self.context
                .map_tess_span_buffer(bytes)?
                .write_records(&tess_spans);
        }
        let triangles = std::mem::take(&mut self.triangles);
        if !triangles.is_empty() {
            let bytes = std::mem::size_of_val(triangles.as_slice()) as u64;
            self.context.resize_triangle_buffer(bytes)?;
            self.context
                .map_triangle_buffer(bytes)?
                .write_records(&triangles);
        }
        let image_draws = std::mem::take(&mut self.image_draws);
        if !image_draws.is_empty() {
            let bytes = std::mem::size_of_val(image_draws.as_slice()) as u64;
            self.context.resize_image_draw_uniform_buffer(bytes)?;
            self.context
                .map_image_draw_uniform_buffer(bytes)?
                .write_records(&image_draws);
        }

        let uniforms = FlushUniforms {
            grad_inverse_viewport_y: if self.grad_rows > 0 {
                1.0 / self.grad_rows as f32
            } else {
                0.0
            },
            tess_inverse_viewport_y: if self.tess_rows > 0 {
                1.0 / self.tess_rows as f32
            } else {
                0.0
            },
            render_target_width: self.target.width(),
            render_target_height: self.target.height(),
            coverage_clear_value: 0,
            path_id_granularity: 1,
            render_target_update_bounds: [
                0,
                0,
                self.target.width() as i32,
                self.target.height() as i32,
            ],
            debug_color: 0,
            reserved: 0,
        };
        let uniform_bytes = std::mem::size_of::<FlushUniforms>() as u64;
        self.context.resize_flush_uniform_buffer(uniform_bytes)?;
        self.context
            .map_flush_uniform_buffer(uniform_bytes)?
            .write_records(std::slice::from_ref(&uniforms));

        let descriptor = FlushDescriptor {
            load_action: self.load_action,
            clear_color: self.clear_color,
            coverage_clear_value: 0,
            grad_span_count: grad_spans.len() as u32,
            grad_data_height: self.grad_rows,
            tess_vertex_span_count: tess_spans.len() as u32,
            tess_data_height: self.tess_rows,
            first_path: 0,
            path_count: self.context.path_buffer.len() as u32,
            first_contour: 0,
            contour_count: self.context.contour_buffer.len() as u32,
            flush_uniform_offset: 0,
            combined_shader_features: self.combined_features,
            interlock_mode,
            wireframe,
            atlas_size: (
                crate::geometry::ATLAS_TEXTURE_WIDTH,
                crate::geometry::ATLAS_TEXTURE_INITIAL_HEIGHT,
            ),
            atlas_fill_batches: std::mem::take(&mut self.atlas_fill_batches),
            atlas_stroke_batches: std::mem::take(&mut self.atlas_stroke_batches),
            draw_list: batches,
        };
        self.context.flush(self.target, &descriptor)
    }
}

impl Drop for FrameRecorder<'_> {
    fn drop(&mut self) {
        if !self.flushed {
            log::warn!(
                "FrameRecorder dropped without end_frame(); target stays mid-bracket until reset()"
            );
        }
    }
}

impl DrawSink for FrameRecorder<'_> {
    fn save(&mut self) {
        let top = *self.transforms.last().expect("stack never empties");
        self.transforms.push(top);
    }

    fn restore(&mut self) {
        if self.transforms.len() <= 1 {
            log::error!("FrameRecorder: unbalanced restore()");
            return;
        }
        self.transforms.pop();
    }

    fn transform(&mut self, matrix: &Mat2D) {
        let top = self.transforms.last_mut().expect("stack never empties");
        *top = top.multiply(matrix);
    }

    fn current_transform(&self) -> Mat2D {
        *self.transforms.last().expect("stack never empties")
    }

    fn push_gradient_span(&mut self, span: GradientSpan) {
        self.grad_rows = self.grad_rows.max(span.y + 1);
        self.grad_spans.push(span);
    }

    fn push_tess_span(&mut self, span: TessVertexSpan) {
        self.tess_rows = self.tess_rows.max(span.y as u32 + 1);
        self.tess_spans.push(span);
    }

    fn push_path(&mut self, path: PathData, paint: PaintData, aux: PaintAuxData) -> u32 {
        let id = self.context.path_buffer.push(path);
        let paint_id = self.context.paint_buffer.push(paint);
        let aux_id = self.context.paint_aux_buffer.push(aux);
        debug_assert!(id == paint_id && id == aux_id, "records must stay parallel");
        id
    }

    fn push_contour(&mut self, contour: ContourData) -> u32 {
        self.context.contour_buffer.push(contour)
    }

    fn push_triangles(&mut self, vertices: &[TriangleVertex]) -> u32 {
        let base = self.triangles.len() as u32;
        self.triangles.extend_from_slice(vertices);
        base
    }

    fn push_image_draw(&mut self, uniforms: ImageDrawUniforms) -> u32 {
        let offset = (self.image_draws.len() * std::mem::size_of::<ImageDrawUniforms>()) as u32;
        self.image_draws.push(uniforms);
        offset
    }

    fn push_atlas_fill(&mut self, batch: DrawBatch) {
        self.combined_features |= batch.shader_features | ShaderFeatures::ENABLE_FEATHER;
        self.atlas_fill_batches.push(batch);
    }

    fn push_atlas_stroke(&mut self, batch: DrawBatch) {
        self.combined_features |= batch.shader_features | ShaderFeatures::ENABLE_FEATHER;
        self.atlas_stroke_batches.push(batch);
    }

    fn push_batch(&mut self, batch: DrawBatch) {
        self.combined_features |= batch.shader_features;
        self.batches.push(batch);
    }
}
