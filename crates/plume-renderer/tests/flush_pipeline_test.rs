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

//! Integration tests of the flush pipeline against the recording device.

use plume_core::gpu::{
    ContourData, DrawBatch, DrawType, GradientSpan, PaintAuxData, PaintData, PathData,
    TessVertexSpan,
};
use plume_core::math::Color;
use plume_core::runtime::DrawSink;
use plume_renderer::{
    DeviceCall, HeadlessDevice, LoadAction, RenderContext, RendererSettings,
};
use std::sync::Arc;

fn context_and_device(settings: RendererSettings) -> (Arc<HeadlessDevice>, RenderContext) {
    let device = HeadlessDevice::new();
    let context = RenderContext::new(device.clone(), settings).expect("context creation");
    (device, context)
}

/// Records a representative frame: one gradient span, one tessellation
/// span, one path record and one patch batch.
fn record_full_frame(recorder: &mut dyn DrawSink) {
    let path_id = recorder.push_path(
        PathData::default(),
        PaintData {
            params: 0,
            color: 0xFFFF_0000,
        },
        PaintAuxData::default(),
    );
    recorder.push_contour(ContourData {
        midpoint: [10.0, 10.0],
        path_id,
        vertex_index0: 0,
    });
    recorder.push_gradient_span(GradientSpan::new(0, 4096, 0, 0xFF00_0000, 0xFFFF_FFFF));
    recorder.push_tess_span(TessVertexSpan {
        y: 0.0,
        x1: 16,
        ..Default::default()
    });
    recorder.push_batch(DrawBatch::new(DrawType::MidpointFanPatches, 2, 0));
}

fn pass_labels(calls: &[DeviceCall]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| match call {
            DeviceCall::BeginPass { label, .. } => label.clone(),
            _ => None,
        })
        .collect()
}

#[test]
fn flush_emits_passes_in_fixed_order() {
    let (device, mut context) = context_and_device(RendererSettings::default());
    let mut target = context.create_render_target(128, 128).unwrap();
    device.take_calls();

    let mut recorder = context
        .begin_frame(&mut target, LoadAction::Clear, Color::BLACK)
        .unwrap();
    record_full_frame(&mut recorder);
    recorder.end_frame().unwrap();

    let calls = device.take_calls();
    let labels = pass_labels(&calls);
    assert_eq!(
        labels,
        vec![
            "plume.gradient",
            "plume.tessellation",
            "plume.patches",
            "plume.atomic_resolve",
        ],
        "gradient update, tessellation update, draws, resolve — in that order"
    );
    assert!(matches!(calls.last(), Some(DeviceCall::Submit(_))));
}

#[test]
fn empty_optional_stages_are_skipped() {
    let (device, mut context) = context_and_device(RendererSettings::default());
    let mut target = context.create_render_target(64, 64).unwrap();
    device.take_calls();

    let mut recorder = context
        .begin_frame(&mut target, LoadAction::Clear, Color::TRANSPARENT)
        .unwrap();
    // Only a triangulated interior draw: no gradient, no tessellation.
    recorder.push_path(PathData::default(), PaintData::default(), PaintAuxData::default());
    recorder.push_triangles(&[plume_core::gpu::TriangleVertex::default(); 3]);
    recorder.push_batch(DrawBatch::new(DrawType::InteriorTriangulation, 3, 0));
    recorder.end_frame().unwrap();

    let labels = pass_labels(&device.take_calls());
    assert_eq!(labels, vec!["plume.interior_triangles", "plume.atomic_resolve"]);
}

#[test]
fn coverage_is_cleared_before_any_pass() {
    let (device, mut context) = context_and_device(RendererSettings::default());
    let mut target = context.create_render_target(64, 64).unwrap();
    device.take_calls();

    let mut recorder = context
        .begin_frame(&mut target, LoadAction::Clear, Color::TRANSPARENT)
        .unwrap();
    record_full_frame(&mut recorder);
    recorder.end_frame().unwrap();

    let calls = device.take_calls();
    let clear_index = calls
        .iter()
        .position(|c| matches!(c, DeviceCall::ClearTexture { .. }))
        .expect("coverage clear present");
    let first_pass_index = calls
        .iter()
        .position(|c| matches!(c, DeviceCall::BeginPass { .. }))
        .expect("at least one pass");
    assert!(clear_index < first_pass_index);
}

#[test]
fn ring_uploads_alternate_buffers_across_frames() {
    let (device, mut context) = context_and_device(RendererSettings::default());
    let mut target = context.create_render_target(64, 64).unwrap();

    // Map ring-buffer labels to ids from the creation log.
    let creation = device.take_calls();
    let grad_buffers: Vec<_> = creation
        .iter()
        .filter_map(|call| match call {
            DeviceCall::CreateBuffer { id, label: Some(l), .. }
                if l.starts_with("plume.grad_spans") =>
            {
                Some(*id)
            }
            _ => None,
        })
        .collect();
    assert_eq!(grad_buffers.len(), 3, "one buffer per frame in flight");

    let mut frame_uploads = Vec::new();
    for _ in 0..3 {
        let mut recorder = context
            .begin_frame(&mut target, LoadAction::Clear, Color::TRANSPARENT)
            .unwrap();
        record_full_frame(&mut recorder);
        recorder.end_frame().unwrap();

        let calls = device.take_calls();
        let upload = calls
            .iter()
            .find_map(|call| match call {
                DeviceCall::WriteBuffer { id, .. } if grad_buffers.contains(id) => Some(*id),
                _ => None,
            })
            .expect("gradient upload this frame");
        // The upload lands before this frame's submit.
        let upload_index = calls
            .iter()
            .position(|c| matches!(c, DeviceCall::WriteBuffer { id, .. } if *id == upload))
            .unwrap();
        let submit_index = calls
            .iter()
            .position(|c| matches!(c, DeviceCall::Submit(_)))
            .unwrap();
        assert!(upload_index < submit_index);
        frame_uploads.push(upload);
    }

    // Three consecutive frames touch three distinct ring slots.
    assert_eq!(frame_uploads.len(), 3);
    assert_ne!(frame_uploads[0], frame_uploads[1]);
    assert_ne!(frame_uploads[1], frame_uploads[2]);
    assert_ne!(frame_uploads[0], frame_uploads[2]);
}

#[test]
fn pipelines_are_compiled_once_and_reused() {
    let (device, mut context) = context_and_device(RendererSettings::default());
    let mut target = context.create_render_target(64, 64).unwrap();

    for _ in 0..3 {
        let mut recorder = context
            .begin_frame(&mut target, LoadAction::Clear, Color::TRANSPARENT)
            .unwrap();
        record_full_frame(&mut recorder);
        recorder.end_frame().unwrap();
    }

    let compiled = device
        .calls()
        .iter()
        .filter(|c| matches!(c, DeviceCall::CreatePipeline { .. }))
        .count();
    assert_eq!(
        compiled,
        context.pipeline_count(),
        "every compile is cached"
    );

    // A fourth identical frame compiles nothing new.
    let before = context.pipeline_count();
    let mut recorder = context
        .begin_frame(&mut target, LoadAction::Clear, Color::TRANSPARENT)
        .unwrap();
    record_full_frame(&mut recorder);
    recorder.end_frame().unwrap();
    assert_eq!(context.pipeline_count(), before);
}

#[test]
fn raster_ordered_mode_attaches_the_color_target() {
    let settings = RendererSettings {
        interlock_mode: plume_renderer::InterlockMode::RasterOrdered,
        ..Default::default()
    };
    let (device, mut context) = context_and_device(settings);
    let mut target = context.create_render_target(64, 64).unwrap();
    device.take_calls();

    let mut recorder = context
        .begin_frame(&mut target, LoadAction::Clear, Color::BLACK)
        .unwrap();
    record_full_frame(&mut recorder);
    recorder.end_frame().unwrap();

    let calls = device.take_calls();
    // No resolve pass in raster-ordered mode; draws blend into the target
    // directly.
    let labels = pass_labels(&calls);
    assert!(!labels.iter().any(|l| l == "plume.atomic_resolve"));
    let patch_pass_attachment = calls.iter().find_map(|c| match c {
        DeviceCall::BeginPass {
            label: Some(l),
            color_attachment,
        } if l == "plume.patches" => Some(*color_attachment),
        _ => None,
    });
    let (texture, _) = patch_pass_attachment.flatten().expect("color attachment");
    assert_eq!(texture, target.texture());
}

#[test]
fn atlas_batches_run_between_updates_and_draws() {
    let (device, mut context) = context_and_device(RendererSettings::default());
    let mut target = context.create_render_target(64, 64).unwrap();
    device.take_calls();

    let mut recorder = context
        .begin_frame(&mut target, LoadAction::Clear, Color::TRANSPARENT)
        .unwrap();
    record_full_frame(&mut recorder);
    recorder.push_atlas_fill(DrawBatch::new(DrawType::MidpointFanPatches, 1, 0));
    recorder.push_atlas_stroke(DrawBatch::new(DrawType::OuterCurvePatches, 1, 0));
    recorder.push_batch(DrawBatch::new(DrawType::AtlasBlit, 3, 0));
    recorder.end_frame().unwrap();

    let labels = pass_labels(&device.take_calls());
    assert_eq!(
        labels,
        vec![
            "plume.gradient",
            "plume.tessellation",
            "plume.atlas_fill",
            "plume.atlas_stroke",
            "plume.patches",
            "plume.atlas_blit",
            "plume.atomic_resolve",
        ]
    );
}

#[test]
fn frame_stats_accumulate() {
    let (_device, mut context) = context_and_device(RendererSettings::default());
    let mut target = context.create_render_target(64, 64).unwrap();
    for _ in 0..2 {
        let mut recorder = context
            .begin_frame(&mut target, LoadAction::Clear, Color::TRANSPARENT)
            .unwrap();
        record_full_frame(&mut recorder);
        recorder.end_frame().unwrap();
    }
    let stats = context.stats();
    assert_eq!(stats.flush_count, 2);
    assert!(stats.draw_count >= 8, "4 passes per frame, 2 frames");
}
