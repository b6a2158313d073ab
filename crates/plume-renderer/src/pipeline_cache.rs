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

//! Translation of draw-level [`PipelineState`] into device pipeline objects,
//! cached so state objects are compiled once and reused every frame.

use plume_core::gpu::{
    BlendComponent, BlendEquation, BlendStateDescriptor, CullMode, DepthStencilStateDescriptor,
    FrontFace, GpuDevice, PipelineState, PolygonMode, PrimitiveTopology, RenderPipelineDescriptor,
    RenderPipelineId, ResourceError, ShaderKind, VertexLayout,
};
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    shader: ShaderKind,
    vertex_layout: VertexLayout,
    topology: PrimitiveTopology,
    state_key: u64,
}

/// A cache of compiled pipeline objects keyed by pass identity plus
/// [`PipelineState::unique_key`].
#[derive(Debug, Default)]
pub struct PipelineCache {
    pipelines: HashMap<CacheKey, RenderPipelineId>,
}

impl PipelineCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct pipeline objects compiled so far.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// `true` when nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Returns the pipeline object for `(shader, layout, topology, state)`,
    /// compiling it on first use.
    pub fn get_or_create(
        &mut self,
        device: &dyn GpuDevice,
        shader: ShaderKind,
        vertex_layout: VertexLayout,
        topology: PrimitiveTopology,
        state: &PipelineState,
    ) -> Result<RenderPipelineId, ResourceError> {
        let key = CacheKey {
            shader,
            vertex_layout,
            topology,
            state_key: state.unique_key(),
        };
        if let Some(id) = self.pipelines.get(&key) {
            return Ok(*id);
        }
        let descriptor = translate_state(shader, vertex_layout, topology, state);
        let id = device.create_render_pipeline(&descriptor)?;
        self.pipelines.insert(key, id);
        log::trace!("PipelineCache: compiled {shader:?}/{vertex_layout:?} (total {})", self.len());
        Ok(id)
    }

    /// Destroys every cached pipeline object.
    pub fn destroy(&mut self, device: &dyn GpuDevice) {
        for (_, id) in self.pipelines.drain() {
            if let Err(e) = device.destroy_render_pipeline(id) {
                log::warn!("PipelineCache: failed to destroy pipeline: {e}");
            }
        }
    }
}

/// Maps a draw-level blend equation onto device blend state.
///
/// Panics on any equation outside the supported set: drawing with the wrong
/// blend math would silently corrupt output, which is worse than failing.
fn translate_blend(equation: BlendEquation) -> BlendStateDescriptor {
    let component = match equation {
        BlendEquation::SrcOver => BlendComponent::OVER,
        BlendEquation::Additive => BlendComponent::ADDITIVE,
        BlendEquation::Max => BlendComponent::MAX,
        unsupported => panic!(
            "blend equation {unsupported:?} is not implemented by this backend"
        ),
    };
    BlendStateDescriptor {
        color: component,
        alpha: component,
    }
}

/// Folds a [`PipelineState`] into a full pipeline descriptor.
///
/// The device's rasterizer winding convention is mirrored relative to the
/// vector pipeline's, so stencil faces and the cull direction are swapped
/// during translation.
fn translate_state<'a>(
    shader: ShaderKind,
    vertex_layout: VertexLayout,
    topology: PrimitiveTopology,
    state: &PipelineState,
) -> RenderPipelineDescriptor<'a> {
    let depth_stencil = if state.depth_test || state.stencil.is_some() {
        let stencil = state.stencil.unwrap_or_default();
        Some(DepthStencilStateDescriptor {
            depth_write_enabled: state.depth_test,
            depth_compare: if state.depth_test {
                plume_core::gpu::CompareFunction::GreaterEqual
            } else {
                plume_core::gpu::CompareFunction::Always
            },
            // Mirrored winding: front-face state applies to what the device
            // considers back faces, and vice versa.
            stencil_front: stencil.back,
            stencil_back: stencil.front,
            stencil_read_mask: stencil.read_mask,
            stencil_write_mask: stencil.write_mask,
        })
    } else {
        None
    };

    RenderPipelineDescriptor {
        label: Some(Cow::Owned(format!("plume.{shader:?}"))),
        shader,
        vertex_layout,
        topology,
        polygon_mode: if state.wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        },
        cull_mode: state.cull_mode.map(|cull| match cull {
            CullMode::Front => CullMode::Back,
            CullMode::Back => CullMode::Front,
        }),
        front_face: FrontFace::Ccw,
        blend: if state.color_writes.is_empty() {
            None
        } else {
            Some(translate_blend(state.blend_equation))
        },
        depth_stencil,
        color_writes: state.color_writes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;
    use plume_core::gpu::{ColorWrites, StencilFaceState, StencilOperation, StencilState};

    fn base_state() -> PipelineState {
        PipelineState {
            color_writes: ColorWrites::ALL,
            ..Default::default()
        }
    }

    #[test]
    fn identical_states_reuse_the_same_pipeline() {
        let device = HeadlessDevice::new();
        let mut cache = PipelineCache::new();
        let a = cache
            .get_or_create(
                &*device,
                ShaderKind::PathPatch,
                VertexLayout::Paths,
                PrimitiveTopology::TriangleList,
                &base_state(),
            )
            .unwrap();
        let b = cache
            .get_or_create(
                &*device,
                ShaderKind::PathPatch,
                VertexLayout::Paths,
                PrimitiveTopology::TriangleList,
                &base_state(),
            )
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stencil_reference_splits_the_cache_entry() {
        let device = HeadlessDevice::new();
        let mut cache = PipelineCache::new();
        let mut state = base_state();
        state.stencil = Some(StencilState {
            reference: 1,
            ..Default::default()
        });
        let a = cache
            .get_or_create(
                &*device,
                ShaderKind::PathPatch,
                VertexLayout::Paths,
                PrimitiveTopology::TriangleList,
                &state,
            )
            .unwrap();
        state.stencil.as_mut().unwrap().reference = 2;
        let b = cache
            .get_or_create(
                &*device,
                ShaderKind::PathPatch,
                VertexLayout::Paths,
                PrimitiveTopology::TriangleList,
                &state,
            )
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn same_state_different_shader_does_not_collide() {
        let device = HeadlessDevice::new();
        let mut cache = PipelineCache::new();
        let a = cache
            .get_or_create(
                &*device,
                ShaderKind::PathPatch,
                VertexLayout::Paths,
                PrimitiveTopology::TriangleList,
                &base_state(),
            )
            .unwrap();
        let b = cache
            .get_or_create(
                &*device,
                ShaderKind::InteriorTriangles,
                VertexLayout::InteriorTriangles,
                PrimitiveTopology::TriangleList,
                &base_state(),
            )
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn stencil_faces_are_swapped_for_the_device() {
        let mut state = base_state();
        let front = StencilFaceState {
            pass_op: StencilOperation::IncrWrap,
            ..Default::default()
        };
        let back = StencilFaceState {
            pass_op: StencilOperation::DecrWrap,
            ..Default::default()
        };
        state.stencil = Some(StencilState {
            front,
            back,
            ..Default::default()
        });
        let descriptor = translate_state(
            ShaderKind::PathPatch,
            VertexLayout::Paths,
            PrimitiveTopology::TriangleList,
            &state,
        );
        let ds = descriptor.depth_stencil.unwrap();
        assert_eq!(ds.stencil_front, back);
        assert_eq!(ds.stencil_back, front);
    }

    #[test]
    #[should_panic(expected = "not implemented by this backend")]
    fn unsupported_blend_mode_is_fatal() {
        translate_blend(BlendEquation::Multiply);
    }

    #[test]
    fn empty_color_writes_disable_blending() {
        let mut state = base_state();
        state.color_writes = ColorWrites::EMPTY;
        // Must not panic even with an unsupported equation: nothing is
        // written, so no blend state is compiled.
        state.blend_equation = BlendEquation::SrcOver;
        let descriptor = translate_state(
            ShaderKind::PathPatch,
            VertexLayout::Paths,
            PrimitiveTopology::TriangleList,
            &state,
        );
        assert!(descriptor.blend.is_none());
    }
}
