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

//! Pipeline state descriptors and the draw-level [`PipelineState`] model.
//!
//! Two layers live here. The descriptor types ([`RenderPipelineDescriptor`]
//! and friends) are what a concrete device consumes when compiling a pipeline
//! object. [`PipelineState`] is the compact, draw-batch-level state the vector
//! pipeline reasons about; the renderer translates it into a descriptor once
//! per distinct [`PipelineState::unique_key`] and caches the result.

use crate::plume_bitflags;
use std::borrow::Cow;

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

/// The topology of the primitives a pipeline assembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Independent triangles.
    #[default]
    TriangleList,
    /// A connected triangle strip.
    TriangleStrip,
}

/// The rasterization mode for polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Filled polygons.
    #[default]
    Fill,
    /// Outlines only (wireframe).
    Line,
}

/// The vertex winding order that determines the "front" face of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrontFace {
    /// Counter-clockwise winding is front-facing.
    #[default]
    Ccw,
    /// Clockwise winding is front-facing.
    Cw,
}

/// The face culling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// Cull front-facing triangles.
    Front,
    /// Cull back-facing triangles.
    Back,
}

/// The comparison function used for depth and stencil tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    /// The test never passes.
    Never,
    /// Passes when the new value is less than the existing one.
    Less,
    /// Passes on equality.
    Equal,
    /// Passes when less than or equal.
    LessEqual,
    /// Passes when greater.
    Greater,
    /// Passes on inequality.
    NotEqual,
    /// Passes when greater than or equal.
    GreaterEqual,
    /// The test always passes.
    #[default]
    Always,
}

/// An operation applied to a stencil value after a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOperation {
    /// Leave the stencil value unchanged.
    #[default]
    Keep,
    /// Set the stencil value to zero.
    Zero,
    /// Replace the stencil value with the reference.
    Replace,
    /// Increment, clamping at the maximum value.
    IncrClamp,
    /// Decrement, clamping at zero.
    DecrClamp,
    /// Bitwise-invert the stencil value.
    Invert,
    /// Increment with wraparound.
    IncrWrap,
    /// Decrement with wraparound.
    DecrWrap,
}

/// The stencil test and operations for a single face of a primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StencilFaceState {
    /// The comparison function used for the stencil test.
    pub compare: CompareFunction,
    /// The operation to perform if the stencil test fails.
    pub fail_op: StencilOperation,
    /// The operation to perform if the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOperation,
    /// The operation to perform if both the stencil and depth tests pass.
    pub pass_op: StencilOperation,
}

/// Full stencil configuration for a draw, reference value included.
///
/// Masks are 8-bit: the vector pipeline only ever uses an 8-bit stencil
/// aspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StencilState {
    /// Stencil state for front-facing primitives.
    pub front: StencilFaceState,
    /// Stencil state for back-facing primitives.
    pub back: StencilFaceState,
    /// The reference value compared against.
    pub reference: u8,
    /// Bitmask for reading from the stencil buffer.
    pub read_mask: u8,
    /// Bitmask for writing to the stencil buffer.
    pub write_mask: u8,
}

/// A blend factor applied to the source or destination color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// Factor of zero.
    Zero,
    /// Factor of one.
    One,
    /// The source alpha.
    SrcAlpha,
    /// One minus the source alpha.
    OneMinusSrcAlpha,
    /// The destination alpha.
    DstAlpha,
    /// One minus the destination alpha.
    OneMinusDstAlpha,
}

/// The operation combining the weighted source and destination colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOperation {
    /// `src * src_factor + dst * dst_factor`
    Add,
    /// `src * src_factor - dst * dst_factor`
    Subtract,
    /// `dst * dst_factor - src * src_factor`
    ReverseSubtract,
    /// Component-wise minimum.
    Min,
    /// Component-wise maximum.
    Max,
}

/// A complete blend equation for one component group (RGB or alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendComponent {
    /// The blend factor for the source color (from the fragment shader).
    pub src_factor: BlendFactor,
    /// The blend factor for the destination color (already in the target).
    pub dst_factor: BlendFactor,
    /// The operation to combine the two.
    pub operation: BlendOperation,
}

impl BlendComponent {
    /// Premultiplied-alpha over blend: `src + dst * (1 - src.a)`.
    pub const OVER: Self = Self {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
        operation: BlendOperation::Add,
    };
    /// Pure additive accumulation.
    pub const ADDITIVE: Self = Self {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    };
    /// Component-wise maximum.
    pub const MAX: Self = Self {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Max,
    };
}

/// The blend state for a single color target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendStateDescriptor {
    /// The blend equation for the RGB components.
    pub color: BlendComponent,
    /// The blend equation for the alpha component.
    pub alpha: BlendComponent,
}

plume_bitflags! {
    /// A bitmask to enable or disable writes to individual color channels.
    pub struct ColorWrites: u8 {
        /// Enable writes to the red channel.
        const R = 0b0001;
        /// Enable writes to the green channel.
        const G = 0b0010;
        /// Enable writes to the blue channel.
        const B = 0b0100;
        /// Enable writes to the alpha channel.
        const A = 0b1000;
        /// Enable writes to all channels.
        const ALL = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

/// The depth/stencil state a pipeline object is compiled with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepthStencilStateDescriptor {
    /// If `true`, depth values will be written to the depth buffer.
    pub depth_write_enabled: bool,
    /// The comparison function used for the depth test.
    pub depth_compare: CompareFunction,
    /// The stencil state for front-facing primitives.
    pub stencil_front: StencilFaceState,
    /// The stencil state for back-facing primitives.
    pub stencil_back: StencilFaceState,
    /// A bitmask for reading from the stencil buffer.
    pub stencil_read_mask: u8,
    /// A bitmask for writing to the stencil buffer.
    pub stencil_write_mask: u8,
}

/// The fixed catalog of shader programs the vector pipeline uses.
///
/// The shader set is closed: every pass the pipeline can emit is covered by
/// one of these programs, so a device maps them to precompiled modules
/// instead of compiling source at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Rasterizes gradient color ramps into the gradient texture.
    GradientRamp,
    /// Evaluates curve tessellation into the tessellation texture.
    Tessellation,
    /// Instanced path patch rendering (fans and outer curves).
    PathPatch,
    /// Pre-triangulated interior coverage.
    InteriorTriangles,
    /// Accumulates feathered fill coverage into the atlas (additive blend).
    AtlasFill,
    /// Accumulates feathered stroke coverage into the atlas (max blend).
    AtlasStroke,
    /// Blits feathered coverage from the atlas into the target.
    AtlasBlit,
    /// Textured axis-aligned image quad.
    ImageRect,
    /// Arbitrary textured image mesh.
    ImageMesh,
    /// Final coverage-to-color resolve in atomic mode.
    AtomicResolve,
}

/// The fixed catalog of vertex input layouts, one per pass family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// Gradient span instances.
    Gradient,
    /// Tessellation span instances.
    Tessellation,
    /// Static patch vertices.
    Paths,
    /// Interior triangle vertices.
    InteriorTriangles,
    /// Image rect vertices.
    ImageRect,
    /// Image mesh position + UV streams.
    ImageMesh,
    /// No vertex input; the resolve pass generates a fullscreen strip.
    Resolve,
}

/// A descriptor used to compile a render pipeline object.
#[derive(Debug, Clone)]
pub struct RenderPipelineDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Which shader program the pipeline runs.
    pub shader: ShaderKind,
    /// Which vertex input layout the pipeline consumes.
    pub vertex_layout: VertexLayout,
    /// Primitive assembly topology.
    pub topology: PrimitiveTopology,
    /// Fill or wireframe rasterization.
    pub polygon_mode: PolygonMode,
    /// Face culling, if any.
    pub cull_mode: Option<CullMode>,
    /// Which winding is front-facing.
    pub front_face: FrontFace,
    /// Blending for the color target; `None` disables blending.
    pub blend: Option<BlendStateDescriptor>,
    /// Depth/stencil state; `None` disables both tests.
    pub depth_stencil: Option<DepthStencilStateDescriptor>,
    /// Which color channels are written.
    pub color_writes: ColorWrites,
}

/// An opaque handle to a compiled render pipeline object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPipelineId(pub usize);

/// The blend equations the vector renderer can request per draw batch.
///
/// Only [`SrcOver`](BlendEquation::SrcOver), [`Additive`](BlendEquation::Additive)
/// and [`Max`](BlendEquation::Max) are implemented by the backend; the
/// advanced and HSL modes are a permanent capability gap of this pipeline and
/// translating one is a hard failure rather than a silently wrong image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendEquation {
    /// Standard premultiplied-alpha over.
    #[default]
    SrcOver,
    /// Additive accumulation (atlas fill coverage).
    Additive,
    /// Component-wise maximum (atlas stroke coverage).
    Max,
    /// Unsupported: `src + dst` saturating plus.
    Plus,
    /// Unsupported advanced mode.
    Screen,
    /// Unsupported advanced mode.
    Overlay,
    /// Unsupported advanced mode.
    Darken,
    /// Unsupported advanced mode.
    Lighten,
    /// Unsupported advanced mode.
    ColorDodge,
    /// Unsupported advanced mode.
    ColorBurn,
    /// Unsupported advanced mode.
    HardLight,
    /// Unsupported advanced mode.
    SoftLight,
    /// Unsupported advanced mode.
    Difference,
    /// Unsupported advanced mode.
    Exclusion,
    /// Unsupported advanced mode.
    Multiply,
    /// Unsupported HSL mode.
    HslHue,
    /// Unsupported HSL mode.
    HslSaturation,
    /// Unsupported HSL mode.
    HslColor,
    /// Unsupported HSL mode.
    HslLuminosity,
}

impl BlendEquation {
    /// `true` for the equations the backend can actually compile.
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            BlendEquation::SrcOver | BlendEquation::Additive | BlendEquation::Max
        )
    }
}

/// The draw-batch-level pipeline state.
///
/// This is the state the flush loop attaches to every [`DrawBatch`]
/// (see [`crate::gpu::data`]); the renderer folds it into a full
/// [`RenderPipelineDescriptor`] and caches the compiled object under
/// [`PipelineState::unique_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PipelineState {
    /// Requested blend equation.
    pub blend_equation: BlendEquation,
    /// Face culling, if any.
    pub cull_mode: Option<CullMode>,
    /// Whether the depth test is enabled.
    pub depth_test: bool,
    /// Stencil configuration, if the draw uses the stencil aspect.
    pub stencil: Option<StencilState>,
    /// Which color channels are written.
    pub color_writes: ColorWrites,
    /// Wireframe rasterization toggle.
    pub wireframe: bool,
}

const fn compare_bits(c: CompareFunction) -> u64 {
    c as u64 // 8 variants, 3 bits
}

const fn stencil_op_bits(op: StencilOperation) -> u64 {
    op as u64 // 8 variants, 3 bits
}

const fn face_bits(face: &StencilFaceState) -> u64 {
    compare_bits(face.compare)
        | (stencil_op_bits(face.fail_op) << 3)
        | (stencil_op_bits(face.depth_fail_op) << 6)
        | (stencil_op_bits(face.pass_op) << 9)
}

impl PipelineState {
    /// Packs every field, stencil reference included, into a 64-bit cache
    /// key. Two states with equal keys are interchangeable pipeline objects;
    /// any field difference (even just the stencil reference) produces a
    /// different key.
    pub const fn unique_key(&self) -> u64 {
        let mut key = self.blend_equation as u64; // 19 variants, 5 bits
        key |= (match self.cull_mode {
            None => 0u64,
            Some(CullMode::Front) => 1,
            Some(CullMode::Back) => 2,
        }) << 5;
        key |= (self.depth_test as u64) << 7;
        key |= (self.wireframe as u64) << 8;
        key |= (self.color_writes.bits() as u64) << 9; // 4 bits
        match &self.stencil {
            None => key,
            Some(s) => {
                key |= 1 << 13;
                key |= (s.reference as u64) << 14;
                key |= (s.read_mask as u64) << 22;
                key |= (s.write_mask as u64) << 30;
                key |= face_bits(&s.front) << 38; // 12 bits
                key |= face_bits(&s.back) << 50; // 12 bits
                key
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stencil_state() -> StencilState {
        StencilState {
            front: StencilFaceState {
                compare: CompareFunction::Equal,
                fail_op: StencilOperation::Keep,
                depth_fail_op: StencilOperation::Keep,
                pass_op: StencilOperation::Replace,
            },
            back: StencilFaceState {
                compare: CompareFunction::NotEqual,
                fail_op: StencilOperation::Zero,
                depth_fail_op: StencilOperation::Keep,
                pass_op: StencilOperation::IncrWrap,
            },
            reference: 0x80,
            read_mask: 0xFF,
            write_mask: 0xFF,
        }
    }

    #[test]
    fn identical_states_share_a_key() {
        let a = PipelineState {
            blend_equation: BlendEquation::SrcOver,
            stencil: Some(stencil_state()),
            color_writes: ColorWrites::ALL,
            ..Default::default()
        };
        let b = a;
        assert_eq!(a.unique_key(), b.unique_key());
    }

    #[test]
    fn stencil_reference_changes_the_key() {
        let mut stencil = stencil_state();
        let a = PipelineState {
            stencil: Some(stencil),
            color_writes: ColorWrites::ALL,
            ..Default::default()
        };
        stencil.reference = 0x81;
        let b = PipelineState {
            stencil: Some(stencil),
            ..a
        };
        assert_ne!(a.unique_key(), b.unique_key());
    }

    #[test]
    fn field_differences_never_collide() {
        let base = PipelineState {
            color_writes: ColorWrites::ALL,
            ..Default::default()
        };
        let variants = [
            PipelineState {
                blend_equation: BlendEquation::Additive,
                ..base
            },
            PipelineState {
                cull_mode: Some(CullMode::Back),
                ..base
            },
            PipelineState {
                depth_test: true,
                ..base
            },
            PipelineState {
                wireframe: true,
                ..base
            },
            PipelineState {
                color_writes: ColorWrites::EMPTY,
                ..base
            },
            PipelineState {
                stencil: Some(stencil_state()),
                ..base
            },
        ];
        let mut keys: Vec<u64> = variants.iter().map(|s| s.unique_key()).collect();
        keys.push(base.unique_key());
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), variants.len() + 1, "all keys must be distinct");
    }

    #[test]
    fn unsupported_equations_are_flagged() {
        assert!(BlendEquation::SrcOver.is_supported());
        assert!(BlendEquation::Additive.is_supported());
        assert!(BlendEquation::Max.is_supported());
        assert!(!BlendEquation::Multiply.is_supported());
        assert!(!BlendEquation::HslLuminosity.is_supported());
    }
}
