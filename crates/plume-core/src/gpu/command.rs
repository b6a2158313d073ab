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

//! Defines data structures used for recording and describing GPU passes.

use super::buffer::BufferId;
use super::texture::{SamplerId, TextureId};

/// An opaque handle to a recorded command buffer that is ready for submission.
///
/// This ID is returned by [`CommandEncoder::finish`](super::CommandEncoder::finish)
/// and consumed by [`GpuDevice::submit`](super::GpuDevice::submit).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CommandBufferId(pub u64);

/// Describes the operation to perform on an attachment at the start of a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoadOp {
    /// The existing contents of the attachment are loaded into the pass.
    Load,
    /// The attachment is cleared to the given premultiplied RGBA value.
    Clear([f32; 4]),
    /// The prior contents are irrelevant and may be left undefined.
    DontCare,
}

/// Describes the operation to perform on an attachment at the end of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    /// The results of the pass are stored to the attachment's memory.
    Store,
    /// The results are discarded (a win on tile-based GPUs).
    Discard,
}

/// A color attachment for a render pass.
#[derive(Debug, Clone, Copy)]
pub struct ColorAttachment {
    /// The texture rendered to.
    pub texture: TextureId,
    /// Operation at pass start.
    pub load: LoadOp,
    /// Operation at pass end.
    pub store: StoreOp,
}

/// The value a storage texture is cleared to outside a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// Clear each texel to the same unsigned integer.
    Uint(u32),
    /// Clear to a premultiplied RGBA float value.
    Float([f32; 4]),
}

/// A shader-visible resource bound to a numbered slot for one pass.
#[derive(Debug, Clone, Copy)]
pub enum BindingResource {
    /// A sampled texture.
    Texture(TextureId),
    /// A read/write storage texture.
    StorageTexture(TextureId),
    /// A window of a uniform buffer.
    UniformBuffer {
        /// The buffer bound.
        buffer: BufferId,
        /// Byte offset of the window.
        offset: u64,
        /// Byte length of the window.
        size: u64,
    },
    /// A window of a read-only structured buffer, in elements.
    StorageBuffer {
        /// The buffer bound.
        buffer: BufferId,
        /// First element visible to the shader.
        element_offset: u64,
        /// Number of elements visible.
        element_count: u64,
    },
    /// A sampler.
    Sampler(SamplerId),
}

/// A descriptor for a render pass.
#[derive(Debug, Default)]
pub struct RenderPassDescriptor<'a> {
    /// An optional debug label for the pass.
    pub label: Option<&'a str>,
    /// The color attachment, if the pass rasterizes into one. Atomic-mode
    /// passes write through storage textures instead and leave this empty.
    pub color_attachment: Option<ColorAttachment>,
}
