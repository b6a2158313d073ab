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

//! Defines data structures related to GPU texture and sampler resources.

use crate::plume_bitflags;
use std::borrow::Cow;

/// A 2D extent in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl Extent2D {
    /// Creates an extent from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The texel format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// 8-bit-per-channel RGBA, linear.
    #[default]
    Rgba8Unorm,
    /// 8-bit-per-channel BGRA, linear.
    Bgra8Unorm,
    /// One 32-bit unsigned integer channel; used for coverage and clip
    /// buffers accessed atomically.
    R32Uint,
    /// Four 32-bit float channels; the tessellation texture format.
    Rgba32Float,
    /// Four 32-bit unsigned integer channels.
    Rgba32Uint,
    /// One 16-bit float channel; the feather atlas format.
    R16Float,
}

plume_bitflags! {
    /// A set of flags describing the allowed usages of a [`TextureId`].
    pub struct TextureUsage: u32 {
        /// The texture can be sampled in a shader.
        const SAMPLED = 1 << 0;
        /// The texture can be bound as a render target color attachment.
        const RENDER_TARGET = 1 << 1;
        /// The texture can be read and written as unordered-access storage.
        const STORAGE = 1 << 2;
        /// The texture can be the destination of a CPU upload.
        const COPY_DST = 1 << 3;
    }
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label for the texture.
    pub label: Option<Cow<'a, str>>,
    /// Dimensions of the texture.
    pub size: Extent2D,
    /// Texel format.
    pub format: TextureFormat,
    /// A bitmask of [`TextureUsage`] flags.
    pub usage: TextureUsage,
}

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Texel filtering mode for a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerFilter {
    /// Nearest-neighbor.
    Nearest,
    /// Bilinear.
    #[default]
    Linear,
    /// Trilinear across mip levels.
    LinearMipmap,
}

/// A descriptor used to create a [`SamplerId`].
#[derive(Debug, Clone)]
pub struct SamplerDescriptor<'a> {
    /// An optional debug label for the sampler.
    pub label: Option<Cow<'a, str>>,
    /// Filtering applied when sampling.
    pub filter: SamplerFilter,
}

/// An opaque handle to a GPU sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerId(pub usize);
