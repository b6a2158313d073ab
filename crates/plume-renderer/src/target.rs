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

//! Render targets and their per-frame bracket state.

use plume_core::gpu::{
    Extent2D, GpuDevice, RenderError, ResourceError, TextureDescriptor, TextureFormat, TextureId,
    TextureUsage,
};
use std::borrow::Cow;

/// Where a target currently is in its frame bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameStage {
    /// Between frames; `begin_frame` is legal.
    Idle,
    /// Inside a `begin_frame`/`flush` bracket.
    Recording,
}

/// A destination for flushes: the color target plus the auxiliary coverage
/// and clip textures the atomic pipeline reads and writes.
///
/// Exactly one `begin_frame`/`flush` bracket may wrap a target per frame. A
/// target abandoned mid-bracket (an aborted frame) must be [`reset`] before
/// reuse.
///
/// [`reset`]: RenderTarget::reset
#[derive(Debug)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    texture: TextureId,
    coverage: TextureId,
    clip: TextureId,
    stage: FrameStage,
}

impl RenderTarget {
    /// Allocates a target and its auxiliary textures on `device`.
    pub fn new(device: &dyn GpuDevice, width: u32, height: u32) -> Result<Self, ResourceError> {
        let size = Extent2D::new(width, height);
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(Cow::Borrowed("plume.target.color")),
            size,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::RENDER_TARGET
                | TextureUsage::STORAGE
                | TextureUsage::SAMPLED
                | TextureUsage::COPY_DST,
        })?;
        let coverage = device.create_texture(&TextureDescriptor {
            label: Some(Cow::Borrowed("plume.target.coverage")),
            size,
            format: TextureFormat::R32Uint,
            usage: TextureUsage::STORAGE,
        })?;
        let clip = device.create_texture(&TextureDescriptor {
            label: Some(Cow::Borrowed("plume.target.clip")),
            size,
            format: TextureFormat::R32Uint,
            usage: TextureUsage::STORAGE,
        })?;
        Ok(Self {
            width,
            height,
            texture,
            coverage,
            clip,
            stage: FrameStage::Idle,
        })
    }

    /// Target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The color texture flushes render into.
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// The atomic coverage texture.
    pub fn coverage(&self) -> TextureId {
        self.coverage
    }

    /// The clip-index texture.
    pub fn clip(&self) -> TextureId {
        self.clip
    }

    /// `true` while inside a frame bracket.
    pub fn is_recording(&self) -> bool {
        self.stage == FrameStage::Recording
    }

    /// Opens the frame bracket. Fails if the previous bracket never closed.
    pub(crate) fn begin_frame(&mut self) -> Result<(), RenderError> {
        if self.stage != FrameStage::Idle {
            return Err(RenderError::FrameStateViolation(
                "begin_frame on a target already recording; reset() it first".into(),
            ));
        }
        self.stage = FrameStage::Recording;
        Ok(())
    }

    /// Closes the frame bracket after a flush.
    pub(crate) fn finish_frame(&mut self) {
        debug_assert_eq!(self.stage, FrameStage::Recording);
        self.stage = FrameStage::Idle;
    }

    /// Forces the target back to idle after an abandoned frame.
    pub fn reset(&mut self) {
        if self.stage == FrameStage::Recording {
            log::warn!("RenderTarget: reset() while mid-frame; dropping the open bracket");
        }
        self.stage = FrameStage::Idle;
    }

    /// Destroys the target's textures.
    pub fn destroy(&self, device: &dyn GpuDevice) {
        for texture in [self.texture, self.coverage, self.clip] {
            if let Err(e) = device.destroy_texture(texture) {
                log::warn!("RenderTarget: failed to destroy texture: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;

    #[test]
    fn bracket_must_alternate() {
        let device = HeadlessDevice::new();
        let mut target = RenderTarget::new(&*device, 64, 64).unwrap();
        target.begin_frame().unwrap();
        assert!(target.begin_frame().is_err(), "double begin is rejected");
        target.finish_frame();
        target.begin_frame().unwrap();
        target.finish_frame();
    }

    #[test]
    fn reset_recovers_an_abandoned_frame() {
        let device = HeadlessDevice::new();
        let mut target = RenderTarget::new(&*device, 64, 64).unwrap();
        target.begin_frame().unwrap();
        // The frame is abandoned (engine teardown mid-frame).
        target.reset();
        target.begin_frame().unwrap();
    }
}
