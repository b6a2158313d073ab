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

//! Grow-only textures recreated only when a flush needs more room.

use plume_core::gpu::{
    Extent2D, GpuDevice, ResourceError, TextureDescriptor, TextureFormat, TextureId, TextureUsage,
};
use std::borrow::Cow;

/// A texture whose backing storage is (re)created lazily.
///
/// The gradient and tessellation textures grow with scene complexity but
/// almost never shrink within a session, so recreation only happens when the
/// requested dimensions exceed the current ones.
#[derive(Debug)]
pub struct LazyTexture {
    label: &'static str,
    format: TextureFormat,
    usage: TextureUsage,
    texture: Option<TextureId>,
    size: Extent2D,
}

impl LazyTexture {
    /// Declares a texture; no GPU memory is allocated yet.
    pub fn new(label: &'static str, format: TextureFormat, usage: TextureUsage) -> Self {
        Self {
            label,
            format,
            usage,
            texture: None,
            size: Extent2D::default(),
        }
    }

    /// Ensures the texture is at least `size`, recreating it if not.
    pub fn require(
        &mut self,
        device: &dyn GpuDevice,
        size: Extent2D,
    ) -> Result<TextureId, ResourceError> {
        let needs_recreate = match self.texture {
            None => true,
            Some(_) => size.width > self.size.width || size.height > self.size.height,
        };
        if needs_recreate {
            let new_size = Extent2D::new(
                size.width.max(self.size.width),
                size.height.max(self.size.height),
            );
            if let Some(old) = self.texture.take() {
                device.destroy_texture(old)?;
            }
            log::debug!(
                "LazyTexture({}): allocating {}x{}",
                self.label,
                new_size.width,
                new_size.height
            );
            self.texture = Some(device.create_texture(&TextureDescriptor {
                label: Some(Cow::Borrowed(self.label)),
                size: new_size,
                format: self.format,
                usage: self.usage,
            })?);
            self.size = new_size;
        }
        Ok(self.texture.expect("just ensured"))
    }

    /// The current backing texture, if one exists.
    pub fn id(&self) -> Option<TextureId> {
        self.texture
    }

    /// The current allocated size.
    pub fn size(&self) -> Extent2D {
        self.size
    }

    /// Destroys the backing texture, if any.
    pub fn destroy(&mut self, device: &dyn GpuDevice) {
        if let Some(texture) = self.texture.take() {
            if let Err(e) = device.destroy_texture(texture) {
                log::warn!("LazyTexture({}): failed to destroy: {e}", self.label);
            }
        }
        self.size = Extent2D::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;

    #[test]
    fn recreates_only_on_growth() {
        let device = HeadlessDevice::new();
        let mut texture = LazyTexture::new(
            "gradient",
            TextureFormat::Rgba8Unorm,
            TextureUsage::SAMPLED | TextureUsage::RENDER_TARGET,
        );
        let a = texture.require(&*device, Extent2D::new(512, 32)).unwrap();
        let b = texture.require(&*device, Extent2D::new(512, 16)).unwrap();
        assert_eq!(a, b, "smaller request keeps the texture");
        let c = texture.require(&*device, Extent2D::new(512, 64)).unwrap();
        assert_ne!(a, c, "taller request recreates");
        assert_eq!(texture.size(), Extent2D::new(512, 64));
    }
}
