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

//! A packed 32-bit ARGB color.

use serde::{Deserialize, Serialize};

/// A color packed as `0xAARRGGBB`, the wire format property values and clear
/// colors travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);

    /// Packs the four 8-bit channels.
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Unpacks to premultiplied-alpha linear RGBA floats, the layout clear
    /// values are handed to the GPU in.
    pub fn to_rgba_premul_f32(self) -> [f32; 4] {
        let a = self.alpha() as f32 / 255.0;
        [
            self.red() as f32 / 255.0 * a,
            self.green() as f32 / 255.0 * a,
            self.blue() as f32 / 255.0 * a,
            a,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack() {
        let c = Color::from_argb(0x80, 0x10, 0x20, 0x30);
        assert_eq!(c.0, 0x8010_2030);
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.red(), 0x10);
        assert_eq!(c.green(), 0x20);
        assert_eq!(c.blue(), 0x30);
    }

    #[test]
    fn premultiplied_unpack() {
        let c = Color::from_argb(0, 0xFF, 0xFF, 0xFF);
        assert_eq!(c.to_rgba_premul_f32(), [0.0, 0.0, 0.0, 0.0]);
        let opaque = Color::from_argb(0xFF, 0xFF, 0, 0);
        assert_eq!(opaque.to_rgba_premul_f32(), [1.0, 0.0, 0.0, 1.0]);
    }
}
