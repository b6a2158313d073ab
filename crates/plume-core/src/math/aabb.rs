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

//! An axis-aligned bounding box.

use super::Vec2;

/// An axis-aligned rectangle in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Left edge.
    pub min_x: f32,
    /// Top edge.
    pub min_y: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub max_y: f32,
}

impl Aabb {
    /// Creates a box from edges.
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a box anchored at the origin with the given size.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Box width. Negative when the box is inverted.
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Box height. Negative when the box is inverted.
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// The center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Returns `true` when the box has zero or negative area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Returns `true` when `p` lies inside the box (edges inclusive).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basics() {
        let b = Aabb::new(10.0, 20.0, 110.0, 220.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 200.0);
        assert_eq!(b.center(), Vec2::new(60.0, 120.0));
        assert!(b.contains(Vec2::new(10.0, 220.0)));
        assert!(!b.contains(Vec2::new(9.9, 20.0)));
        assert!(!b.is_empty());
        assert!(Aabb::from_size(0.0, 5.0).is_empty());
    }
}
