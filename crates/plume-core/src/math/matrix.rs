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

//! A 2x3 affine transform matrix.

use super::Vec2;
use bytemuck::{Pod, Zeroable};

/// A 2x3 affine transform, column-major:
///
/// ```text
/// | xx  yx  tx |
/// | xy  yy  ty |
/// ```
///
/// Point mapping computes `(xx*x + yx*y + tx, xy*x + yy*y + ty)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Mat2D {
    /// X-axis basis vector, x component.
    pub xx: f32,
    /// X-axis basis vector, y component.
    pub xy: f32,
    /// Y-axis basis vector, x component.
    pub yx: f32,
    /// Y-axis basis vector, y component.
    pub yy: f32,
    /// Translation, x component.
    pub tx: f32,
    /// Translation, y component.
    pub ty: f32,
}

impl Default for Mat2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        xy: 0.0,
        yx: 0.0,
        yy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Creates a pure translation.
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self {
            xx: 1.0,
            xy: 0.0,
            yx: 0.0,
            yy: 1.0,
            tx,
            ty,
        }
    }

    /// Creates a non-uniform scale.
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            xx: sx,
            xy: 0.0,
            yx: 0.0,
            yy: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Composes `self * rhs` (rhs applied first).
    #[must_use]
    pub fn multiply(&self, rhs: &Mat2D) -> Mat2D {
        Mat2D {
            xx: self.xx * rhs.xx + self.yx * rhs.xy,
            xy: self.xy * rhs.xx + self.yy * rhs.xy,
            yx: self.xx * rhs.yx + self.yx * rhs.yy,
            yy: self.xy * rhs.yx + self.yy * rhs.yy,
            tx: self.xx * rhs.tx + self.yx * rhs.ty + self.tx,
            ty: self.xy * rhs.tx + self.yy * rhs.ty + self.ty,
        }
    }

    /// Maps a point through the transform.
    pub fn map_point(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: self.xx * p.x + self.yx * p.y + self.tx,
            y: self.xy * p.x + self.yy * p.y + self.ty,
        }
    }

    /// Returns the inverse transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Mat2D> {
        let det = self.xx * self.yy - self.yx * self.xy;
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Mat2D {
            xx: self.yy * inv_det,
            xy: -self.xy * inv_det,
            yx: -self.yx * inv_det,
            yy: self.xx * inv_det,
            tx: (self.yx * self.ty - self.yy * self.tx) * inv_det,
            ty: (self.xy * self.tx - self.xx * self.ty) * inv_det,
        })
    }

    /// The six components in `[xx, xy, yx, yy, tx, ty]` order, as uploaded to
    /// the GPU.
    pub fn to_array(&self) -> [f32; 6] {
        [self.xx, self.xy, self.yx, self.yy, self.tx, self.ty]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn multiply_applies_rhs_first() {
        let scale = Mat2D::scale(2.0, 2.0);
        let translate = Mat2D::translation(10.0, 0.0);
        // Scale first, then translate.
        let m = translate.multiply(&scale);
        let p = m.map_point(Vec2::new(1.0, 1.0));
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn invert_round_trips() {
        let m = Mat2D::translation(3.0, -7.0).multiply(&Mat2D::scale(0.5, 4.0));
        let inv = m.invert().expect("invertible");
        let p = Vec2::new(13.0, 29.0);
        let back = inv.map_point(m.map_point(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-4);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Mat2D::scale(0.0, 1.0).invert().is_none());
    }
}
