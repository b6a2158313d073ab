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

//! Fit/alignment solving for framing content inside a target box.

use super::{Aabb, Mat2D};
use serde::{Deserialize, Serialize};

/// How content is scaled to fill its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Fit {
    /// Stretch both axes independently to fill the frame exactly.
    Fill,
    /// Uniform scale so the content fits entirely inside the frame.
    #[default]
    Contain,
    /// Uniform scale so the content covers the frame entirely.
    Cover,
    /// Uniform scale matching frame width.
    FitWidth,
    /// Uniform scale matching frame height.
    FitHeight,
    /// No scaling; content is only aligned.
    None,
    /// Like `Contain`, but never scales up.
    ScaleDown,
}

/// Where content sits inside its frame along both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alignment {
    /// Top-left corner.
    TopLeft,
    /// Centered horizontally along the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Centered vertically along the left edge.
    CenterLeft,
    /// Dead center.
    #[default]
    Center,
    /// Centered vertically along the right edge.
    CenterRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Centered horizontally along the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
}

impl Alignment {
    /// The alignment factors in `[-1, 1]` for (x, y); `-1` hugs min edges,
    /// `1` hugs max edges.
    fn factors(self) -> (f32, f32) {
        match self {
            Alignment::TopLeft => (-1.0, -1.0),
            Alignment::TopCenter => (0.0, -1.0),
            Alignment::TopRight => (1.0, -1.0),
            Alignment::CenterLeft => (-1.0, 0.0),
            Alignment::Center => (0.0, 0.0),
            Alignment::CenterRight => (1.0, 0.0),
            Alignment::BottomLeft => (-1.0, 1.0),
            Alignment::BottomCenter => (0.0, 1.0),
            Alignment::BottomRight => (1.0, 1.0),
        }
    }
}

/// Computes the transform that frames `content` inside `frame` according to
/// `fit` and `alignment`, with a caller-supplied extra uniform `scale_factor`
/// applied around the alignment point.
///
/// Degenerate content (zero width or height) yields the identity transform so
/// a bad artboard can never poison downstream matrix math.
pub fn compute_alignment(
    fit: Fit,
    alignment: Alignment,
    frame: &Aabb,
    content: &Aabb,
    scale_factor: f32,
) -> Mat2D {
    let content_width = content.width();
    let content_height = content.height();
    if content_width <= 0.0 || content_height <= 0.0 {
        return Mat2D::IDENTITY;
    }

    let (mut sx, mut sy) = match fit {
        Fit::Fill => (
            frame.width() / content_width,
            frame.height() / content_height,
        ),
        Fit::Contain => {
            let s = (frame.width() / content_width).min(frame.height() / content_height);
            (s, s)
        }
        Fit::Cover => {
            let s = (frame.width() / content_width).max(frame.height() / content_height);
            (s, s)
        }
        Fit::FitWidth => {
            let s = frame.width() / content_width;
            (s, s)
        }
        Fit::FitHeight => {
            let s = frame.height() / content_height;
            (s, s)
        }
        Fit::None => (1.0, 1.0),
        Fit::ScaleDown => {
            let s = (frame.width() / content_width)
                .min(frame.height() / content_height)
                .min(1.0);
            (s, s)
        }
    };
    sx *= scale_factor;
    sy *= scale_factor;

    let (fx, fy) = alignment.factors();
    let half_frame_w = frame.width() * 0.5;
    let half_frame_h = frame.height() * 0.5;
    let half_content_w = content_width * sx * 0.5;
    let half_content_h = content_height * sy * 0.5;

    // Position the scaled content's alignment point onto the frame's.
    let tx = frame.min_x + half_frame_w + fx * (half_frame_w - half_content_w)
        - (content.min_x * sx + half_content_w);
    let ty = frame.min_y + half_frame_h + fy * (half_frame_h - half_content_h)
        - (content.min_y * sy + half_content_h);

    Mat2D::translation(tx, ty).multiply(&Mat2D::scale(sx, sy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use approx::assert_relative_eq;

    const FRAME: Aabb = Aabb::new(0.0, 0.0, 200.0, 100.0);
    const CONTENT: Aabb = Aabb::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn contain_centers_content() {
        let m = compute_alignment(Fit::Contain, Alignment::Center, &FRAME, &CONTENT, 1.0);
        // 100x100 content in a 200x100 frame: scale 1, centered horizontally.
        let p = m.map_point(Vec2::new(50.0, 50.0));
        assert_relative_eq!(p.x, 100.0);
        assert_relative_eq!(p.y, 50.0);
    }

    #[test]
    fn cover_fills_larger_axis() {
        let m = compute_alignment(Fit::Cover, Alignment::Center, &FRAME, &CONTENT, 1.0);
        // Cover scales by 2 (frame width / content width).
        let tl = m.map_point(Vec2::new(0.0, 0.0));
        let br = m.map_point(Vec2::new(100.0, 100.0));
        assert_relative_eq!(br.x - tl.x, 200.0);
        assert_relative_eq!(br.y - tl.y, 200.0);
    }

    #[test]
    fn top_left_pins_origin() {
        let m = compute_alignment(Fit::Contain, Alignment::TopLeft, &FRAME, &CONTENT, 1.0);
        let tl = m.map_point(Vec2::new(0.0, 0.0));
        assert_relative_eq!(tl.x, 0.0);
        assert_relative_eq!(tl.y, 0.0);
    }

    #[test]
    fn bottom_right_pins_far_corner() {
        let m = compute_alignment(Fit::Contain, Alignment::BottomRight, &FRAME, &CONTENT, 1.0);
        let br = m.map_point(Vec2::new(100.0, 100.0));
        assert_relative_eq!(br.x, 200.0);
        assert_relative_eq!(br.y, 100.0);
    }

    #[test]
    fn scale_down_never_enlarges() {
        let small = Aabb::from_size(10.0, 10.0);
        let m = compute_alignment(Fit::ScaleDown, Alignment::Center, &FRAME, &small, 1.0);
        let tl = m.map_point(Vec2::new(0.0, 0.0));
        let br = m.map_point(Vec2::new(10.0, 10.0));
        assert_relative_eq!(br.x - tl.x, 10.0);
    }

    #[test]
    fn degenerate_content_is_identity() {
        let empty = Aabb::from_size(0.0, 100.0);
        let m = compute_alignment(Fit::Contain, Alignment::Center, &FRAME, &empty, 1.0);
        assert_eq!(m, Mat2D::IDENTITY);
    }
}
