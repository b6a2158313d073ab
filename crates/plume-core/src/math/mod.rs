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

//! 2D math primitives used across the pipeline.
//!
//! The renderer works exclusively in 2D screen/artboard space, so this module
//! stays deliberately small: a vector, an axis-aligned box, a 2x3 affine
//! matrix, a packed color, and the fit/alignment solver used when framing an
//! artboard inside a render target.

pub mod aabb;
pub mod alignment;
pub mod color;
pub mod matrix;
pub mod vector;

pub use aabb::Aabb;
pub use alignment::{compute_alignment, Alignment, Fit};
pub use color::Color;
pub use matrix::Mat2D;
pub use vector::Vec2;
