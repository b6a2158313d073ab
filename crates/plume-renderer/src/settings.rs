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

//! Global settings for the render backend.

use crate::flush::InterlockMode;
use serde::{Deserialize, Serialize};

/// A collection of global settings that affect the render backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// How many frames may be in flight; sizes every buffer ring.
    pub frames_in_flight: usize,
    /// Which interlock strategy the flush pipeline uses.
    pub interlock_mode: InterlockMode,
    /// If `true`, draw passes rasterize outlines instead of fills.
    pub wireframe: bool,
    /// Upper bound on the gradient texture height, in ramp rows.
    pub max_gradient_texture_height: u32,
    /// Upper bound on the tessellation texture height, in rows.
    pub max_tessellation_texture_height: u32,
    /// Initial byte capacity of each per-frame buffer ring.
    pub initial_ring_capacity: u64,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            frames_in_flight: 3,
            interlock_mode: InterlockMode::Atomics,
            wireframe: false,
            max_gradient_texture_height: 2048,
            max_tessellation_texture_height: 2048,
            initial_ring_capacity: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = RendererSettings::default();
        assert_eq!(settings.frames_in_flight, 3);
        assert_eq!(settings.interlock_mode, InterlockMode::Atomics);
        assert!(settings.initial_ring_capacity > 0);
    }
}
