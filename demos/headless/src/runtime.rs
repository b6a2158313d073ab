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

//! A tiny procedural runtime: one artboard ("Pulse") drawing a ring of path
//! patches, one state machine ("Beat") and one view model ("Controls").
//!
//! This is what a production integration would back with a real vector
//! runtime; here it exists to give the pipeline something to chew on.

use plume_core::gpu::{
    ContourData, DrawBatch, DrawType, GradientSpan, PaintAuxData, PaintData, PathData,
    TessVertexSpan,
};
use plume_core::math::Aabb;
use plume_core::runtime::{
    ArtboardResource, DataType, DecodeError, DefaultViewModelInfo, DrawSink, EnumDefinition,
    FileResource, PointerEvent, PropertyDefinition, PropertyUpdate, PropertyValue, SharedArtboard,
    SharedStateMachine, SharedViewModel, StateMachineResource, VectorRuntime,
    ViewModelInstanceResource,
};
use std::cell::RefCell;
use std::rc::Rc;

const MAGIC: &[u8] = b"PULSE";

/// The demo's file payload.
pub fn file_bytes() -> Vec<u8> {
    MAGIC.to_vec()
}

pub struct PulseRuntime;

impl VectorRuntime for PulseRuntime {
    fn decode_file(&self, bytes: &[u8]) -> Result<Box<dyn FileResource>, DecodeError> {
        if bytes.starts_with(MAGIC) {
            Ok(Box::new(PulseFile))
        } else {
            Err(DecodeError::Malformed("not a pulse file".into()))
        }
    }
}

struct PulseFile;

impl FileResource for PulseFile {
    fn artboard_names(&self) -> Vec<String> {
        vec!["Pulse".into()]
    }

    fn view_model_names(&self) -> Vec<String> {
        vec!["Controls".into()]
    }

    fn enums(&self) -> Vec<EnumDefinition> {
        Vec::new()
    }

    fn view_model_properties(&self, view_model: &str) -> Option<Vec<PropertyDefinition>> {
        (view_model == "Controls").then(|| {
            vec![PropertyDefinition {
                name: "speed".into(),
                data_type: DataType::Number,
            }]
        })
    }

    fn view_model_instance_names(&self, view_model: &str) -> Option<Vec<String>> {
        (view_model == "Controls").then(|| vec!["Default".into()])
    }

    fn instantiate_default_artboard(&self) -> Option<SharedArtboard> {
        self.instantiate_artboard("Pulse")
    }

    fn instantiate_artboard(&self, name: &str) -> Option<SharedArtboard> {
        (name == "Pulse").then(|| {
            Rc::new(RefCell::new(PulseArtboard { phase: 0.0 })) as SharedArtboard
        })
    }

    fn instantiate_view_model_instance(
        &self,
        view_model: &str,
        _instance: &str,
    ) -> Option<SharedViewModel> {
        (view_model == "Controls")
            .then(|| Rc::new(RefCell::new(Controls::default())) as SharedViewModel)
    }

    fn instantiate_default_view_model_instance(&self, view_model: &str) -> Option<SharedViewModel> {
        self.instantiate_view_model_instance(view_model, "Default")
    }

    fn instantiate_blank_view_model_instance(&self, view_model: &str) -> Option<SharedViewModel> {
        self.instantiate_view_model_instance(view_model, "Default")
    }
}

struct PulseArtboard {
    phase: f32,
}

impl ArtboardResource for PulseArtboard {
    fn bounds(&self) -> Aabb {
        Aabb::from_size(200.0, 200.0)
    }

    fn state_machine_names(&self) -> Vec<String> {
        vec!["Beat".into()]
    }

    fn instantiate_default_state_machine(&self) -> Option<SharedStateMachine> {
        self.instantiate_state_machine("Beat")
    }

    fn instantiate_state_machine(&self, name: &str) -> Option<SharedStateMachine> {
        (name == "Beat").then(|| {
            Rc::new(RefCell::new(BeatMachine::default())) as SharedStateMachine
        })
    }

    fn default_view_model_info(&self) -> Option<DefaultViewModelInfo> {
        Some(DefaultViewModelInfo {
            view_model_name: "Controls".into(),
            instance_name: Some("Default".into()),
        })
    }

    fn bind_view_model(&mut self, _view_model: SharedViewModel) {}

    fn advance(&mut self, elapsed_seconds: f32) {
        self.phase += elapsed_seconds;
    }

    fn draw(&self, sink: &mut dyn DrawSink) {
        let transform = sink.current_transform();
        // A gradient ramp and a ring of eight fan patches whose paints walk
        // the ramp.
        sink.push_gradient_span(GradientSpan::new(0, 1 << 16, 0, 0xFF10_2040, 0xFFF0_D080));
        for i in 0..8u32 {
            let path_id = sink.push_path(
                PathData {
                    matrix: transform.to_array(),
                    stroke_radius: 0.0,
                    z_index: i,
                },
                PaintData {
                    params: 1,
                    color: i * 32,
                },
                PaintAuxData::default(),
            );
            sink.push_contour(ContourData {
                midpoint: [100.0, 100.0],
                path_id,
                vertex_index0: i * 16,
            });
            sink.push_tess_span(TessVertexSpan {
                y: i as f32,
                x0: (i * 16) as i32,
                x1: (i * 16 + 16) as i32,
                contour_id_with_flags: path_id,
                ..Default::default()
            });
        }
        sink.push_batch(DrawBatch::new(DrawType::MidpointFanPatches, 8, 0));
        sink.push_batch(DrawBatch::new(DrawType::OuterCurvePatches, 8, 0));
    }
}

#[derive(Default)]
struct BeatMachine {
    elapsed: f32,
    bound: Option<SharedViewModel>,
}

impl StateMachineResource for BeatMachine {
    fn advance(&mut self, elapsed_seconds: f32) {
        self.elapsed += elapsed_seconds;
        if let Some(controls) = &self.bound {
            controls
                .borrow_mut()
                .set_property("speed", PropertyValue::Number(self.elapsed.sin().abs()));
        }
    }

    fn is_settled(&self) -> bool {
        false
    }

    fn pointer_move(&mut self, _event: &PointerEvent) {}
    fn pointer_down(&mut self, _event: &PointerEvent) {}
    fn pointer_up(&mut self, _event: &PointerEvent) {}
    fn pointer_exit(&mut self, _event: &PointerEvent) {}

    fn bind_view_model(&mut self, view_model: SharedViewModel) {
        self.bound = Some(view_model);
    }
}

#[derive(Default)]
struct Controls {
    speed: f32,
    changes: Vec<PropertyUpdate>,
}

impl ViewModelInstanceResource for Controls {
    fn get_property(&self, name: &str, data_type: DataType) -> Option<PropertyValue> {
        (name == "speed" && data_type == DataType::Number)
            .then(|| PropertyValue::Number(self.speed))
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> bool {
        match (name, value) {
            ("speed", PropertyValue::Number(v)) => {
                self.speed = v;
                self.changes.push(PropertyUpdate {
                    name: name.to_string(),
                    value: PropertyValue::Number(v),
                });
                true
            }
            _ => false,
        }
    }

    fn fire_trigger(&mut self, _name: &str) -> bool {
        false
    }

    fn list_size(&self, _name: &str) -> Option<usize> {
        None
    }

    fn append_to_list(&mut self, _path: &str, _instance: SharedViewModel) -> bool {
        false
    }

    fn insert_in_list(&mut self, _path: &str, _instance: SharedViewModel, _index: usize) -> bool {
        false
    }

    fn remove_from_list(&mut self, _path: &str, _index: usize) -> bool {
        false
    }

    fn set_nested_view_model(&mut self, _name: &str, _instance: SharedViewModel) -> bool {
        false
    }

    fn set_artboard(&mut self, _name: &str, _artboard: SharedArtboard) -> bool {
        false
    }

    fn set_image(&mut self, _name: &str, _image_key: u64) -> bool {
        false
    }

    fn drain_changes(&mut self) -> Vec<PropertyUpdate> {
        std::mem::take(&mut self.changes)
    }
}
