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

//! A scripted runtime for driving the command pipeline in tests.
//!
//! Files are "decoded" from a trivial byte layout: anything starting with
//! the `PLUM` magic is a valid file exposing two artboards (`Hero`, `Menu`)
//! and one view model (`Dashboard`); anything else fails to decode.

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
use std::collections::HashMap;
use std::rc::Rc;

/// The magic a valid mock file starts with.
pub const FILE_MAGIC: &[u8] = b"PLUM";

/// A minimal valid file payload.
pub fn valid_file_bytes() -> Vec<u8> {
    FILE_MAGIC.to_vec()
}

pub struct MockRuntime;

impl VectorRuntime for MockRuntime {
    fn decode_file(&self, bytes: &[u8]) -> Result<Box<dyn FileResource>, DecodeError> {
        if bytes.starts_with(FILE_MAGIC) {
            Ok(Box::new(MockFile))
        } else {
            Err(DecodeError::Malformed("bad magic".into()))
        }
    }
}

pub struct MockFile;

impl FileResource for MockFile {
    fn artboard_names(&self) -> Vec<String> {
        vec!["Hero".into(), "Menu".into()]
    }

    fn view_model_names(&self) -> Vec<String> {
        vec!["Dashboard".into()]
    }

    fn enums(&self) -> Vec<EnumDefinition> {
        vec![EnumDefinition {
            name: "Mode".into(),
            values: vec!["Idle".into(), "Active".into()],
        }]
    }

    fn view_model_properties(&self, view_model: &str) -> Option<Vec<PropertyDefinition>> {
        (view_model == "Dashboard").then(|| {
            vec![
                PropertyDefinition {
                    name: "speed".into(),
                    data_type: DataType::Number,
                },
                PropertyDefinition {
                    name: "label".into(),
                    data_type: DataType::String,
                },
                PropertyDefinition {
                    name: "items".into(),
                    data_type: DataType::List,
                },
            ]
        })
    }

    fn view_model_instance_names(&self, view_model: &str) -> Option<Vec<String>> {
        (view_model == "Dashboard").then(|| vec!["Main".into()])
    }

    fn instantiate_default_artboard(&self) -> Option<SharedArtboard> {
        self.instantiate_artboard("Hero")
    }

    fn instantiate_artboard(&self, name: &str) -> Option<SharedArtboard> {
        matches!(name, "Hero" | "Menu").then(|| {
            Rc::new(RefCell::new(MockArtboard {
                name: name.to_string(),
            })) as SharedArtboard
        })
    }

    fn instantiate_view_model_instance(
        &self,
        view_model: &str,
        instance: &str,
    ) -> Option<SharedViewModel> {
        (view_model == "Dashboard" && instance == "Main")
            .then(|| Rc::new(RefCell::new(MockViewModel::default())) as SharedViewModel)
    }

    fn instantiate_default_view_model_instance(&self, view_model: &str) -> Option<SharedViewModel> {
        self.instantiate_view_model_instance(view_model, "Main")
    }

    fn instantiate_blank_view_model_instance(&self, view_model: &str) -> Option<SharedViewModel> {
        self.instantiate_view_model_instance(view_model, "Main")
    }
}

pub struct MockArtboard {
    pub name: String,
}

impl ArtboardResource for MockArtboard {
    fn bounds(&self) -> Aabb {
        Aabb::from_size(100.0, 100.0)
    }

    fn state_machine_names(&self) -> Vec<String> {
        vec!["Loop".into()]
    }

    fn instantiate_default_state_machine(&self) -> Option<SharedStateMachine> {
        self.instantiate_state_machine("Loop")
    }

    fn instantiate_state_machine(&self, name: &str) -> Option<SharedStateMachine> {
        (name == "Loop")
            .then(|| Rc::new(RefCell::new(MockStateMachine::default())) as SharedStateMachine)
    }

    fn default_view_model_info(&self) -> Option<DefaultViewModelInfo> {
        Some(DefaultViewModelInfo {
            view_model_name: "Dashboard".into(),
            instance_name: Some("Main".into()),
        })
    }

    fn bind_view_model(&mut self, _view_model: SharedViewModel) {}

    fn advance(&mut self, _elapsed_seconds: f32) {}

    fn draw(&self, sink: &mut dyn DrawSink) {
        let transform = sink.current_transform();
        let path_id = sink.push_path(
            PathData {
                matrix: transform.to_array(),
                stroke_radius: 0.0,
                z_index: 0,
            },
            PaintData {
                params: 0,
                color: 0xFF33_66FF,
            },
            PaintAuxData::default(),
        );
        sink.push_contour(ContourData {
            midpoint: [50.0, 50.0],
            path_id,
            vertex_index0: 0,
        });
        sink.push_gradient_span(GradientSpan::new(0, u16::MAX as u32, path_id, 0xFF00_0000, 0xFFFF_FFFF));
        sink.push_tess_span(TessVertexSpan {
            pts: [[0.0, 0.0, 50.0, 0.0], [100.0, 50.0, 100.0, 100.0]],
            y: path_id as f32,
            x0: 0,
            x1: 32,
            contour_id_with_flags: path_id,
            ..Default::default()
        });
        sink.push_batch(DrawBatch::new(DrawType::MidpointFanPatches, 1, 0));
    }
}

#[derive(Default)]
pub struct MockStateMachine {
    pub elapsed: f32,
    pub pointer_events: Vec<PointerEvent>,
    pub bound: Option<SharedViewModel>,
}

impl StateMachineResource for MockStateMachine {
    fn advance(&mut self, elapsed_seconds: f32) {
        self.elapsed += elapsed_seconds;
        if let Some(vm) = &self.bound {
            // Data-driven mutation: advancing writes the elapsed time into
            // the bound view model, which feeds subscriptions.
            vm.borrow_mut()
                .set_property("elapsed", PropertyValue::Number(self.elapsed));
        }
    }

    fn is_settled(&self) -> bool {
        self.elapsed > 1.0
    }

    fn pointer_move(&mut self, event: &PointerEvent) {
        self.pointer_events.push(*event);
    }

    fn pointer_down(&mut self, event: &PointerEvent) {
        self.pointer_events.push(*event);
    }

    fn pointer_up(&mut self, event: &PointerEvent) {
        self.pointer_events.push(*event);
    }

    fn pointer_exit(&mut self, event: &PointerEvent) {
        self.pointer_events.push(*event);
    }

    fn bind_view_model(&mut self, view_model: SharedViewModel) {
        self.bound = Some(view_model);
    }
}

pub struct MockViewModel {
    pub properties: HashMap<String, PropertyValue>,
    pub lists: HashMap<String, Vec<SharedViewModel>>,
    pub changes: Vec<PropertyUpdate>,
}

impl Default for MockViewModel {
    fn default() -> Self {
        let mut properties = HashMap::new();
        properties.insert("speed".to_string(), PropertyValue::Number(0.0));
        properties.insert("label".to_string(), PropertyValue::String(String::new()));
        properties.insert("elapsed".to_string(), PropertyValue::Number(0.0));
        let mut lists = HashMap::new();
        lists.insert("items".to_string(), Vec::new());
        Self {
            properties,
            lists,
            changes: Vec::new(),
        }
    }
}

impl ViewModelInstanceResource for MockViewModel {
    fn get_property(&self, name: &str, data_type: DataType) -> Option<PropertyValue> {
        let value = self.properties.get(name)?;
        (value.data_type() == data_type).then(|| value.clone())
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> bool {
        match self.properties.get_mut(name) {
            Some(existing) if existing.data_type() == value.data_type() => {
                *existing = value.clone();
                self.changes.push(PropertyUpdate {
                    name: name.to_string(),
                    value,
                });
                true
            }
            _ => false,
        }
    }

    fn fire_trigger(&mut self, name: &str) -> bool {
        if name == "boost" {
            self.changes.push(PropertyUpdate {
                name: name.to_string(),
                value: PropertyValue::Trigger,
            });
            true
        } else {
            false
        }
    }

    fn list_size(&self, name: &str) -> Option<usize> {
        self.lists.get(name).map(Vec::len)
    }

    fn append_to_list(&mut self, path: &str, instance: SharedViewModel) -> bool {
        match self.lists.get_mut(path) {
            Some(list) => {
                list.push(instance);
                true
            }
            None => false,
        }
    }

    fn insert_in_list(&mut self, path: &str, instance: SharedViewModel, index: usize) -> bool {
        match self.lists.get_mut(path) {
            Some(list) if index <= list.len() => {
                list.insert(index, instance);
                true
            }
            _ => false,
        }
    }

    fn remove_from_list(&mut self, path: &str, index: usize) -> bool {
        match self.lists.get_mut(path) {
            Some(list) if index < list.len() => {
                list.remove(index);
                true
            }
            _ => false,
        }
    }

    fn set_nested_view_model(&mut self, _name: &str, _instance: SharedViewModel) -> bool {
        true
    }

    fn set_artboard(&mut self, _name: &str, _artboard: SharedArtboard) -> bool {
        true
    }

    fn set_image(&mut self, _name: &str, _image_key: u64) -> bool {
        true
    }

    fn drain_changes(&mut self) -> Vec<PropertyUpdate> {
        std::mem::take(&mut self.changes)
    }
}
