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

//! The object traits the command server drives.
//!
//! Objects are created on the consumer thread and never leave it, so the
//! resource traits carry no `Send` bound; only the [`VectorRuntime`] entry
//! point crosses threads (it is moved into the consumer at startup).

use super::error::DecodeError;
use super::sink::DrawSink;
use super::value::{
    DataType, DefaultViewModelInfo, EnumDefinition, PointerEvent, PropertyDefinition,
    PropertyUpdate, PropertyValue,
};
use crate::math::Aabb;
use std::cell::RefCell;
use std::rc::Rc;

/// A view-model instance shared between its registry slot and any state
/// machines it is bound to. Consumer-thread-only by construction.
pub type SharedViewModel = Rc<RefCell<dyn ViewModelInstanceResource>>;

/// An artboard instance shared between its registry slot and any property
/// bindings referencing it.
pub type SharedArtboard = Rc<RefCell<dyn ArtboardResource>>;

/// A state machine instance owned by its registry slot.
pub type SharedStateMachine = Rc<RefCell<dyn StateMachineResource>>;

/// The runtime's decoding entry point. Moved onto the consumer thread at
/// startup; everything it creates stays there.
pub trait VectorRuntime: Send + 'static {
    /// Decodes raw file bytes into a live file object.
    ///
    /// The bytes are an opaque payload; their format belongs to the runtime.
    fn decode_file(&self, bytes: &[u8]) -> Result<Box<dyn FileResource>, DecodeError>;
}

/// A decoded animation file.
pub trait FileResource {
    /// Artboards in the file, in declaration order.
    fn artboard_names(&self) -> Vec<String>;

    /// View models in the file, in declaration order.
    fn view_model_names(&self) -> Vec<String>;

    /// Enums declared in the file.
    fn enums(&self) -> Vec<EnumDefinition>;

    /// Property declarations of the named view model, or `None` when no such
    /// view model exists.
    fn view_model_properties(&self, view_model: &str) -> Option<Vec<PropertyDefinition>>;

    /// Named instances of the given view model, or `None` when no such view
    /// model exists.
    fn view_model_instance_names(&self, view_model: &str) -> Option<Vec<String>>;

    /// Instantiates the file's default artboard, or `None` when the file has
    /// no artboards.
    fn instantiate_default_artboard(&self) -> Option<SharedArtboard>;

    /// Instantiates the named artboard.
    fn instantiate_artboard(&self, name: &str) -> Option<SharedArtboard>;

    /// Instantiates the named instance of the named view model.
    fn instantiate_view_model_instance(
        &self,
        view_model: &str,
        instance: &str,
    ) -> Option<SharedViewModel>;

    /// Instantiates the default instance of the named view model.
    fn instantiate_default_view_model_instance(&self, view_model: &str)
        -> Option<SharedViewModel>;

    /// Instantiates a blank (all-defaults) instance of the named view model.
    fn instantiate_blank_view_model_instance(&self, view_model: &str) -> Option<SharedViewModel>;
}

/// A live artboard instance.
pub trait ArtboardResource {
    /// The artboard's local bounds.
    fn bounds(&self) -> Aabb;

    /// State machines declared on the artboard.
    fn state_machine_names(&self) -> Vec<String>;

    /// Instantiates the artboard's default state machine.
    fn instantiate_default_state_machine(&self) -> Option<SharedStateMachine>;

    /// Instantiates the named state machine.
    fn instantiate_state_machine(&self, name: &str) -> Option<SharedStateMachine>;

    /// The view model this artboard binds by default, if any.
    fn default_view_model_info(&self) -> Option<DefaultViewModelInfo>;

    /// Binds a view-model instance directly to the artboard.
    fn bind_view_model(&mut self, view_model: SharedViewModel);

    /// Advances the artboard's own animations by `elapsed_seconds`.
    fn advance(&mut self, elapsed_seconds: f32);

    /// Renders the artboard into the frame being recorded.
    fn draw(&self, sink: &mut dyn DrawSink);
}

/// A live state machine instance.
pub trait StateMachineResource {
    /// Advances the machine by `elapsed_seconds`, applying queued inputs.
    fn advance(&mut self, elapsed_seconds: f32);

    /// `true` once the machine has no active transitions left.
    fn is_settled(&self) -> bool;

    /// Pointer moved over the artboard.
    fn pointer_move(&mut self, event: &PointerEvent);

    /// Pointer pressed.
    fn pointer_down(&mut self, event: &PointerEvent);

    /// Pointer released.
    fn pointer_up(&mut self, event: &PointerEvent);

    /// Pointer left the artboard.
    fn pointer_exit(&mut self, event: &PointerEvent);

    /// Binds a view-model instance for data-driven transitions.
    fn bind_view_model(&mut self, view_model: SharedViewModel);
}

/// A live view-model instance.
///
/// Setters return `false` when the property does not exist or has a
/// different type; the caller decides whether that is reply-worthy or just
/// log-worthy.
pub trait ViewModelInstanceResource {
    /// Reads a property of the given type by name (or dotted path).
    fn get_property(&self, name: &str, data_type: DataType) -> Option<PropertyValue>;

    /// Writes a property. The value's type must match the property's.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> bool;

    /// Fires a trigger property.
    fn fire_trigger(&mut self, name: &str) -> bool;

    /// Number of elements in a list property.
    fn list_size(&self, name: &str) -> Option<usize>;

    /// Appends a nested view model to a list property.
    fn append_to_list(&mut self, path: &str, instance: SharedViewModel) -> bool;

    /// Inserts a nested view model into a list property at `index`.
    fn insert_in_list(&mut self, path: &str, instance: SharedViewModel, index: usize) -> bool;

    /// Removes the element at `index` from a list property.
    fn remove_from_list(&mut self, path: &str, index: usize) -> bool;

    /// Binds a nested view-model property.
    fn set_nested_view_model(&mut self, name: &str, instance: SharedViewModel) -> bool;

    /// Binds an artboard property.
    fn set_artboard(&mut self, name: &str, artboard: SharedArtboard) -> bool;

    /// Binds an image property by an opaque image key the server resolves.
    fn set_image(&mut self, name: &str, image_key: u64) -> bool;

    /// Drains property changes accumulated since the last call (both from
    /// setters and from state-machine-driven mutation). Feeds subscriptions.
    fn drain_changes(&mut self) -> Vec<PropertyUpdate>;
}
