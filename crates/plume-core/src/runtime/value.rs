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

//! Value and metadata types crossing the runtime boundary.

use crate::math::{Alignment, Color, Fit, Vec2};

/// The type of a view-model property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean property.
    Bool,
    /// Floating-point number property.
    Number,
    /// String property.
    String,
    /// Packed ARGB color property.
    Color,
    /// Enumerated string property.
    Enum,
    /// Fire-and-forget trigger.
    Trigger,
    /// A list of nested view-model instances.
    List,
    /// A nested view-model instance.
    ViewModel,
    /// An image binding.
    Image,
    /// An artboard binding.
    Artboard,
}

/// A concrete property value, as produced by getter replies and subscription
/// updates. Only the queryable types appear here; lists, images, artboards
/// and nested view models are referenced by handle instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Number value.
    Number(f32),
    /// String value.
    String(String),
    /// Color value.
    Color(Color),
    /// Current enum variant name.
    Enum(String),
    /// A trigger fired (subscription updates only).
    Trigger,
}

impl PropertyValue {
    /// The [`DataType`] of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            PropertyValue::Bool(_) => DataType::Bool,
            PropertyValue::Number(_) => DataType::Number,
            PropertyValue::String(_) => DataType::String,
            PropertyValue::Color(_) => DataType::Color,
            PropertyValue::Enum(_) => DataType::Enum,
            PropertyValue::Trigger => DataType::Trigger,
        }
    }
}

/// A named property change, delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyUpdate {
    /// The property's name (or path, for nested properties).
    pub name: String,
    /// The new value.
    pub value: PropertyValue,
}

/// A property declaration in a view-model definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    /// Property name.
    pub name: String,
    /// Property type.
    pub data_type: DataType,
}

/// An enum declaration in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    /// Enum name.
    pub name: String,
    /// The variant names, in declaration order.
    pub values: Vec<String>,
}

/// Summary of a decoded file, sent to the load reply once decoding finishes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileMetadata {
    /// Artboards in the file, in declaration order.
    pub artboard_names: Vec<String>,
    /// View models in the file, in declaration order.
    pub view_model_names: Vec<String>,
}

/// The view model an artboard binds by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultViewModelInfo {
    /// The view model's name.
    pub view_model_name: String,
    /// The default instance name, if the artboard names one.
    pub instance_name: Option<String>,
}

/// A pointer event targeting a state machine, in screen space.
///
/// The consumer maps the position into artboard space using the same
/// fit/alignment the artboard is drawn with, so hits land where the user
/// sees the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in screen pixels.
    pub position: Vec2,
    /// The fit the artboard is displayed with.
    pub fit: Fit,
    /// The alignment the artboard is displayed with.
    pub alignment: Alignment,
    /// The size of the screen-space viewport the artboard is framed in.
    pub screen_bounds: Vec2,
}
