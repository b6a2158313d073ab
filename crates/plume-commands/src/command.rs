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

//! The tagged command type crossing the producer/consumer boundary.
//!
//! Commands carry plain data — handles, strings, numbers — never references
//! into producer-side state, so nothing game-thread-only can leak onto the
//! render thread. The two callback variants (`RunOnce` and direct draws) are
//! the documented escape hatch and still require `Send` payloads.

use crate::reply::ReplySender;
use crate::server::CommandServer;
use plume_core::gpu::TextureId;
use plume_core::handle::{
    ArtboardHandle, FileHandle, RenderImageHandle, RenderTargetHandle, StateMachineHandle,
    ViewModelHandle,
};
use plume_core::math::{Aabb, Alignment, Fit};
use plume_core::runtime::{
    DataType, DefaultViewModelInfo, DrawSink, EnumDefinition, FileMetadata, PointerEvent,
    PropertyDefinition, PropertyUpdate, PropertyValue,
};

/// Correlates an asynchronous reply with the call that requested it.
/// Strictly increasing per builder; never reused within a process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RequestId(pub u64);

/// Identifies one render target's draw stream on the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawKey(pub u64);

/// A callback executed once on the consumer thread.
pub type ServerCallback = Box<dyn FnOnce(&mut CommandServer) + Send>;

/// A caller-supplied draw executed inside a render target's frame bracket.
pub type DirectDrawCallback = Box<dyn FnOnce(DrawKey, &mut dyn DrawSink) + Send>;

/// Parameters of one artboard draw.
#[derive(Debug, Clone)]
pub struct DrawArtboardCommand {
    /// The artboard to draw.
    pub artboard: ArtboardHandle,
    /// The screen-space box the artboard is framed into.
    pub frame: Aabb,
    /// Alignment inside the frame.
    pub alignment: Alignment,
    /// Fit inside the frame.
    pub fit: Fit,
    /// Extra uniform scale around the alignment point.
    pub scale_factor: f32,
}

/// One entry of a render target's per-frame draw list.
pub enum DrawCommand {
    /// Draw an artboard with fit/alignment framing.
    Artboard(DrawArtboardCommand),
    /// Run a caller-supplied draw callback.
    Direct(DirectDrawCallback),
}

impl std::fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawCommand::Artboard(cmd) => f.debug_tuple("Artboard").field(cmd).finish(),
            DrawCommand::Direct(_) => f.write_str("Direct(..)"),
        }
    }
}

/// Which view-model instance a creation command asks for.
#[derive(Debug, Clone)]
pub enum ViewModelInstanceSpec {
    /// The named instance.
    Named(String),
    /// The view model's default instance.
    Default,
    /// A blank, all-defaults instance.
    Blank,
    /// The default instance of the artboard's default view model.
    DefaultForArtboard(ArtboardHandle),
}

/// Which pointer transition an input command carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Pointer moved.
    Move,
    /// Pointer pressed.
    Down,
    /// Pointer released.
    Up,
    /// Pointer left the artboard.
    Exit,
}

/// A command enqueued by the producer and executed by the consumer.
///
/// Variants carrying a `reply` sender answer exactly once; fire-and-forget
/// variants only carry their [`RequestId`] for logging and correlation.
pub enum Command {
    /// Decode file bytes and register the result under `handle`.
    LoadFile {
        /// Pre-allocated handle the file resolves under.
        handle: FileHandle,
        /// The opaque file bytes.
        bytes: Vec<u8>,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the file's metadata, or the decode error.
        reply: ReplySender<FileMetadata>,
    },
    /// Release the file behind `handle`.
    DeleteFile {
        /// The handle being destroyed.
        handle: FileHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Instantiate an artboard from a loaded file.
    CreateArtboard {
        /// The owning file.
        file: FileHandle,
        /// Pre-allocated handle the artboard resolves under.
        handle: ArtboardHandle,
        /// Artboard name; `None` instantiates the file's default.
        name: Option<String>,
        /// Correlation id.
        request_id: RequestId,
        /// Answered on success or failure.
        reply: ReplySender<()>,
    },
    /// Release the artboard behind `handle`.
    DeleteArtboard {
        /// The handle being destroyed.
        handle: ArtboardHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Instantiate a state machine on an artboard.
    CreateStateMachine {
        /// The owning artboard.
        artboard: ArtboardHandle,
        /// Pre-allocated handle the machine resolves under.
        handle: StateMachineHandle,
        /// Machine name; `None` instantiates the artboard's default.
        name: Option<String>,
        /// Correlation id.
        request_id: RequestId,
        /// Answered on success or failure.
        reply: ReplySender<()>,
    },
    /// Release the state machine behind `handle`.
    DeleteStateMachine {
        /// The handle being destroyed.
        handle: StateMachineHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Instantiate a view-model instance from a loaded file.
    CreateViewModel {
        /// The owning file.
        file: FileHandle,
        /// Pre-allocated handle the instance resolves under.
        handle: ViewModelHandle,
        /// The view model's name; `None` uses the artboard default (for
        /// [`ViewModelInstanceSpec::DefaultForArtboard`]).
        view_model: Option<String>,
        /// Which instance to create.
        instance: ViewModelInstanceSpec,
        /// Correlation id.
        request_id: RequestId,
        /// Answered on success or failure.
        reply: ReplySender<()>,
    },
    /// Release the view-model instance behind `handle`.
    DeleteViewModel {
        /// The handle being destroyed.
        handle: ViewModelHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Write a typed property value. Fire-and-forget.
    SetProperty {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Property name or dotted path.
        name: String,
        /// The new value.
        value: PropertyValue,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Fire a trigger property. Fire-and-forget.
    FireTrigger {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Trigger name.
        name: String,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Bind a nested view model property.
    SetNestedViewModel {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Property name.
        name: String,
        /// The instance to nest.
        value: ViewModelHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Bind an artboard property.
    SetArtboardProperty {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Property name.
        name: String,
        /// The artboard to bind.
        value: ArtboardHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Bind an image property.
    SetImageProperty {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Property name.
        name: String,
        /// The image to bind.
        value: RenderImageHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Append a nested view model to a list property.
    AppendToList {
        /// Target instance.
        view_model: ViewModelHandle,
        /// List property path.
        path: String,
        /// The instance to append.
        instance: ViewModelHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Insert a nested view model into a list property.
    InsertInList {
        /// Target instance.
        view_model: ViewModelHandle,
        /// List property path.
        path: String,
        /// The instance to insert.
        instance: ViewModelHandle,
        /// Insertion index.
        index: usize,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Remove an element from a list property.
    RemoveFromList {
        /// Target instance.
        view_model: ViewModelHandle,
        /// List property path.
        path: String,
        /// Removal index.
        index: usize,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Read a typed property value.
    GetProperty {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Property name or dotted path.
        name: String,
        /// Expected type.
        data_type: DataType,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the value read.
        reply: ReplySender<PropertyValue>,
    },
    /// Read a list property's length.
    GetListSize {
        /// Target instance.
        view_model: ViewModelHandle,
        /// List property path.
        path: String,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the element count.
        reply: ReplySender<usize>,
    },
    /// Stream future changes of a property.
    Subscribe {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Property name.
        name: String,
        /// Subscribed type.
        data_type: DataType,
        /// Correlation id; quote it to unsubscribe.
        request_id: RequestId,
        /// Where updates are delivered.
        sender: flume::Sender<PropertyUpdate>,
    },
    /// Stop a property subscription.
    Unsubscribe {
        /// Target instance.
        view_model: ViewModelHandle,
        /// Property name.
        name: String,
        /// Subscribed type.
        data_type: DataType,
        /// The id returned when subscribing.
        subscription_id: RequestId,
        /// Correlation id of this command.
        request_id: RequestId,
    },
    /// List a file's artboards.
    RequestArtboardNames {
        /// The file queried.
        file: FileHandle,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the names in declaration order.
        reply: ReplySender<Vec<String>>,
    },
    /// List an artboard's state machines.
    RequestStateMachineNames {
        /// The artboard queried.
        artboard: ArtboardHandle,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the names in declaration order.
        reply: ReplySender<Vec<String>>,
    },
    /// List a file's view models.
    RequestViewModelNames {
        /// The file queried.
        file: FileHandle,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the names in declaration order.
        reply: ReplySender<Vec<String>>,
    },
    /// List the named instances of a view model.
    RequestViewModelInstanceNames {
        /// The file queried.
        file: FileHandle,
        /// The view model queried.
        view_model: String,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the instance names.
        reply: ReplySender<Vec<String>>,
    },
    /// List a view model's property declarations.
    RequestViewModelProperties {
        /// The file queried.
        file: FileHandle,
        /// The view model queried.
        view_model: String,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the declarations.
        reply: ReplySender<Vec<PropertyDefinition>>,
    },
    /// List a file's enum declarations.
    RequestViewModelEnums {
        /// The file queried.
        file: FileHandle,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the declarations.
        reply: ReplySender<Vec<EnumDefinition>>,
    },
    /// Query the view model an artboard binds by default.
    RequestDefaultViewModelInfo {
        /// The artboard queried.
        artboard: ArtboardHandle,
        /// The owning file.
        file: FileHandle,
        /// Correlation id.
        request_id: RequestId,
        /// Answered with the binding info.
        reply: ReplySender<DefaultViewModelInfo>,
    },
    /// Deliver a pointer transition to a state machine.
    Pointer {
        /// Target machine.
        state_machine: StateMachineHandle,
        /// Which transition.
        action: PointerAction,
        /// The event payload.
        event: PointerEvent,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Advance a state machine by elapsed seconds.
    AdvanceStateMachine {
        /// Target machine.
        state_machine: StateMachineHandle,
        /// Seconds since the last advance.
        elapsed_seconds: f32,
    },
    /// Bind a view-model instance to a state machine.
    BindViewModel {
        /// Target machine.
        state_machine: StateMachineHandle,
        /// The instance to bind.
        view_model: ViewModelHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Register an externally-owned texture as a render image.
    RegisterExternalImage {
        /// Pre-allocated handle the image resolves under.
        handle: RenderImageHandle,
        /// The device texture backing it.
        texture: TextureId,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Release the render image behind `handle`.
    DeleteExternalImage {
        /// The handle being destroyed.
        handle: RenderImageHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Allocate a render target on the consumer.
    CreateRenderTarget {
        /// Pre-allocated handle the target resolves under.
        handle: RenderTargetHandle,
        /// Target width in pixels.
        width: u32,
        /// Target height in pixels.
        height: u32,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Release the render target behind `handle`.
    DeleteRenderTarget {
        /// The handle being destroyed.
        handle: RenderTargetHandle,
        /// Correlation id.
        request_id: RequestId,
    },
    /// Execute one render target's frame: every draw between one
    /// `begin_frame`/`flush` bracket, in enqueue order.
    Draw {
        /// The target drawn into.
        target: RenderTargetHandle,
        /// The target's draw stream key.
        draw_key: DrawKey,
        /// The ordered draws of this frame.
        draws: Vec<DrawCommand>,
    },
    /// Run a callback on the consumer thread.
    RunOnce(ServerCallback),
    /// Run a batch of callbacks, in order, in one drain step.
    RunBatch(Vec<ServerCallback>),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Enough to identify the variant in logs without dumping payloads.
        let name = match self {
            Command::LoadFile { .. } => "LoadFile",
            Command::DeleteFile { .. } => "DeleteFile",
            Command::CreateArtboard { .. } => "CreateArtboard",
            Command::DeleteArtboard { .. } => "DeleteArtboard",
            Command::CreateStateMachine { .. } => "CreateStateMachine",
            Command::DeleteStateMachine { .. } => "DeleteStateMachine",
            Command::CreateViewModel { .. } => "CreateViewModel",
            Command::DeleteViewModel { .. } => "DeleteViewModel",
            Command::SetProperty { .. } => "SetProperty",
            Command::FireTrigger { .. } => "FireTrigger",
            Command::SetNestedViewModel { .. } => "SetNestedViewModel",
            Command::SetArtboardProperty { .. } => "SetArtboardProperty",
            Command::SetImageProperty { .. } => "SetImageProperty",
            Command::AppendToList { .. } => "AppendToList",
            Command::InsertInList { .. } => "InsertInList",
            Command::RemoveFromList { .. } => "RemoveFromList",
            Command::GetProperty { .. } => "GetProperty",
            Command::GetListSize { .. } => "GetListSize",
            Command::Subscribe { .. } => "Subscribe",
            Command::Unsubscribe { .. } => "Unsubscribe",
            Command::RequestArtboardNames { .. } => "RequestArtboardNames",
            Command::RequestStateMachineNames { .. } => "RequestStateMachineNames",
            Command::RequestViewModelNames { .. } => "RequestViewModelNames",
            Command::RequestViewModelInstanceNames { .. } => "RequestViewModelInstanceNames",
            Command::RequestViewModelProperties { .. } => "RequestViewModelProperties",
            Command::RequestViewModelEnums { .. } => "RequestViewModelEnums",
            Command::RequestDefaultViewModelInfo { .. } => "RequestDefaultViewModelInfo",
            Command::Pointer { .. } => "Pointer",
            Command::AdvanceStateMachine { .. } => "AdvanceStateMachine",
            Command::BindViewModel { .. } => "BindViewModel",
            Command::RegisterExternalImage { .. } => "RegisterExternalImage",
            Command::DeleteExternalImage { .. } => "DeleteExternalImage",
            Command::CreateRenderTarget { .. } => "CreateRenderTarget",
            Command::DeleteRenderTarget { .. } => "DeleteRenderTarget",
            Command::Draw { .. } => "Draw",
            Command::RunOnce(_) => "RunOnce",
            Command::RunBatch(_) => "RunBatch",
        };
        f.write_str(name)
    }
}
