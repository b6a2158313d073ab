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

//! The producer-side command API.
//!
//! A [`CommandBuilder`] lives on the game thread. Every call either mutates
//! local producer state (handle allocation, per-target draw lists) or posts
//! to the queue; nothing ever blocks. Results of asynchronous operations
//! come back through [`Reply`] channels keyed by [`RequestId`].
//!
//! The builder is deliberately `!Sync`: one thread owns it. The queue is
//! the only thread-safe handoff point.

use crate::command::{
    Command, DirectDrawCallback, DrawArtboardCommand, DrawCommand, DrawKey, PointerAction,
    RequestId, ServerCallback, ViewModelInstanceSpec,
};
use crate::queue::{Acknowledgement, CommandQueue};
use crate::reply::{reply_channel, subscription_channel, Reply, Subscription};
use plume_core::gpu::TextureId;
use plume_core::handle::{
    ArtboardHandle, FileHandle, HandleArena, RenderImageHandle, RenderTargetHandle,
    StateMachineHandle, ViewModelHandle,
};
use plume_core::math::Color;
use plume_core::runtime::{
    DataType, DefaultViewModelInfo, EnumDefinition, FileMetadata, PointerEvent,
    PropertyDefinition, PropertyValue,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// All draw commands of one render target for the current frame. Everything
/// here executes between one `begin_frame`/`flush` bracket on the consumer.
#[derive(Debug, Default)]
pub struct CommandSet {
    /// The target's unique draw stream key, created lazily on first draw.
    pub draw_key: Option<DrawKey>,
    /// Ordered draws of this frame.
    pub draws: Vec<DrawCommand>,
}

/// Producer-side, fire-and-forget API over the command queue.
pub struct CommandBuilder {
    queue: Arc<CommandQueue>,
    arena: HandleArena,
    current_request_id: u64,
    /// Non-draw callbacks batched until [`execute`](Self::execute).
    commands: Vec<ServerCallback>,
    /// Per-target draw lists batched until [`execute`](Self::execute).
    draw_commands: HashMap<RenderTargetHandle, CommandSet>,
    /// Draw keys survive `reset()`; a target keeps its key for its lifetime.
    draw_keys: HashMap<RenderTargetHandle, DrawKey>,
    _not_sync: PhantomData<Cell<()>>,
}

impl CommandBuilder {
    /// Creates a builder over `queue`.
    pub fn new(queue: Arc<CommandQueue>) -> Self {
        Self {
            queue,
            arena: HandleArena::new(),
            current_request_id: 0,
            commands: Vec::new(),
            draw_commands: HashMap::new(),
            draw_keys: HashMap::new(),
            _not_sync: PhantomData,
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.current_request_id += 1;
        RequestId(self.current_request_id)
    }

    /// Clears the batched (unexecuted) command lists. Called once per frame
    /// before building the next frame's commands.
    pub fn reset(&mut self) {
        if !self.commands.is_empty() || !self.draw_commands.is_empty() {
            log::warn!(
                "CommandBuilder::reset dropping {} callbacks and {} draw sets never executed",
                self.commands.len(),
                self.draw_commands.len()
            );
        }
        self.commands.clear();
        self.draw_commands.clear();
    }

    // --- files -----------------------------------------------------------

    /// Enqueues a file decode. The handle is valid immediately; the reply
    /// fires once the consumer has actually decoded the bytes.
    pub fn load_file(&mut self, bytes: Vec<u8>) -> (FileHandle, Reply<FileMetadata>) {
        let handle = FileHandle(self.arena.allocate());
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::LoadFile {
            handle,
            bytes,
            request_id,
            reply: reply_tx,
        });
        (handle, reply)
    }

    /// Enqueues destruction of a file. The handle's slot is recycled once
    /// the acknowledgement drains back through
    /// [`process_replies`](Self::process_replies).
    pub fn destroy_file(&mut self, handle: FileHandle) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::DeleteFile { handle, request_id });
        request_id
    }

    // --- artboards -------------------------------------------------------

    /// Instantiates the file's default artboard.
    pub fn create_default_artboard(&mut self, file: FileHandle) -> (ArtboardHandle, Reply<()>) {
        self.create_artboard_inner(file, None)
    }

    /// Instantiates a named artboard.
    pub fn create_artboard(
        &mut self,
        file: FileHandle,
        name: impl Into<String>,
    ) -> (ArtboardHandle, Reply<()>) {
        self.create_artboard_inner(file, Some(name.into()))
    }

    fn create_artboard_inner(
        &mut self,
        file: FileHandle,
        name: Option<String>,
    ) -> (ArtboardHandle, Reply<()>) {
        let handle = ArtboardHandle(self.arena.allocate());
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::CreateArtboard {
            file,
            handle,
            name,
            request_id,
            reply: reply_tx,
        });
        (handle, reply)
    }

    /// Enqueues destruction of an artboard.
    pub fn destroy_artboard(&mut self, handle: ArtboardHandle) -> RequestId {
        let request_id = self.next_request_id();
        self.queue
            .send(Command::DeleteArtboard { handle, request_id });
        request_id
    }

    // --- state machines --------------------------------------------------

    /// Instantiates the artboard's default state machine.
    pub fn create_default_state_machine(
        &mut self,
        artboard: ArtboardHandle,
    ) -> (StateMachineHandle, Reply<()>) {
        self.create_state_machine_inner(artboard, None)
    }

    /// Instantiates a named state machine.
    pub fn create_state_machine(
        &mut self,
        artboard: ArtboardHandle,
        name: impl Into<String>,
    ) -> (StateMachineHandle, Reply<()>) {
        self.create_state_machine_inner(artboard, Some(name.into()))
    }

    fn create_state_machine_inner(
        &mut self,
        artboard: ArtboardHandle,
        name: Option<String>,
    ) -> (StateMachineHandle, Reply<()>) {
        let handle = StateMachineHandle(self.arena.allocate());
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::CreateStateMachine {
            artboard,
            handle,
            name,
            request_id,
            reply: reply_tx,
        });
        (handle, reply)
    }

    /// Enqueues destruction of a state machine.
    pub fn destroy_state_machine(&mut self, handle: StateMachineHandle) -> RequestId {
        let request_id = self.next_request_id();
        self.queue
            .send(Command::DeleteStateMachine { handle, request_id });
        request_id
    }

    // --- view models -----------------------------------------------------

    /// Instantiates a named instance of a named view model.
    pub fn create_view_model(
        &mut self,
        file: FileHandle,
        view_model: impl Into<String>,
        instance: impl Into<String>,
    ) -> (ViewModelHandle, Reply<()>) {
        self.create_view_model_inner(
            file,
            Some(view_model.into()),
            ViewModelInstanceSpec::Named(instance.into()),
        )
    }

    /// Instantiates the default instance of a named view model.
    pub fn create_default_view_model(
        &mut self,
        file: FileHandle,
        view_model: impl Into<String>,
    ) -> (ViewModelHandle, Reply<()>) {
        self.create_view_model_inner(file, Some(view_model.into()), ViewModelInstanceSpec::Default)
    }

    /// Instantiates a blank instance of a named view model.
    pub fn create_blank_view_model(
        &mut self,
        file: FileHandle,
        view_model: impl Into<String>,
    ) -> (ViewModelHandle, Reply<()>) {
        self.create_view_model_inner(file, Some(view_model.into()), ViewModelInstanceSpec::Blank)
    }

    /// Instantiates the default instance of an artboard's default view
    /// model.
    pub fn create_default_view_model_for_artboard(
        &mut self,
        file: FileHandle,
        artboard: ArtboardHandle,
    ) -> (ViewModelHandle, Reply<()>) {
        self.create_view_model_inner(
            file,
            None,
            ViewModelInstanceSpec::DefaultForArtboard(artboard),
        )
    }

    fn create_view_model_inner(
        &mut self,
        file: FileHandle,
        view_model: Option<String>,
        instance: ViewModelInstanceSpec,
    ) -> (ViewModelHandle, Reply<()>) {
        let handle = ViewModelHandle(self.arena.allocate());
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::CreateViewModel {
            file,
            handle,
            view_model,
            instance,
            request_id,
            reply: reply_tx,
        });
        (handle, reply)
    }

    /// Enqueues destruction of a view-model instance.
    pub fn destroy_view_model(&mut self, handle: ViewModelHandle) -> RequestId {
        let request_id = self.next_request_id();
        self.queue
            .send(Command::DeleteViewModel { handle, request_id });
        request_id
    }

    // --- property setters (fire-and-forget) ------------------------------

    fn set_property(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: PropertyValue,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::SetProperty {
            view_model,
            name: name.into(),
            value,
            request_id,
        });
        request_id
    }

    /// Sets a string property.
    pub fn set_view_model_string(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> RequestId {
        self.set_property(view_model, name, PropertyValue::String(value.into()))
    }

    /// Sets a number property.
    pub fn set_view_model_number(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: f32,
    ) -> RequestId {
        self.set_property(view_model, name, PropertyValue::Number(value))
    }

    /// Sets a bool property.
    pub fn set_view_model_bool(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: bool,
    ) -> RequestId {
        self.set_property(view_model, name, PropertyValue::Bool(value))
    }

    /// Sets a color property.
    pub fn set_view_model_color(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: Color,
    ) -> RequestId {
        self.set_property(view_model, name, PropertyValue::Color(value))
    }

    /// Sets an enum property by variant name.
    pub fn set_view_model_enum(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> RequestId {
        self.set_property(view_model, name, PropertyValue::Enum(value.into()))
    }

    /// Fires a trigger property.
    pub fn set_view_model_trigger(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::FireTrigger {
            view_model,
            name: name.into(),
            request_id,
        });
        request_id
    }

    /// Binds a nested view-model property.
    pub fn set_view_model_view_model(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: ViewModelHandle,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::SetNestedViewModel {
            view_model,
            name: name.into(),
            value,
            request_id,
        });
        request_id
    }

    /// Binds an artboard property.
    pub fn set_view_model_artboard(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: ArtboardHandle,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::SetArtboardProperty {
            view_model,
            name: name.into(),
            value,
            request_id,
        });
        request_id
    }

    /// Binds an image property.
    pub fn set_view_model_image(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        value: RenderImageHandle,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::SetImageProperty {
            view_model,
            name: name.into(),
            value,
            request_id,
        });
        request_id
    }

    // --- list mutators ---------------------------------------------------

    /// Appends a nested view model to a list property.
    pub fn append_view_model_list(
        &mut self,
        view_model: ViewModelHandle,
        path: impl Into<String>,
        to_append: ViewModelHandle,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::AppendToList {
            view_model,
            path: path.into(),
            instance: to_append,
            request_id,
        });
        request_id
    }

    /// Inserts a nested view model into a list property.
    pub fn insert_view_model_list(
        &mut self,
        view_model: ViewModelHandle,
        path: impl Into<String>,
        to_insert: ViewModelHandle,
        index: usize,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::InsertInList {
            view_model,
            path: path.into(),
            instance: to_insert,
            index,
            request_id,
        });
        request_id
    }

    /// Removes an element from a list property.
    pub fn remove_view_model_list(
        &mut self,
        view_model: ViewModelHandle,
        path: impl Into<String>,
        index: usize,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::RemoveFromList {
            view_model,
            path: path.into(),
            index,
            request_id,
        });
        request_id
    }

    // --- getters and subscriptions ---------------------------------------

    /// Reads a property; the value arrives through the reply after the next
    /// drain.
    pub fn get_property_value(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Reply<PropertyValue> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::GetProperty {
            view_model,
            name: name.into(),
            data_type,
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Reads a list property's length.
    pub fn get_property_list_size(
        &mut self,
        view_model: ViewModelHandle,
        path: impl Into<String>,
    ) -> Reply<usize> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::GetListSize {
            view_model,
            path: path.into(),
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Subscribes to future changes of a property.
    pub fn subscribe_to_property(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Subscription {
        let request_id = self.next_request_id();
        let (sender, subscription) = subscription_channel(request_id);
        self.queue.send(Command::Subscribe {
            view_model,
            name: name.into(),
            data_type,
            request_id,
            sender,
        });
        subscription
    }

    /// Ends the subscription registered under `subscription_id`.
    pub fn unsubscribe_from_property(
        &mut self,
        view_model: ViewModelHandle,
        name: impl Into<String>,
        data_type: DataType,
        subscription_id: RequestId,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::Unsubscribe {
            view_model,
            name: name.into(),
            data_type,
            subscription_id,
            request_id,
        });
        request_id
    }

    // --- metadata queries ------------------------------------------------

    /// Lists a file's artboards.
    pub fn request_artboard_names(&mut self, file: FileHandle) -> Reply<Vec<String>> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::RequestArtboardNames {
            file,
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Lists an artboard's state machines.
    pub fn request_state_machine_names(
        &mut self,
        artboard: ArtboardHandle,
    ) -> Reply<Vec<String>> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::RequestStateMachineNames {
            artboard,
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Lists a file's view models.
    pub fn request_view_model_names(&mut self, file: FileHandle) -> Reply<Vec<String>> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::RequestViewModelNames {
            file,
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Lists the named instances of a view model.
    pub fn request_view_model_instance_names(
        &mut self,
        file: FileHandle,
        view_model: impl Into<String>,
    ) -> Reply<Vec<String>> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::RequestViewModelInstanceNames {
            file,
            view_model: view_model.into(),
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Lists a view model's property declarations.
    pub fn request_view_model_properties(
        &mut self,
        file: FileHandle,
        view_model: impl Into<String>,
    ) -> Reply<Vec<PropertyDefinition>> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::RequestViewModelProperties {
            file,
            view_model: view_model.into(),
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Lists a file's enum declarations.
    pub fn request_view_model_enums(&mut self, file: FileHandle) -> Reply<Vec<EnumDefinition>> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::RequestViewModelEnums {
            file,
            request_id,
            reply: reply_tx,
        });
        reply
    }

    /// Queries the view model an artboard binds by default.
    pub fn request_default_view_model_info(
        &mut self,
        artboard: ArtboardHandle,
        file: FileHandle,
    ) -> Reply<DefaultViewModelInfo> {
        let request_id = self.next_request_id();
        let (reply_tx, reply) = reply_channel(request_id);
        self.queue.send(Command::RequestDefaultViewModelInfo {
            artboard,
            file,
            request_id,
            reply: reply_tx,
        });
        reply
    }

    // --- state machine input ---------------------------------------------

    fn pointer(
        &mut self,
        state_machine: StateMachineHandle,
        action: PointerAction,
        event: PointerEvent,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::Pointer {
            state_machine,
            action,
            event,
            request_id,
        });
        request_id
    }

    /// Pointer moved over the machine's artboard.
    pub fn state_machine_mouse_move(
        &mut self,
        state_machine: StateMachineHandle,
        event: PointerEvent,
    ) -> RequestId {
        self.pointer(state_machine, PointerAction::Move, event)
    }

    /// Pointer pressed.
    pub fn state_machine_mouse_down(
        &mut self,
        state_machine: StateMachineHandle,
        event: PointerEvent,
    ) -> RequestId {
        self.pointer(state_machine, PointerAction::Down, event)
    }

    /// Pointer released.
    pub fn state_machine_mouse_up(
        &mut self,
        state_machine: StateMachineHandle,
        event: PointerEvent,
    ) -> RequestId {
        self.pointer(state_machine, PointerAction::Up, event)
    }

    /// Pointer left the artboard.
    pub fn state_machine_mouse_exit(
        &mut self,
        state_machine: StateMachineHandle,
        event: PointerEvent,
    ) -> RequestId {
        self.pointer(state_machine, PointerAction::Exit, event)
    }

    /// Advances a state machine by `elapsed_seconds` at the next drain. The
    /// visual response lags by at most one frame.
    pub fn advance_state_machine(
        &mut self,
        state_machine: StateMachineHandle,
        elapsed_seconds: f32,
    ) {
        self.queue.send(Command::AdvanceStateMachine {
            state_machine,
            elapsed_seconds,
        });
    }

    /// Binds a view-model instance to a state machine.
    pub fn state_machine_bind_view_model(
        &mut self,
        state_machine: StateMachineHandle,
        view_model: ViewModelHandle,
    ) -> RequestId {
        let request_id = self.next_request_id();
        self.queue.send(Command::BindViewModel {
            state_machine,
            view_model,
            request_id,
        });
        request_id
    }

    // --- images and render targets ---------------------------------------

    /// Registers an externally-owned device texture as a render image
    /// usable in image property bindings.
    pub fn register_external_image(
        &mut self,
        texture: TextureId,
    ) -> (RenderImageHandle, RequestId) {
        let handle = RenderImageHandle(self.arena.allocate());
        let request_id = self.next_request_id();
        self.queue.send(Command::RegisterExternalImage {
            handle,
            texture,
            request_id,
        });
        (handle, request_id)
    }

    /// Enqueues destruction of a render image registration.
    pub fn destroy_external_image(&mut self, handle: RenderImageHandle) -> RequestId {
        let request_id = self.next_request_id();
        self.queue
            .send(Command::DeleteExternalImage { handle, request_id });
        request_id
    }

    /// Allocates a render target of the given size on the consumer.
    pub fn create_render_target(&mut self, width: u32, height: u32) -> RenderTargetHandle {
        let handle = RenderTargetHandle(self.arena.allocate());
        let request_id = self.next_request_id();
        self.queue.send(Command::CreateRenderTarget {
            handle,
            width,
            height,
            request_id,
        });
        handle
    }

    /// Enqueues destruction of a render target.
    pub fn destroy_render_target(&mut self, handle: RenderTargetHandle) -> RequestId {
        let request_id = self.next_request_id();
        self.draw_keys.remove(&handle);
        self.queue
            .send(Command::DeleteRenderTarget { handle, request_id });
        request_id
    }

    // --- draws and callbacks ---------------------------------------------

    fn command_set(&mut self, target: RenderTargetHandle) -> &mut CommandSet {
        let queue = &self.queue;
        let key = *self
            .draw_keys
            .entry(target)
            .or_insert_with(|| queue.create_draw_key());
        let set = self.draw_commands.entry(target).or_default();
        if set.draw_key.is_none() {
            set.draw_key = Some(key);
        }
        set
    }

    /// Appends an artboard draw to `target`'s frame.
    pub fn draw_artboard(&mut self, target: RenderTargetHandle, command: DrawArtboardCommand) {
        self.command_set(target)
            .draws
            .push(DrawCommand::Artboard(command));
    }

    /// Appends a caller-supplied draw to `target`'s frame.
    pub fn draw(&mut self, target: RenderTargetHandle, callback: DirectDrawCallback) {
        self.command_set(target)
            .draws
            .push(DrawCommand::Direct(callback));
    }

    /// Batches a callback into the end-of-frame command list. More
    /// efficient than [`run_once_immediate`](Self::run_once_immediate) and
    /// preferred where ordering against immediate sends doesn't matter.
    pub fn run_once(&mut self, callback: ServerCallback) {
        self.commands.push(callback);
    }

    /// Sends a callback immediately. Use when ordering relative to other
    /// immediate sends matters (e.g. synchronous teardown).
    pub fn run_once_immediate(&mut self, callback: ServerCallback) {
        self.queue.send(Command::RunOnce(callback));
    }

    /// Flushes all batched callbacks and every render target's draw set to
    /// the queue. Call [`reset`](Self::reset) before building the next
    /// frame.
    pub fn execute(&mut self) {
        if !self.commands.is_empty() {
            let batch = std::mem::take(&mut self.commands);
            self.queue.send(Command::RunBatch(batch));
        }
        for (target, set) in self.draw_commands.drain() {
            let Some(draw_key) = set.draw_key else {
                continue;
            };
            if set.draws.is_empty() {
                continue;
            }
            self.queue.send(Command::Draw {
                target,
                draw_key,
                draws: set.draws,
            });
        }
    }

    /// Drains consumer acknowledgements: destroyed handles are recycled
    /// into the arena so their slots (with a fresh generation) become
    /// allocatable again. Call once per frame on the producer thread.
    pub fn process_replies(&mut self) {
        while let Ok(ack) = self.queue.acknowledgements().try_recv() {
            match ack {
                Acknowledgement::Destroyed(raw) => self.arena.recycle(raw),
            }
        }
    }

    /// The queue this builder feeds.
    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }
}

impl std::fmt::Debug for CommandBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("current_request_id", &self.current_request_id)
            .field("batched_callbacks", &self.commands.len())
            .field("batched_draw_sets", &self.draw_commands.len())
            .finish()
    }
}
