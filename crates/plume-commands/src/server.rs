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

//! The consumer-side command server.
//!
//! Constructed on the render thread and never leaves it. Each
//! [`process_commands`](CommandServer::process_commands) call drains the
//! queue in FIFO order, applying every command to the live runtime objects
//! in its registries. A command referencing a handle that failed to
//! construct is a logged no-op, never fatal: the poisoned slot keeps
//! swallowing commands until a fresh handle replaces it.

use crate::command::{
    Command, DrawArtboardCommand, DrawCommand, PointerAction, RequestId, ViewModelInstanceSpec,
};
use crate::queue::{Acknowledgement, CommandQueue};
use crate::reply::{CommandError, ReplySender};
use plume_core::gpu::TextureId;
use plume_core::handle::RawHandle;
use plume_core::math::{compute_alignment, Color};
use plume_core::runtime::{
    DataType, DrawSink, FileResource, PropertyUpdate, SharedArtboard, SharedStateMachine,
    SharedViewModel, VectorRuntime,
};
use plume_renderer::{FrameRecorder, LoadAction, RenderContext, RenderTarget};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// A registry slot: either a live object or the poisoned remains of a
/// failed construction.
enum Slot<T> {
    Live(T),
    Failed,
}

impl<T: Clone> Slot<T> {
    fn live(&self) -> Result<T, CommandError> {
        match self {
            Slot::Live(value) => Ok(value.clone()),
            Slot::Failed => Err(CommandError::InvalidHandle),
        }
    }
}

struct SubscriptionEntry {
    id: RequestId,
    data_type: DataType,
    sender: flume::Sender<PropertyUpdate>,
}

/// Drains the queue once per render tick and owns every consumer-side
/// object: decoded files, artboards, state machines, view models, external
/// images and render targets.
pub struct CommandServer {
    queue: Arc<CommandQueue>,
    runtime: Box<dyn VectorRuntime>,
    context: RenderContext,
    files: HashMap<RawHandle, Slot<Rc<dyn FileResource>>>,
    artboards: HashMap<RawHandle, Slot<SharedArtboard>>,
    state_machines: HashMap<RawHandle, Slot<SharedStateMachine>>,
    view_models: HashMap<RawHandle, Slot<SharedViewModel>>,
    images: HashMap<RawHandle, TextureId>,
    targets: HashMap<RawHandle, RenderTarget>,
    subscriptions: HashMap<(RawHandle, String), Vec<SubscriptionEntry>>,
}

impl CommandServer {
    /// Creates a server over `queue`, driving `runtime` and rendering
    /// through `context`. Call this on the thread that will drain it.
    pub fn new(
        queue: Arc<CommandQueue>,
        runtime: Box<dyn VectorRuntime>,
        context: RenderContext,
    ) -> Self {
        Self {
            queue,
            runtime,
            context,
            files: HashMap::new(),
            artboards: HashMap::new(),
            state_machines: HashMap::new(),
            view_models: HashMap::new(),
            images: HashMap::new(),
            targets: HashMap::new(),
            subscriptions: HashMap::new(),
        }
    }

    /// The render context this server draws through.
    pub fn render_context(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    /// The color texture of a render target, for hosts that present it.
    pub fn target_texture(&self, handle: plume_core::RenderTargetHandle) -> Option<TextureId> {
        self.targets.get(&handle.raw()).map(|t| t.texture())
    }

    /// Drains every queued command in FIFO order, then routes property
    /// changes to subscribers. Returns `false` once the queue is
    /// disconnected and fully drained, signalling the host to stop its
    /// drain loop.
    pub fn process_commands(&mut self) -> bool {
        let receiver = self.queue.commands().clone();
        let mut processed = 0usize;
        while let Ok(command) = receiver.try_recv() {
            self.execute(command);
            processed += 1;
        }
        if processed > 0 {
            log::trace!("CommandServer: processed {processed} commands");
        }
        self.dispatch_subscriptions();
        !self.queue.is_disconnected()
    }

    fn live_file(&self, handle: RawHandle) -> Result<Rc<dyn FileResource>, CommandError> {
        self.files
            .get(&handle)
            .ok_or(CommandError::InvalidHandle)
            .and_then(Slot::live)
    }

    fn live_artboard(&self, handle: RawHandle) -> Result<SharedArtboard, CommandError> {
        self.artboards
            .get(&handle)
            .ok_or(CommandError::InvalidHandle)
            .and_then(Slot::live)
    }

    fn live_state_machine(&self, handle: RawHandle) -> Result<SharedStateMachine, CommandError> {
        self.state_machines
            .get(&handle)
            .ok_or(CommandError::InvalidHandle)
            .and_then(Slot::live)
    }

    fn live_view_model(&self, handle: RawHandle) -> Result<SharedViewModel, CommandError> {
        self.view_models
            .get(&handle)
            .ok_or(CommandError::InvalidHandle)
            .and_then(Slot::live)
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::LoadFile {
                handle,
                bytes,
                request_id,
                reply,
            } => match self.runtime.decode_file(&bytes) {
                Ok(file) => {
                    let file: Rc<dyn FileResource> = file.into();
                    let metadata = plume_core::runtime::FileMetadata {
                        artboard_names: file.artboard_names(),
                        view_model_names: file.view_model_names(),
                    };
                    self.files.insert(handle.raw(), Slot::Live(file));
                    send_reply(reply, request_id, Ok(metadata));
                }
                Err(e) => {
                    log::error!("LoadFile({request_id:?}): decode failed: {e}");
                    self.files.insert(handle.raw(), Slot::Failed);
                    send_reply(reply, request_id, Err(CommandError::DecodeFailed(e.to_string())));
                }
            },
            Command::DeleteFile { handle, request_id } => {
                if self.files.remove(&handle.raw()).is_none() {
                    log::warn!("DeleteFile({request_id:?}): unknown handle {:?}", handle.raw());
                }
                self.queue.acknowledge(Acknowledgement::Destroyed(handle.raw()));
            }
            Command::CreateArtboard {
                file,
                handle,
                name,
                request_id,
                reply,
            } => {
                let result = self.live_file(file.raw()).and_then(|file| {
                    let artboard = match &name {
                        Some(name) => file.instantiate_artboard(name),
                        None => file.instantiate_default_artboard(),
                    };
                    artboard.ok_or_else(|| CommandError::NotFound {
                        kind: "artboard",
                        name: name.clone().unwrap_or_else(|| "<default>".into()),
                    })
                });
                match result {
                    Ok(artboard) => {
                        self.artboards.insert(handle.raw(), Slot::Live(artboard));
                        send_reply(reply, request_id, Ok(()));
                    }
                    Err(e) => {
                        log::error!("CreateArtboard({request_id:?}): {e}");
                        self.artboards.insert(handle.raw(), Slot::Failed);
                        send_reply(reply, request_id, Err(e));
                    }
                }
            }
            Command::DeleteArtboard { handle, request_id } => {
                if self.artboards.remove(&handle.raw()).is_none() {
                    log::warn!(
                        "DeleteArtboard({request_id:?}): unknown handle {:?}",
                        handle.raw()
                    );
                }
                self.queue.acknowledge(Acknowledgement::Destroyed(handle.raw()));
            }
            Command::CreateStateMachine {
                artboard,
                handle,
                name,
                request_id,
                reply,
            } => {
                let result = self.live_artboard(artboard.raw()).and_then(|artboard| {
                    let artboard = artboard.borrow();
                    let machine = match &name {
                        Some(name) => artboard.instantiate_state_machine(name),
                        None => artboard.instantiate_default_state_machine(),
                    };
                    machine.ok_or_else(|| CommandError::NotFound {
                        kind: "state machine",
                        name: name.clone().unwrap_or_else(|| "<default>".into()),
                    })
                });
                match result {
                    Ok(machine) => {
                        self.state_machines.insert(handle.raw(), Slot::Live(machine));
                        send_reply(reply, request_id, Ok(()));
                    }
                    Err(e) => {
                        log::error!("CreateStateMachine({request_id:?}): {e}");
                        self.state_machines.insert(handle.raw(), Slot::Failed);
                        send_reply(reply, request_id, Err(e));
                    }
                }
            }
            Command::DeleteStateMachine { handle, request_id } => {
                if self.state_machines.remove(&handle.raw()).is_none() {
                    log::warn!(
                        "DeleteStateMachine({request_id:?}): unknown handle {:?}",
                        handle.raw()
                    );
                }
                self.queue.acknowledge(Acknowledgement::Destroyed(handle.raw()));
            }
            Command::CreateViewModel {
                file,
                handle,
                view_model,
                instance,
                request_id,
                reply,
            } => {
                let result = self.create_view_model(file.raw(), view_model, instance);
                match result {
                    Ok(vm) => {
                        self.view_models.insert(handle.raw(), Slot::Live(vm));
                        send_reply(reply, request_id, Ok(()));
                    }
                    Err(e) => {
                        log::error!("CreateViewModel({request_id:?}): {e}");
                        self.view_models.insert(handle.raw(), Slot::Failed);
                        send_reply(reply, request_id, Err(e));
                    }
                }
            }
            Command::DeleteViewModel { handle, request_id } => {
                if self.view_models.remove(&handle.raw()).is_none() {
                    log::warn!(
                        "DeleteViewModel({request_id:?}): unknown handle {:?}",
                        handle.raw()
                    );
                }
                self.subscriptions
                    .retain(|(vm, _), _| *vm != handle.raw());
                self.queue.acknowledge(Acknowledgement::Destroyed(handle.raw()));
            }
            Command::SetProperty {
                view_model,
                name,
                value,
                request_id,
            } => match self.live_view_model(view_model.raw()) {
                Ok(vm) => {
                    if !vm.borrow_mut().set_property(&name, value) {
                        log::warn!("SetProperty({request_id:?}): no settable property '{name}'");
                    }
                }
                Err(e) => log::error!("SetProperty({request_id:?}): {e}"),
            },
            Command::FireTrigger {
                view_model,
                name,
                request_id,
            } => match self.live_view_model(view_model.raw()) {
                Ok(vm) => {
                    if !vm.borrow_mut().fire_trigger(&name) {
                        log::warn!("FireTrigger({request_id:?}): no trigger '{name}'");
                    }
                }
                Err(e) => log::error!("FireTrigger({request_id:?}): {e}"),
            },
            Command::SetNestedViewModel {
                view_model,
                name,
                value,
                request_id,
            } => {
                let result = self
                    .live_view_model(view_model.raw())
                    .and_then(|vm| Ok((vm, self.live_view_model(value.raw())?)));
                match result {
                    Ok((vm, nested)) => {
                        if !vm.borrow_mut().set_nested_view_model(&name, nested) {
                            log::warn!(
                                "SetNestedViewModel({request_id:?}): no view model property '{name}'"
                            );
                        }
                    }
                    Err(e) => log::error!("SetNestedViewModel({request_id:?}): {e}"),
                }
            }
            Command::SetArtboardProperty {
                view_model,
                name,
                value,
                request_id,
            } => {
                let result = self
                    .live_view_model(view_model.raw())
                    .and_then(|vm| Ok((vm, self.live_artboard(value.raw())?)));
                match result {
                    Ok((vm, artboard)) => {
                        if !vm.borrow_mut().set_artboard(&name, artboard) {
                            log::warn!(
                                "SetArtboardProperty({request_id:?}): no artboard property '{name}'"
                            );
                        }
                    }
                    Err(e) => log::error!("SetArtboardProperty({request_id:?}): {e}"),
                }
            }
            Command::SetImageProperty {
                view_model,
                name,
                value,
                request_id,
            } => {
                if !self.images.contains_key(&value.raw()) {
                    log::error!("SetImageProperty({request_id:?}): unknown image handle");
                    return;
                }
                match self.live_view_model(view_model.raw()) {
                    Ok(vm) => {
                        if !vm.borrow_mut().set_image(&name, value.raw().to_bits()) {
                            log::warn!(
                                "SetImageProperty({request_id:?}): no image property '{name}'"
                            );
                        }
                    }
                    Err(e) => log::error!("SetImageProperty({request_id:?}): {e}"),
                }
            }
            Command::AppendToList {
                view_model,
                path,
                instance,
                request_id,
            } => {
                let result = self
                    .live_view_model(view_model.raw())
                    .and_then(|vm| Ok((vm, self.live_view_model(instance.raw())?)));
                match result {
                    Ok((vm, element)) => {
                        if !vm.borrow_mut().append_to_list(&path, element) {
                            log::warn!("AppendToList({request_id:?}): no list '{path}'");
                        }
                    }
                    Err(e) => log::error!("AppendToList({request_id:?}): {e}"),
                }
            }
            Command::InsertInList {
                view_model,
                path,
                instance,
                index,
                request_id,
            } => {
                let result = self
                    .live_view_model(view_model.raw())
                    .and_then(|vm| Ok((vm, self.live_view_model(instance.raw())?)));
                match result {
                    Ok((vm, element)) => {
                        if !vm.borrow_mut().insert_in_list(&path, element, index) {
                            log::warn!("InsertInList({request_id:?}): no list '{path}' at {index}");
                        }
                    }
                    Err(e) => log::error!("InsertInList({request_id:?}): {e}"),
                }
            }
            Command::RemoveFromList {
                view_model,
                path,
                index,
                request_id,
            } => match self.live_view_model(view_model.raw()) {
                Ok(vm) => {
                    if !vm.borrow_mut().remove_from_list(&path, index) {
                        log::warn!("RemoveFromList({request_id:?}): no list '{path}' at {index}");
                    }
                }
                Err(e) => log::error!("RemoveFromList({request_id:?}): {e}"),
            },
            Command::GetProperty {
                view_model,
                name,
                data_type,
                request_id,
                reply,
            } => {
                let result = self.live_view_model(view_model.raw()).and_then(|vm| {
                    vm.borrow()
                        .get_property(&name, data_type)
                        .ok_or(CommandError::NotFound {
                            kind: "property",
                            name: name.clone(),
                        })
                });
                send_reply(reply, request_id, result);
            }
            Command::GetListSize {
                view_model,
                path,
                request_id,
                reply,
            } => {
                let result = self.live_view_model(view_model.raw()).and_then(|vm| {
                    vm.borrow().list_size(&path).ok_or(CommandError::NotFound {
                        kind: "list",
                        name: path.clone(),
                    })
                });
                send_reply(reply, request_id, result);
            }
            Command::Subscribe {
                view_model,
                name,
                data_type,
                request_id,
                sender,
            } => {
                if let Err(e) = self.live_view_model(view_model.raw()) {
                    // Dropping the sender ends the subscription stream; the
                    // producer observes a closed channel.
                    log::error!("Subscribe({request_id:?}): {e}");
                    return;
                }
                self.subscriptions
                    .entry((view_model.raw(), name))
                    .or_default()
                    .push(SubscriptionEntry {
                        id: request_id,
                        data_type,
                        sender,
                    });
            }
            Command::Unsubscribe {
                view_model,
                name,
                data_type,
                subscription_id,
                request_id: _,
            } => {
                if let Some(entries) = self.subscriptions.get_mut(&(view_model.raw(), name)) {
                    entries.retain(|e| e.id != subscription_id || e.data_type != data_type);
                }
            }
            Command::RequestArtboardNames {
                file,
                request_id,
                reply,
            } => {
                let result = self.live_file(file.raw()).map(|f| f.artboard_names());
                send_reply(reply, request_id, result);
            }
            Command::RequestStateMachineNames {
                artboard,
                request_id,
                reply,
            } => {
                let result = self
                    .live_artboard(artboard.raw())
                    .map(|a| a.borrow().state_machine_names());
                send_reply(reply, request_id, result);
            }
            Command::RequestViewModelNames {
                file,
                request_id,
                reply,
            } => {
                let result = self.live_file(file.raw()).map(|f| f.view_model_names());
                send_reply(reply, request_id, result);
            }
            Command::RequestViewModelInstanceNames {
                file,
                view_model,
                request_id,
                reply,
            } => {
                let result = self.live_file(file.raw()).and_then(|f| {
                    f.view_model_instance_names(&view_model)
                        .ok_or(CommandError::NotFound {
                            kind: "view model",
                            name: view_model.clone(),
                        })
                });
                send_reply(reply, request_id, result);
            }
            Command::RequestViewModelProperties {
                file,
                view_model,
                request_id,
                reply,
            } => {
                let result = self.live_file(file.raw()).and_then(|f| {
                    f.view_model_properties(&view_model)
                        .ok_or(CommandError::NotFound {
                            kind: "view model",
                            name: view_model.clone(),
                        })
                });
                send_reply(reply, request_id, result);
            }
            Command::RequestViewModelEnums {
                file,
                request_id,
                reply,
            } => {
                let result = self.live_file(file.raw()).map(|f| f.enums());
                send_reply(reply, request_id, result);
            }
            Command::RequestDefaultViewModelInfo {
                artboard,
                file: _,
                request_id,
                reply,
            } => {
                let result = self.live_artboard(artboard.raw()).and_then(|a| {
                    a.borrow()
                        .default_view_model_info()
                        .ok_or(CommandError::NotFound {
                            kind: "default view model",
                            name: "<artboard>".into(),
                        })
                });
                send_reply(reply, request_id, result);
            }
            Command::Pointer {
                state_machine,
                action,
                event,
                request_id,
            } => match self.live_state_machine(state_machine.raw()) {
                Ok(machine) => {
                    let mut machine = machine.borrow_mut();
                    match action {
                        PointerAction::Move => machine.pointer_move(&event),
                        PointerAction::Down => machine.pointer_down(&event),
                        PointerAction::Up => machine.pointer_up(&event),
                        PointerAction::Exit => machine.pointer_exit(&event),
                    }
                }
                Err(e) => log::error!("Pointer({request_id:?}): {e}"),
            },
            Command::AdvanceStateMachine {
                state_machine,
                elapsed_seconds,
            } => match self.live_state_machine(state_machine.raw()) {
                Ok(machine) => machine.borrow_mut().advance(elapsed_seconds),
                Err(e) => log::debug!("AdvanceStateMachine: {e}"),
            },
            Command::BindViewModel {
                state_machine,
                view_model,
                request_id,
            } => {
                let result = self
                    .live_state_machine(state_machine.raw())
                    .and_then(|sm| Ok((sm, self.live_view_model(view_model.raw())?)));
                match result {
                    Ok((machine, vm)) => machine.borrow_mut().bind_view_model(vm),
                    Err(e) => log::error!("BindViewModel({request_id:?}): {e}"),
                }
            }
            Command::RegisterExternalImage {
                handle,
                texture,
                request_id: _,
            } => {
                self.images.insert(handle.raw(), texture);
            }
            Command::DeleteExternalImage { handle, request_id } => {
                if self.images.remove(&handle.raw()).is_none() {
                    log::warn!(
                        "DeleteExternalImage({request_id:?}): unknown handle {:?}",
                        handle.raw()
                    );
                }
                self.queue.acknowledge(Acknowledgement::Destroyed(handle.raw()));
            }
            Command::CreateRenderTarget {
                handle,
                width,
                height,
                request_id,
            } => match self.context.create_render_target(width, height) {
                Ok(target) => {
                    self.targets.insert(handle.raw(), target);
                }
                Err(e) => log::error!("CreateRenderTarget({request_id:?}): {e}"),
            },
            Command::DeleteRenderTarget { handle, request_id } => {
                match self.targets.remove(&handle.raw()) {
                    Some(target) => target.destroy(self.context.device().as_ref()),
                    None => log::warn!(
                        "DeleteRenderTarget({request_id:?}): unknown handle {:?}",
                        handle.raw()
                    ),
                }
                self.queue.acknowledge(Acknowledgement::Destroyed(handle.raw()));
            }
            Command::Draw {
                target,
                draw_key,
                draws,
            } => {
                let Self {
                    context,
                    targets,
                    artboards,
                    ..
                } = self;
                let Some(render_target) = targets.get_mut(&target.raw()) else {
                    log::error!("Draw: unknown render target {:?}", target.raw());
                    return;
                };
                let mut recorder =
                    match context.begin_frame(render_target, LoadAction::Clear, Color::TRANSPARENT)
                    {
                        Ok(recorder) => recorder,
                        Err(e) => {
                            log::error!("Draw: begin_frame failed: {e}");
                            return;
                        }
                    };
                for draw in draws {
                    match draw {
                        DrawCommand::Artboard(command) => {
                            draw_artboard(&mut recorder, artboards, &command);
                        }
                        DrawCommand::Direct(callback) => {
                            callback(draw_key, &mut recorder);
                        }
                    }
                }
                if let Err(e) = recorder.end_frame() {
                    log::error!("Draw: flush failed: {e}");
                }
            }
            Command::RunOnce(callback) => callback(self),
            Command::RunBatch(callbacks) => {
                for callback in callbacks {
                    callback(self);
                }
            }
        }
    }

    fn create_view_model(
        &mut self,
        file: RawHandle,
        view_model: Option<String>,
        instance: ViewModelInstanceSpec,
    ) -> Result<SharedViewModel, CommandError> {
        let file = self.live_file(file)?;
        match instance {
            ViewModelInstanceSpec::DefaultForArtboard(artboard) => {
                let artboard = self.live_artboard(artboard.raw())?;
                let info = artboard.borrow().default_view_model_info().ok_or(
                    CommandError::NotFound {
                        kind: "default view model",
                        name: "<artboard>".into(),
                    },
                )?;
                let vm = match &info.instance_name {
                    Some(name) => {
                        file.instantiate_view_model_instance(&info.view_model_name, name)
                    }
                    None => file.instantiate_default_view_model_instance(&info.view_model_name),
                };
                vm.ok_or(CommandError::NotFound {
                    kind: "view model",
                    name: info.view_model_name,
                })
            }
            spec => {
                let name = view_model.ok_or(CommandError::NotFound {
                    kind: "view model",
                    name: "<unnamed>".into(),
                })?;
                let vm = match &spec {
                    ViewModelInstanceSpec::Named(instance) => {
                        file.instantiate_view_model_instance(&name, instance)
                    }
                    ViewModelInstanceSpec::Default => {
                        file.instantiate_default_view_model_instance(&name)
                    }
                    ViewModelInstanceSpec::Blank => {
                        file.instantiate_blank_view_model_instance(&name)
                    }
                    ViewModelInstanceSpec::DefaultForArtboard(_) => unreachable!(),
                };
                vm.ok_or(CommandError::NotFound {
                    kind: "view model",
                    name,
                })
            }
        }
    }

    /// Routes changes drained from view models to their subscribers and
    /// prunes dead subscription channels.
    fn dispatch_subscriptions(&mut self) {
        self.subscriptions.retain(|_, entries| {
            entries.retain(|e| !e.sender.is_disconnected());
            !entries.is_empty()
        });

        let mut changes: Vec<(RawHandle, PropertyUpdate)> = Vec::new();
        for (raw, slot) in &self.view_models {
            if let Slot::Live(vm) = slot {
                for update in vm.borrow_mut().drain_changes() {
                    changes.push((*raw, update));
                }
            }
        }
        for (raw, update) in changes {
            let Some(entries) = self.subscriptions.get(&(raw, update.name.clone())) else {
                continue;
            };
            for entry in entries {
                if entry.data_type == update.value.data_type() {
                    let _ = entry.sender.send(update.clone());
                }
            }
        }
    }
}

impl std::fmt::Debug for CommandServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandServer")
            .field("files", &self.files.len())
            .field("artboards", &self.artboards.len())
            .field("state_machines", &self.state_machines.len())
            .field("view_models", &self.view_models.len())
            .field("targets", &self.targets.len())
            .finish()
    }
}

fn send_reply<T>(reply: ReplySender<T>, request_id: RequestId, result: Result<T, CommandError>) {
    if reply.send(result).is_err() {
        log::trace!("reply for {request_id:?} dropped by the producer");
    }
}

fn draw_artboard(
    recorder: &mut FrameRecorder,
    artboards: &HashMap<RawHandle, Slot<SharedArtboard>>,
    command: &DrawArtboardCommand,
) {
    let artboard = match artboards.get(&command.artboard.raw()) {
        Some(Slot::Live(artboard)) => artboard,
        Some(Slot::Failed) => {
            log::error!("DrawArtboard: artboard {:?} never resolved", command.artboard);
            return;
        }
        None => {
            log::error!("DrawArtboard: unknown artboard {:?}", command.artboard);
            return;
        }
    };
    let artboard = artboard.borrow();
    let align = compute_alignment(
        command.fit,
        command.alignment,
        &command.frame,
        &artboard.bounds(),
        command.scale_factor,
    );
    recorder.save();
    recorder.transform(&align);
    artboard.draw(recorder);
    recorder.restore();
}
