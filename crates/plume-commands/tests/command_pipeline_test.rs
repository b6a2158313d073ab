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

//! End-to-end tests of the producer/consumer command pipeline against the
//! scripted runtime and the recording headless device.

mod common;

use common::{valid_file_bytes, MockRuntime};
use plume_commands::{CommandBuilder, CommandError, CommandQueue, CommandServer, DrawArtboardCommand};
use plume_core::math::{Aabb, Alignment, Fit};
use plume_core::runtime::{DataType, PropertyValue};
use plume_renderer::{HeadlessDevice, RenderContext, RendererSettings};
use std::sync::{Arc, Mutex};

struct Pipeline {
    device: Arc<HeadlessDevice>,
    builder: CommandBuilder,
    server: CommandServer,
}

fn pipeline() -> Pipeline {
    let device = HeadlessDevice::new();
    let context = RenderContext::new(device.clone(), RendererSettings::default())
        .expect("context creation");
    let queue = CommandQueue::new();
    let builder = CommandBuilder::new(Arc::clone(&queue));
    let server = CommandServer::new(queue, Box::new(MockRuntime), context);
    Pipeline {
        device,
        builder,
        server,
    }
}

#[test]
fn commands_drain_in_fifo_order() {
    let mut p = pipeline();
    let observed = Arc::new(Mutex::new(Vec::new()));
    for i in 0..32 {
        let observed = Arc::clone(&observed);
        p.builder
            .run_once_immediate(Box::new(move |_server| observed.lock().unwrap().push(i)));
    }
    p.server.process_commands();
    assert_eq!(*observed.lock().unwrap(), (0..32).collect::<Vec<_>>());
}

#[test]
fn batched_callbacks_preserve_order_within_execute() {
    let mut p = pipeline();
    let observed = Arc::new(Mutex::new(Vec::new()));
    for i in 0..4 {
        let observed = Arc::clone(&observed);
        p.builder
            .run_once(Box::new(move |_server| observed.lock().unwrap().push(i)));
    }
    p.builder.execute();
    p.builder.reset();
    p.server.process_commands();
    assert_eq!(*observed.lock().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn load_draw_scenario_renders_and_reports_metadata_once() {
    let mut p = pipeline();

    let (file, metadata) = p.builder.load_file(valid_file_bytes());
    let (artboard, artboard_reply) = p.builder.create_default_artboard(file);
    let (_machine, machine_reply) = p.builder.create_default_state_machine(artboard);
    let target = p.builder.create_render_target(256, 128);
    p.builder.draw_artboard(
        target,
        DrawArtboardCommand {
            artboard,
            frame: Aabb::from_size(256.0, 128.0),
            alignment: Alignment::Center,
            fit: Fit::Contain,
            scale_factor: 1.0,
        },
    );
    p.builder.execute();
    p.builder.reset();

    // Nothing has resolved yet: allocation is eager, resolution is lazy.
    assert!(metadata.try_take().is_none());

    p.server.process_commands();

    let metadata = metadata.try_take().expect("reply after drain").unwrap();
    assert_eq!(metadata.artboard_names, vec!["Hero", "Menu"]);
    assert!(artboard_reply.try_take().unwrap().is_ok());
    assert!(machine_reply.try_take().unwrap().is_ok());

    // The artboard's draw produced real GPU work.
    assert!(p.device.draw_count() > 0, "frame must not be empty");
}

#[test]
fn reply_fires_exactly_once() {
    let mut p = pipeline();
    let (_file, metadata) = p.builder.load_file(valid_file_bytes());
    p.server.process_commands();
    assert!(metadata.try_take().is_some());
    // A single-shot channel yields the value once; afterwards it reads as
    // disconnected (the sender is consumed), never as a duplicate value.
    assert!(matches!(
        metadata.try_take(),
        None | Some(Err(CommandError::Disconnected))
    ));
}

#[test]
fn malformed_file_poisons_the_handle_chain() {
    let mut p = pipeline();
    let (file, metadata) = p.builder.load_file(b"garbage".to_vec());
    let (artboard, artboard_reply) = p.builder.create_default_artboard(file);
    let target = p.builder.create_render_target(64, 64);
    p.builder.draw_artboard(
        target,
        DrawArtboardCommand {
            artboard,
            frame: Aabb::from_size(64.0, 64.0),
            alignment: Alignment::Center,
            fit: Fit::Contain,
            scale_factor: 1.0,
        },
    );
    p.builder.execute();
    p.builder.reset();
    p.server.process_commands();

    assert!(matches!(
        metadata.try_take(),
        Some(Err(CommandError::DecodeFailed(_)))
    ));
    assert!(matches!(
        artboard_reply.try_take(),
        Some(Err(CommandError::InvalidHandle))
    ));
    // The draw was a no-op; no patch work reached the device.
    assert_eq!(p.device.draw_count(), 0);
}

#[test]
fn missing_artboard_name_reports_not_found() {
    let mut p = pipeline();
    let (file, _) = p.builder.load_file(valid_file_bytes());
    let (_artboard, reply) = p.builder.create_artboard(file, "DoesNotExist");
    p.server.process_commands();
    assert!(matches!(
        reply.try_take(),
        Some(Err(CommandError::NotFound { kind: "artboard", .. }))
    ));
}

#[test]
fn destroyed_handle_slot_is_recycled_only_after_drain() {
    let mut p = pipeline();
    let (file, _) = p.builder.load_file(valid_file_bytes());
    let (artboard, _) = p.builder.create_default_artboard(file);
    p.builder.destroy_artboard(artboard);

    // Before the delete drains, a new allocation must not reuse the slot.
    let (second, _) = p.builder.create_default_artboard(file);
    assert_ne!(artboard.raw().index, second.raw().index);

    p.server.process_commands();
    p.builder.process_replies();

    // After drain + acknowledgement the slot returns with a new generation.
    let (third, _) = p.builder.create_default_artboard(file);
    assert_eq!(third.raw().index, artboard.raw().index);
    assert_ne!(third.raw().generation, artboard.raw().generation);
}

#[test]
fn read_after_write_within_one_drain() {
    let mut p = pipeline();
    let (file, _) = p.builder.load_file(valid_file_bytes());
    let (vm, _) = p.builder.create_default_view_model(file, "Dashboard");
    p.builder.set_view_model_number(vm, "speed", 2.0);
    let read = p
        .builder
        .get_property_value(vm, "speed", DataType::Number);
    p.server.process_commands();
    assert_eq!(read.try_take(), Some(Ok(PropertyValue::Number(2.0))));
}

#[test]
fn request_ids_strictly_increase() {
    let mut p = pipeline();
    let (file, _) = p.builder.load_file(valid_file_bytes());
    let (vm, _) = p.builder.create_default_view_model(file, "Dashboard");
    let a = p.builder.set_view_model_number(vm, "speed", 1.0);
    let b = p.builder.set_view_model_bool(vm, "missing", true);
    let c = p.builder.destroy_view_model(vm);
    assert!(a < b && b < c);
}

#[test]
fn subscriptions_stream_updates_until_unsubscribed() {
    let mut p = pipeline();
    let (file, _) = p.builder.load_file(valid_file_bytes());
    let (vm, _) = p.builder.create_default_view_model(file, "Dashboard");
    let subscription = p.builder.subscribe_to_property(vm, "speed", DataType::Number);
    p.builder.set_view_model_number(vm, "speed", 1.5);
    p.server.process_commands();

    let update = subscription.try_next().expect("update after drain");
    assert_eq!(update.name, "speed");
    assert_eq!(update.value, PropertyValue::Number(1.5));

    p.builder
        .unsubscribe_from_property(vm, "speed", DataType::Number, subscription.request_id());
    p.builder.set_view_model_number(vm, "speed", 9.0);
    p.server.process_commands();
    assert!(subscription.try_next().is_none());
}

#[test]
fn state_machine_advance_feeds_bound_view_model() {
    let mut p = pipeline();
    let (file, _) = p.builder.load_file(valid_file_bytes());
    let (artboard, _) = p.builder.create_default_artboard(file);
    let (machine, _) = p.builder.create_default_state_machine(artboard);
    let (vm, _) = p.builder.create_default_view_model(file, "Dashboard");
    let subscription = p.builder.subscribe_to_property(vm, "elapsed", DataType::Number);

    p.builder.state_machine_bind_view_model(machine, vm);
    p.builder.advance_state_machine(machine, 0.25);
    p.server.process_commands();

    let update = subscription.try_next().expect("advance-driven update");
    assert_eq!(update.value, PropertyValue::Number(0.25));
}

#[test]
fn list_mutations_apply_in_order() {
    let mut p = pipeline();
    let (file, _) = p.builder.load_file(valid_file_bytes());
    let (vm, _) = p.builder.create_default_view_model(file, "Dashboard");
    let (element_a, _) = p.builder.create_blank_view_model(file, "Dashboard");
    let (element_b, _) = p.builder.create_blank_view_model(file, "Dashboard");

    p.builder.append_view_model_list(vm, "items", element_a);
    p.builder.insert_view_model_list(vm, "items", element_b, 0);
    p.builder.remove_view_model_list(vm, "items", 1);
    let size = p.builder.get_property_list_size(vm, "items");
    p.server.process_commands();

    assert_eq!(size.try_take(), Some(Ok(1)));
}

#[test]
fn disconnect_stops_the_drain_loop() {
    let mut p = pipeline();
    assert!(p.server.process_commands());
    p.builder.queue().disconnect();
    assert!(!p.server.process_commands());
}
