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

//! Headless end-to-end demo.
//!
//! Spins up the full pipeline — producer thread with a [`CommandBuilder`],
//! consumer thread draining a [`CommandServer`] into the recording headless
//! device — runs a short animation, then prints what reached the "GPU".
//!
//! ```text
//! cargo run -p plume-headless-demo [-- settings.json]
//! ```

mod runtime;

use anyhow::{Context as _, Result};
use plume_commands::{CommandBuilder, CommandQueue, CommandServer, DrawArtboardCommand};
use plume_core::math::{Aabb, Alignment, Fit};
use plume_renderer::{HeadlessDevice, RenderContext, RendererSettings};
use runtime::{file_bytes, PulseRuntime};
use std::time::Duration;

const FRAMES: u32 = 60;
const FRAME_DT: f32 = 1.0 / 60.0;

fn load_settings() -> Result<RendererSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings from {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(RendererSettings::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let settings = load_settings()?;
    log::debug!("renderer settings: {settings:?}");

    let device = HeadlessDevice::new();
    let context = RenderContext::new(device.clone(), settings)?;
    let queue = CommandQueue::new();

    // The consumer: drains the queue once per tick until disconnect.
    let server_queue = queue.clone();
    let render_thread = std::thread::Builder::new()
        .name("plume-render".into())
        .spawn(move || {
            let mut server = CommandServer::new(server_queue, Box::new(PulseRuntime), context);
            loop {
                if !server.process_commands() {
                    break;
                }
                std::thread::sleep(Duration::from_micros(200));
            }
            server.render_context().stats()
        })?;

    // The producer: the "game thread".
    let mut builder = CommandBuilder::new(queue.clone());
    let (file, metadata) = builder.load_file(file_bytes());
    let (artboard, _) = builder.create_default_artboard(file);
    let (machine, _) = builder.create_default_state_machine(artboard);
    let (controls, _) = builder.create_default_view_model(file, "Controls");
    builder.state_machine_bind_view_model(machine, controls);
    let target = builder.create_render_target(512, 512);

    for frame in 0..FRAMES {
        builder.advance_state_machine(machine, FRAME_DT);
        builder.set_view_model_number(controls, "speed", (frame as f32 * FRAME_DT).sin());
        builder.draw_artboard(
            target,
            DrawArtboardCommand {
                artboard,
                frame: Aabb::from_size(512.0, 512.0),
                alignment: Alignment::Center,
                fit: Fit::Contain,
                scale_factor: 1.0,
            },
        );
        builder.execute();
        builder.reset();
        builder.process_replies();
        std::thread::sleep(Duration::from_micros(500));
    }

    let metadata = metadata
        .wait_timeout(Duration::from_secs(2))
        .context("file never resolved")?
        .map_err(|e| anyhow::anyhow!("file load failed: {e}"))?;

    queue.disconnect();
    let stats = render_thread
        .join()
        .map_err(|_| anyhow::anyhow!("render thread panicked"))?;

    println!("artboards:   {:?}", metadata.artboard_names);
    println!("view models: {:?}", metadata.view_model_names);
    println!("flushes:     {}", stats.flush_count);
    println!("passes:      {}", stats.pass_count);
    println!("draw calls:  {}", device.draw_count());
    Ok(())
}
