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

//! Opens a window and runs the engine over a data directory.
//!
//! Usage: `ember-runtime [DATA_DIR]` (default `data`).

use anyhow::Result;
use ember_infra::{EventSink, HeadlessRenderer, WinitPlatform, WinitWindow, WinitWindowBuilder};
use ember_sdk::{Engine, EngineBuilder};
use std::path::PathBuf;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

struct Runtime {
    data_dir: PathBuf,
    window: Option<WinitWindow>,
    sink: Option<EventSink>,
    engine: Option<Engine>,
}

impl Runtime {
    fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            window: None,
            sink: None,
            engine: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = WinitWindowBuilder::new()
            .with_title("Ember")
            .build(event_loop)
            .map_err(|e| anyhow::anyhow!("Failed to create window: {e}"))?;
        let (width, height) = window.inner_size();

        let platform = WinitPlatform::new(window.clone());
        self.sink = Some(platform.event_sink());
        self.window = Some(window);

        let mut engine = EngineBuilder::new(&self.data_dir)
            .with_platform(platform)
            .with_renderer(HeadlessRenderer::new(width, height))
            .build()?;
        let init = engine.init();
        // Keep the engine even on failure so shutdown still runs once.
        self.engine = Some(engine);
        init?;
        Ok(())
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut engine) = self.engine.take() {
            engine.shutdown();
        }
        self.sink = None;
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for Runtime {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        log::info!("Application resumed. Starting engine...");
        if let Err(e) = self.start(event_loop) {
            log::error!("Engine failed to start: {e:#}");
            self.stop(event_loop);
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(id) {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.push(&event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.update();
        if !engine.is_running() {
            log::info!("Engine stopped, exiting event loop...");
            self.stop(event_loop);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    log::info!("Ember runtime starting with data directory '{}'.", data_dir.display());

    let event_loop = EventLoop::new()?;
    let mut runtime = Runtime::new(data_dir);
    event_loop.run_app(&mut runtime)?;
    Ok(())
}
