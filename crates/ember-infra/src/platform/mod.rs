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

//! The `winit` platform adapter.

mod input;
mod window;

pub use input::{map_keycode_to_string, map_mouse_button, InputTranslator};
pub use window::{WinitWindow, WinitWindowBuilder};

use ember_core::platform::{Platform, PlatformEvent};
use winit::event::WindowEvent;

/// A [`Platform`] fed by the `winit` event loop.
///
/// The event loop owns an [`EventSink`] and pushes translated window events
/// into it; the engine drains them with [`Platform::poll_event`] once per
/// fixed tick.
pub struct WinitPlatform {
    window: Option<WinitWindow>,
    sender: flume::Sender<PlatformEvent>,
    receiver: flume::Receiver<PlatformEvent>,
    running: bool,
}

impl WinitPlatform {
    /// Creates a platform around an already created window.
    pub fn new(window: WinitWindow) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            window: Some(window),
            sender,
            receiver,
            running: false,
        }
    }

    /// Creates the sink the event loop pushes window events into.
    pub fn event_sink(&self) -> EventSink {
        EventSink {
            translator: InputTranslator::new(),
            sender: self.sender.clone(),
        }
    }

    /// The window, until shutdown.
    pub fn window(&self) -> Option<&WinitWindow> {
        self.window.as_ref()
    }
}

impl Platform for WinitPlatform {
    fn init(&mut self) -> anyhow::Result<()> {
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Platform was already shut down"))?;
        let (width, height) = window.inner_size();
        log::info!("Platform initialized ({width}x{height}).");
        // Lets the renderer pick up the real surface size on the first tick.
        self.sender.send(PlatformEvent::Resized { width, height })?;
        self.running = true;
        Ok(())
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.receiver.try_recv().ok()
    }

    fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let dropped = self.receiver.try_iter().count();
        self.window = None;
        log::info!("Platform shut down ({dropped} pending events dropped).");
    }
}

/// The producer side of a [`WinitPlatform`] queue.
pub struct EventSink {
    translator: InputTranslator,
    sender: flume::Sender<PlatformEvent>,
}

impl EventSink {
    /// Translates and queues a window event.
    ///
    /// ## Returns
    /// `true` if the event was relevant to the engine and queued.
    pub fn push(&mut self, event: &WindowEvent) -> bool {
        let Some(event) = self.translator.translate(event) else {
            return false;
        };
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to queue platform event: {e}. Platform likely shut down.");
            return false;
        }
        true
    }
}
