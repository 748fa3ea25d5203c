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

//! A `winit` window wrapper and its builder.

use std::sync::Arc;
use winit::{dpi::LogicalSize, error::OsError, event_loop::ActiveEventLoop, window::Window};

/// A cheaply clonable handle to a `winit` window.
#[derive(Debug, Clone)]
pub struct WinitWindow {
    inner: Arc<Window>,
}

impl WinitWindow {
    /// Physical size of the drawable area.
    pub fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    /// Asks the OS for another redraw.
    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    /// Identifier used to route window events.
    pub fn id(&self) -> winit::window::WindowId {
        self.inner.id()
    }
}

/// A builder for [`WinitWindow`].
pub struct WinitWindowBuilder {
    title: String,
    width: u32,
    height: u32,
}

impl WinitWindowBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Ember".to_string(),
            width: 1024,
            height: 768,
        }
    }

    /// Sets the title of the window to be built.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial inner dimensions of the window to be built.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builds the window on the running event loop.
    ///
    /// # Errors
    /// Returns an `OsError` if the underlying `winit` window creation fails.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitWindow, OsError> {
        log::info!(
            "Building window '{}' ({}x{}).",
            self.title,
            self.width,
            self.height
        );

        let attributes = Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_visible(true);
        let window = event_loop.create_window(attributes)?;

        Ok(WinitWindow {
            inner: Arc::new(window),
        })
    }
}

impl Default for WinitWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
