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

//! Platform abstraction: the OS window and raw device event source.

/// A raw device or window event, already decoupled from the windowing library.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// The drawable surface changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// The mouse moved.
    MouseMotion {
        /// Absolute x position.
        x: f32,
        /// Absolute y position.
        y: f32,
        /// Horizontal delta since the previous motion event.
        dx: f32,
        /// Vertical delta since the previous motion event.
        dy: f32,
    },
    /// A key was pressed. `key` is a lowercase symbol such as `w` or `space`.
    KeyDown {
        /// The key symbol.
        key: String,
    },
    /// A key was released.
    KeyUp {
        /// The key symbol.
        key: String,
    },
    /// A mouse button was pressed. Buttons are numbered from 1 (left).
    MouseButtonDown {
        /// The button index.
        button: u8,
    },
    /// A mouse button was released.
    MouseButtonUp {
        /// The button index.
        button: u8,
    },
    /// The user asked to close the application.
    Quit,
}

/// The windowing and event-source collaborator of the engine.
pub trait Platform {
    /// Brings up the platform layer. Called first during engine init.
    fn init(&mut self) -> anyhow::Result<()>;

    /// Returns the next pending event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// Tears the platform layer down. Must tolerate repeated calls.
    fn shutdown(&mut self) {}
}
