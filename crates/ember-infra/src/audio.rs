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

//! An audio backend that plays nothing.

use ember_core::audio::AudioBackend;
use ember_core::math::Vec3;
use ember_core::Camera;

/// Tracks the listener pose without opening an output device.
#[derive(Debug, Default, Clone)]
pub struct SilentAudio {
    listener: Vec3,
    updates: u64,
}

impl SilentAudio {
    /// Creates the backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last listener position.
    pub fn listener(&self) -> Vec3 {
        self.listener
    }

    /// Number of listener updates received.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl AudioBackend for SilentAudio {
    fn init(&mut self) -> anyhow::Result<()> {
        log::info!("Silent audio backend initialized.");
        Ok(())
    }

    fn update(&mut self, listener: &Camera) {
        self.listener = listener.position;
        self.updates += 1;
    }

    fn shutdown(&mut self) {
        log::debug!("Silent audio backend shut down.");
    }
}
