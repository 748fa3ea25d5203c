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

//! Contract of the audio backend.

use crate::Camera;

/// An audio backend. The listener follows the camera.
pub trait AudioBackend {
    /// Opens the output device.
    fn init(&mut self) -> anyhow::Result<()>;

    /// Moves the listener to the camera pose. Called once per frame.
    fn update(&mut self, listener: &Camera);

    /// Closes the output device.
    fn shutdown(&mut self) {}
}
