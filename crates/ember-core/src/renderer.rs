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

//! Contract of the rendering backend as seen by the loop orchestrator.

use crate::math::Mat4;
use crate::Camera;

/// A rendering backend. The orchestrator only guarantees call ordering:
/// `init` once, then per frame `update`, draw submissions, `swap`.
pub trait RenderBackend {
    /// Creates the rendering context.
    fn init(&mut self) -> anyhow::Result<()>;

    /// Notifies the backend that the surface changed size.
    fn resize(&mut self, width: u32, height: u32);

    /// Prepares a frame for the given camera.
    fn update(&mut self, camera: &Camera);

    /// Current projection matrix.
    fn projection(&self) -> Mat4;

    /// Current view matrix.
    fn view(&self) -> Mat4;

    /// Presents the frame.
    fn swap(&mut self);

    /// Releases the rendering context.
    fn shutdown(&mut self) {}
}
