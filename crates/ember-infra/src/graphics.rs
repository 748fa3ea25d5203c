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

//! A render backend with no GPU behind it.

use ember_core::math::{degrees_to_radians, Mat4};
use ember_core::renderer::RenderBackend;
use ember_core::Camera;

const FOV_Y_DEGREES: f32 = 60.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

/// Computes camera matrices and counts presented frames.
///
/// Stands in for a GPU backend wherever only the loop's sequencing matters:
/// the runtime without a graphics stack, and tests.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    projection: Mat4,
    view: Mat4,
    frames: u64,
    initialized: bool,
}

impl HeadlessRenderer {
    /// Creates a renderer for a surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut renderer = Self {
            width,
            height,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            frames: 0,
            initialized: false,
        };
        renderer.update_projection();
        renderer
    }

    fn update_projection(&mut self) {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        // A zero-sized surface (minimised window) keeps the previous projection.
        if let Some(p) =
            Mat4::perspective_rh_zo(degrees_to_radians(FOV_Y_DEGREES), aspect, Z_NEAR, Z_FAR)
        {
            self.projection = p;
        }
    }

    /// Current surface size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

impl RenderBackend for HeadlessRenderer {
    fn init(&mut self) -> anyhow::Result<()> {
        log::info!(
            "Headless renderer initialized ({}x{}).",
            self.width,
            self.height
        );
        self.initialized = true;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Surface resized to {width}x{height}.");
        self.width = width;
        self.height = height;
        self.update_projection();
    }

    fn update(&mut self, camera: &Camera) {
        self.view = camera.view_matrix();
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn view(&self) -> Mat4 {
        self.view
    }

    fn swap(&mut self) {
        self.frames += 1;
    }

    fn shutdown(&mut self) {
        if self.initialized {
            log::info!("Headless renderer shut down after {} frames.", self.frames);
            self.initialized = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_projection_aspect() {
        let mut renderer = HeadlessRenderer::new(100, 100);
        let square = renderer.projection();
        renderer.resize(200, 100);
        let wide = renderer.projection();
        assert_eq!(renderer.size(), (200, 100));
        assert!((wide.cols[0][0] * 2.0 - square.cols[0][0]).abs() < 1e-5);
        assert_eq!(wide.cols[1][1], square.cols[1][1]);
    }

    #[test]
    fn zero_sized_surface_keeps_projection() {
        let mut renderer = HeadlessRenderer::new(100, 100);
        let before = renderer.projection();
        renderer.resize(0, 0);
        assert_eq!(renderer.projection(), before);
    }

    #[test]
    fn update_tracks_camera_and_swap_counts_frames() {
        let mut renderer = HeadlessRenderer::default();
        renderer.init().unwrap();
        let camera = Camera::default();
        renderer.update(&camera);
        assert_eq!(renderer.view(), camera.view_matrix());
        renderer.swap();
        renderer.swap();
        assert_eq!(renderer.frames(), 2);
    }
}
