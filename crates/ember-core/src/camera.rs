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

//! A yaw/pitch camera shared by the orchestrator, the renderer and the audio listener.

use crate::math::{degrees_to_radians, Mat4, Vec3};

/// Pitch limit in degrees; keeps the forward vector away from the up axis.
const PITCH_LIMIT: f32 = 89.0;

/// A free-look camera. Angles are stored in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space position of the eye.
    pub position: Vec3,
    /// Rotation around the world Y axis, in degrees.
    pub yaw: f32,
    /// Downward tilt, in degrees. Positive values look down.
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 25.0),
            yaw: 0.0,
            pitch: 30.0,
        }
    }
}

impl Camera {
    /// Unit vector the camera looks along. Yaw 0 and pitch 0 look down -Z.
    pub fn forward(&self) -> Vec3 {
        let yaw = degrees_to_radians(self.yaw);
        let pitch = degrees_to_radians(self.pitch);
        Vec3::new(
            yaw.sin() * pitch.cos(),
            -pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
    }

    /// Adds the given deltas (degrees) to yaw and pitch, clamping pitch.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw) % 360.0;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Right-handed view matrix for the current pose.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
            .unwrap_or(Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    #[test]
    fn default_camera_looks_down_towards_origin() {
        let camera = Camera::default();
        let f = camera.forward();
        assert!(f.y < 0.0);
        assert!(f.z < 0.0);
        assert!((f.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn rotate_clamps_pitch() {
        let mut camera = Camera::default();
        camera.rotate(10.0, 500.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        assert_eq!(camera.yaw, 10.0);
        camera.rotate(0.0, -1000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn view_matrix_is_finite() {
        let view = Camera::default().view_matrix();
        assert!(view.to_cols_array().iter().all(|v| v.is_finite()));
        assert_ne!(view, Mat4::IDENTITY);
    }
}
