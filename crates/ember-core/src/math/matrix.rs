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

//! Provides a column-major 4x4 matrix for projection and view transforms.

use super::{Vec3, EPSILON};
use std::ops::Mul;

/// A 4x4 column-major matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    /// The four columns of the matrix.
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a new matrix from four column arrays.
    #[inline]
    pub const fn from_cols(c0: [f32; 4], c1: [f32; 4], c2: [f32; 4], c3: [f32; 4]) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a right-handed perspective projection matrix with a [0, 1] depth range (ZO).
    ///
    /// Returns `None` when the clip planes or the aspect ratio are degenerate.
    pub fn perspective_rh_zo(
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Option<Self> {
        if z_near <= 0.0 || z_far <= z_near || aspect_ratio <= EPSILON {
            return None;
        }
        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let cc = z_far / (z_near - z_far);
        let dd = (z_near * z_far) / (z_near - z_far);

        Some(Self::from_cols(
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, cc, -1.0],
            [0.0, 0.0, dd, 0.0],
        ))
    }

    /// Creates a right-handed view matrix for a camera looking from `eye` towards `target`.
    ///
    /// Returns `None` if `eye` and `target` coincide or if `up` is parallel to
    /// the viewing direction.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let forward = target - eye;
        if forward.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let f = forward.normalize();
        let s = f.cross(up);
        if s.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let s = s.normalize();
        let u = s.cross(f);

        Some(Self::from_cols(
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0],
        ))
    }

    /// Returns the matrix as a flat column-major array.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, col) in self.cols.iter().enumerate() {
            out[c * 4..c * 4 + 4].copy_from_slice(col);
        }
        out
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut cols = [[0.0f32; 4]; 4];
        for (c, out) in cols.iter_mut().enumerate() {
            for (r, cell) in out.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Self { cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::degrees_to_radians;

    #[test]
    fn test_identity_multiplication() {
        let p = Mat4::perspective_rh_zo(degrees_to_radians(60.0), 16.0 / 9.0, 0.1, 100.0)
            .expect("valid projection");
        assert_eq!(Mat4::IDENTITY * p, p);
        assert_eq!(p * Mat4::IDENTITY, p);
    }

    #[test]
    fn test_perspective_rejects_degenerate_planes() {
        assert!(Mat4::perspective_rh_zo(1.0, 1.0, 0.0, 10.0).is_none());
        assert!(Mat4::perspective_rh_zo(1.0, 1.0, 10.0, 1.0).is_none());
        assert!(Mat4::perspective_rh_zo(1.0, 0.0, 0.1, 10.0).is_none());
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).expect("valid view");
        let t = view.cols[3];
        assert!((t[0]).abs() < EPSILON);
        assert!((t[1]).abs() < EPSILON);
        assert!((t[2] + 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_look_at_parallel_up_is_none() {
        assert!(Mat4::look_at_rh(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y).is_none());
    }

    #[test]
    fn test_to_cols_array_layout() {
        let arr = Mat4::IDENTITY.to_cols_array();
        assert_eq!(arr[0], 1.0);
        assert_eq!(arr[5], 1.0);
        assert_eq!(arr[1], 0.0);
        assert_eq!(arr[15], 1.0);
    }
}
