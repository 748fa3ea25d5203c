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

use super::ResourceLoader;
use crate::Model;
use ahash::AHashMap;
use anyhow::Context;
use ember_core::math::Vec3;
use std::error::Error;

/// Loads Wavefront OBJ meshes. All objects in the file are merged into one
/// triangle list; materials are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelLoader;

impl ResourceLoader for ModelLoader {
    type Output = Model;

    fn load(&self, bytes: &[u8]) -> Result<Model, Box<dyn Error + Send + Sync>> {
        let obj_text = std::str::from_utf8(bytes).context("OBJ file is not valid UTF-8")?;

        let (models, _materials) = tobj::load_obj_buf(
            &mut std::io::Cursor::new(obj_text),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |_| Ok((Vec::new(), AHashMap::new())),
        )
        .context("Failed to parse OBJ file")?;

        if models.is_empty() {
            return Err("No models found in OBJ file".into());
        }

        let mut out = Model::default();
        for model in &models {
            let mesh = &model.mesh;
            let base = out.positions.len() as u32;

            out.positions
                .extend(mesh.positions.chunks_exact(3).map(|v| Vec3::new(v[0], v[1], v[2])));
            out.normals
                .extend(mesh.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
            out.uvs
                .extend(mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]));
            out.indices.extend(mesh.indices.iter().map(|i| base + i));
        }

        if let Some(first) = out.positions.first().copied() {
            let (min, max) = out
                .positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
            out.bbox_min = min;
            out.bbox_max = max;
        }
        out.num_tris = out.indices.len() / 3;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_OBJ: &str = "\
o quad
v -1.0 0.0 -1.0
v 1.0 0.0 -1.0
v 1.0 2.0 1.0
v -1.0 2.0 1.0
f 1 2 3 4
";

    #[test]
    fn test_obj_loader_triangulates_quad() {
        let model = ModelLoader.load(QUAD_OBJ.as_bytes()).unwrap();
        assert_eq!(model.positions.len(), 4);
        assert_eq!(model.num_tris, 2);
        assert_eq!(model.indices.len(), 6);
        assert_eq!(model.bbox_min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(model.bbox_max, Vec3::new(1.0, 2.0, 1.0));
        assert!(model.normals.is_empty());
    }

    #[test]
    fn test_obj_loader_invalid_utf8() {
        assert!(ModelLoader.load(&[0xff, 0xfe, 0x00]).is_err());
    }
}
