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

//! Per-kind decoders turning file bytes into resource payloads.

mod model;
mod script;
mod shader;
mod sound;
mod texture;

pub use model::ModelLoader;
pub use script::ScriptLoader;
pub use shader::ShaderLoader;
pub use sound::SoundLoader;
pub use texture::TextureLoader;

use crate::{ResourceData, ResourceError, ResourceKind};
use std::error::Error;
use std::path::Path;

/// Decodes raw bytes into a payload of type `Self::Output`.
pub trait ResourceLoader {
    /// The payload produced by this loader.
    type Output;

    /// Parses a byte slice into a payload.
    fn load(&self, bytes: &[u8]) -> Result<Self::Output, Box<dyn Error + Send + Sync>>;
}

/// Reads `path` and dispatches to the loader for `kind`.
///
/// ## Arguments
/// * `kind` - The kind chosen from the file extension.
/// * `path` - The file to read.
/// * `compiler` - The script engine used to compile script modules.
pub(crate) fn load_file(
    kind: ResourceKind,
    path: &Path,
    compiler: &rhai::Engine,
) -> Result<ResourceData, ResourceError> {
    let bytes = std::fs::read(path).map_err(|source| ResourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = match kind {
        ResourceKind::Texture => TextureLoader::for_path(path)
            .load(&bytes)
            .map(ResourceData::Texture),
        ResourceKind::Model => ModelLoader.load(&bytes).map(ResourceData::Model),
        ResourceKind::Shader => ShaderLoader.load(&bytes).map(ResourceData::Shader),
        ResourceKind::Sound => SoundLoader.load(&bytes).map(ResourceData::Sound),
        ResourceKind::Script => ScriptLoader::new(compiler, path)
            .load(&bytes)
            .map(ResourceData::Script),
    };

    decoded.map_err(|e| ResourceError::Decode {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}
