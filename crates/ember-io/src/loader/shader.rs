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
use crate::Shader;
use std::error::Error;

/// Loads shader source text. Compilation belongs to the render backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderLoader;

impl ResourceLoader for ShaderLoader {
    type Output = Shader;

    fn load(&self, bytes: &[u8]) -> Result<Shader, Box<dyn Error + Send + Sync>> {
        let source = std::str::from_utf8(bytes)?;
        if source.trim().is_empty() {
            return Err("Shader source is empty".into());
        }
        Ok(Shader::new(source.to_string()))
    }
}
