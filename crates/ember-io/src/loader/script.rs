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
use crate::Script;
use std::error::Error;
use std::path::Path;

/// Compiles a script module. The module records its file path as source name
/// so diagnostics point at the right file.
pub struct ScriptLoader<'a> {
    compiler: &'a rhai::Engine,
    source_name: String,
}

impl<'a> ScriptLoader<'a> {
    /// A loader compiling with `compiler`, naming modules after `path`.
    pub fn new(compiler: &'a rhai::Engine, path: &Path) -> Self {
        Self {
            compiler,
            source_name: path.display().to_string(),
        }
    }
}

impl ResourceLoader for ScriptLoader<'_> {
    type Output = Script;

    fn load(&self, bytes: &[u8]) -> Result<Script, Box<dyn Error + Send + Sync>> {
        let source = std::str::from_utf8(bytes)?;
        let mut ast = self
            .compiler
            .compile(source)
            .map_err(|e| e.to_string())?;
        ast.set_source(self.source_name.as_str());
        Ok(Script::new(source.to_string(), ast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_loader_compiles_functions() {
        let engine = rhai::Engine::new_raw();
        let script = ScriptLoader::new(&engine, Path::new("main.rhai"))
            .load(b"fn update() { 1 } fn draw(id) { id }")
            .unwrap();
        let ast = script.ast();
        let names: Vec<_> = ast
            .iter_functions()
            .map(|f| (f.name.to_string(), f.params.len()))
            .collect();
        assert!(names.contains(&("update".to_string(), 0)));
        assert!(names.contains(&("draw".to_string(), 1)));
    }

    #[test]
    fn test_script_loader_rejects_syntax_errors() {
        let engine = rhai::Engine::new_raw();
        let result = ScriptLoader::new(&engine, Path::new("bad.rhai")).load(b"fn update( {");
        assert!(result.is_err());
    }
}
