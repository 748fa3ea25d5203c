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

use ember_io::ResourceError;
use ember_script::ScriptError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the engine during initialization.
///
/// Every variant leaves the engine in the non-running state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The builder was given no platform.
    #[error("No platform was provided to the engine builder")]
    MissingPlatform,
    /// The platform layer failed to come up.
    #[error("Platform initialization failed: {0:#}")]
    Platform(anyhow::Error),
    /// The rendering context failed to come up.
    #[error("Renderer initialization failed: {0:#}")]
    Renderer(anyhow::Error),
    /// The data directory could not be used.
    #[error(transparent)]
    Resources(#[from] ResourceError),
    /// The audio device failed to open.
    #[error("Audio initialization failed: {0:#}")]
    Audio(anyhow::Error),
    /// The physics world failed to come up.
    #[error("Physics initialization failed: {0:#}")]
    Physics(anyhow::Error),
    /// The script engine failed to come up.
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// The main script is missing or does not compile.
    #[error("Main script '{}' not found", .0.display())]
    MainScriptMissing(PathBuf),
}
