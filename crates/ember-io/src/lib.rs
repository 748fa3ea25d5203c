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

//! # Ember IO
//!
//! The resource cache: a canonical-path-keyed, deduplicating store of loaded
//! resources with extension-based type dispatch and in-place hot reload.

#![warn(missing_docs)]

mod cache;
mod error;
pub mod loader;
mod resource;
mod watcher;

pub use cache::ResourceCache;
pub use error::ResourceError;
pub use resource::{
    Handle, Model, Resource, ResourceData, ResourceHandle, ResourceKind, ResourceType, Script,
    Shader, ShaderDependent, Sound, Texture,
};
