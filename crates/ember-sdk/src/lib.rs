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

//! # Ember SDK
//!
//! The loop orchestrator and everything it drives: frame timing and the
//! fixed-timestep accumulator, the entity layer, the input mapper and the
//! native functions exposed to scripts.
//!
//! An [`Engine`] is assembled with an [`EngineBuilder`], brought up with
//! [`Engine::init`], driven by calling [`Engine::update`] from the host event
//! loop until [`Engine::is_running`] turns false, and torn down with
//! [`Engine::shutdown`].

#![warn(missing_docs)]

mod bindings;
mod context;
mod engine;
mod entity;
mod error;
mod input;
mod overlay;
mod timing;

pub use context::EngineContext;
pub use engine::{Engine, EngineBuilder, EngineConfig};
pub use entity::{Entity, EntityId, EntityType, World};
pub use error::EngineError;
pub use input::{InputMapper, MouseState, MOUSE_BUTTONS};
pub use overlay::DebugOverlay;
pub use timing::{FrameTimer, FIXED_TICK, MS_FRAME_WINDOW};
