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

//! # Ember Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! shared by every layer of the engine: the action bus, the platform and
//! backend contracts, the configuration store and the timing primitives.

#![warn(missing_docs)]

pub mod audio;
pub mod camera;
pub mod config;
pub mod event;
pub mod math;
pub mod physics;
pub mod platform;
pub mod renderer;
pub mod timer;

pub use camera::Camera;
pub use config::{Config, ConfigError};
pub use event::{ActionBus, ActionEvent};
pub use timer::{Clock, PerformanceClock};
