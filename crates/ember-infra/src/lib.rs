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

//! # Ember Infra
//!
//! Concrete collaborators plugged into the engine: the `winit` platform
//! adapter, a headless render backend, a silent audio backend and a
//! step-counting physics backend. The backends keep just enough state to
//! honour the call-ordering contract of the loop and to be inspected.

#![warn(missing_docs)]

pub mod audio;
pub mod graphics;
pub mod physics;
pub mod platform;

pub use audio::SilentAudio;
pub use graphics::HeadlessRenderer;
pub use physics::StepPhysics;
pub use platform::{EventSink, InputTranslator, WinitPlatform, WinitWindow, WinitWindowBuilder};
