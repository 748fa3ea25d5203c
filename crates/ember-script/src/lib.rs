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

//! # Ember Script
//!
//! Runs functions of compiled script modules on a persistent `rhai` engine.
//!
//! Native functions are installed from an explicit [`HostFunctions`] table when
//! the bridge is created. Native functions may call back into
//! [`ScriptBridge::run`]; every nested call executes in its own context slot
//! taken from a fixed-size pool.

#![warn(missing_docs)]

mod bridge;
mod error;
mod host;
mod pool;

pub use bridge::{MessageKind, ScriptBridge, WeakBridge, DEFAULT_POOL_SIZE};
pub use error::ScriptError;
pub use host::HostFunctions;

pub use rhai::{Array, Dynamic, EvalAltResult, ImmutableString, Map, FLOAT, INT};
