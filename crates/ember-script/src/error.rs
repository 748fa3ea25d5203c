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

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::ScriptBridge`].
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The pool must hold at least one context.
    #[error("Script context pool size must be at least 1")]
    InvalidPoolSize,
    /// The script resource is missing or failed to compile.
    #[error("Script module '{}' is not available", .path.display())]
    UnavailableModule {
        /// Path of the script resource.
        path: PathBuf,
    },
    /// No function with that name and arity exists in the module.
    #[error("Function '{function}' taking {arity} argument(s) not found in '{}'", .module.display())]
    FunctionNotFound {
        /// Path of the script resource.
        module: PathBuf,
        /// The requested function name.
        function: String,
        /// The requested arity.
        arity: usize,
    },
    /// All contexts were in use; the call chain was aborted.
    #[error("Script context pool exhausted, all {size} contexts are in use")]
    PoolExhausted {
        /// The pool size.
        size: usize,
    },
    /// The script raised an error. It has already been reported.
    #[error("Script error in '{function}' ({}): {message}", .module.display())]
    Runtime {
        /// Path of the script resource.
        module: PathBuf,
        /// The function that was running.
        function: String,
        /// The script engine's message.
        message: String,
    },
}

impl ScriptError {
    /// True for [`ScriptError::FunctionNotFound`]; callers treat optional
    /// entry points this way.
    pub fn is_missing_function(&self) -> bool {
        matches!(self, ScriptError::FunctionNotFound { .. })
    }
}
