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

/// Errors raised by the resource cache.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The data root does not exist or cannot be resolved.
    #[error("Invalid data root '{}': {source}", .path.display())]
    InvalidRoot {
        /// The root that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but its contents could not be decoded.
    #[error("Failed to decode '{}': {details}", .path.display())]
    Decode {
        /// The file that failed to decode.
        path: PathBuf,
        /// Details from the decoder.
        details: String,
    },
}
