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

use crate::EngineContext;

/// Periodic frame statistics in the log.
///
/// Enabled through the `debug.overlay` config key (default on).
#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    enabled: bool,
    reports: u64,
}

impl DebugOverlay {
    /// Creates an overlay.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            reports: 0,
        }
    }

    /// Whether reports are written.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of reports written.
    pub fn reports(&self) -> u64 {
        self.reports
    }

    /// Writes one line of statistics. Called once per closed FPS window.
    pub fn report(&mut self, context: &EngineContext) {
        if !self.enabled {
            return;
        }
        let resources = context.resources().borrow().len();
        log::info!(
            target: "overlay",
            "FPS: {} | {:.1} ms | {} entities | {} resources",
            context.fps(),
            context.ms(),
            context.entity_count(),
            resources
        );
        self.reports += 1;
    }
}
