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

//! A physics backend that only accounts for simulated time.

use ember_core::physics::PhysicsBackend;

/// Counts steps and accumulates simulated time.
#[derive(Debug, Default, Clone)]
pub struct StepPhysics {
    steps: u64,
    simulated: f64,
}

impl StepPhysics {
    /// Creates the backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps taken.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total simulated time in seconds.
    pub fn simulated_time(&self) -> f64 {
        self.simulated
    }
}

impl PhysicsBackend for StepPhysics {
    fn init(&mut self) -> anyhow::Result<()> {
        log::info!("Step physics initialized.");
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        self.simulated += f64::from(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_accumulates_time() {
        let mut physics = StepPhysics::new();
        physics.init().unwrap();
        physics.step(0.032);
        physics.step(0.032);
        assert_eq!(physics.steps(), 2);
        assert!((physics.simulated_time() - 0.064).abs() < 1e-6);
    }
}
