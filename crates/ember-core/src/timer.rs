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

//! Performance-counter abstraction used for frame timing.

use std::time::Instant;

/// A monotonic tick source with a fixed frequency.
///
/// The orchestrator samples `counter()` at the start and end of every frame and
/// converts deltas to seconds with [`seconds_between`]. Tests substitute a
/// manually advanced clock.
pub trait Clock {
    /// Current counter value in ticks.
    fn counter(&self) -> u64;

    /// Number of ticks per second.
    fn frequency(&self) -> u64;
}

/// Converts a counter delta to seconds.
///
/// ## Arguments
/// * `start` - The earlier counter sample.
/// * `end` - The later counter sample.
/// * `frequency` - Ticks per second of the clock the samples come from.
///
/// ## Returns
/// The elapsed time in seconds, or `0.0` if the samples are out of order or the
/// frequency is zero.
#[inline]
pub fn seconds_between(start: u64, end: u64, frequency: u64) -> f64 {
    if frequency == 0 {
        return 0.0;
    }
    end.saturating_sub(start) as f64 / frequency as f64
}

/// A [`Clock`] backed by [`std::time::Instant`], counting nanoseconds.
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    origin: Instant,
}

impl PerformanceClock {
    /// Creates a clock whose counter starts at zero now.
    #[inline]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerformanceClock {
    #[inline]
    fn counter(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    #[inline]
    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn performance_clock_is_monotonic() {
        let clock = PerformanceClock::new();
        let a = clock.counter();
        thread::sleep(Duration::from_millis(20));
        let b = clock.counter();
        assert!(b > a);
        let secs = seconds_between(a, b, clock.frequency());
        assert!(secs >= 0.015, "elapsed {secs} is too short");
        assert!(secs < 1.0, "elapsed {secs} is too long");
    }

    #[test]
    fn seconds_between_handles_degenerate_input() {
        assert_eq!(seconds_between(10, 5, 1000), 0.0);
        assert_eq!(seconds_between(0, 5, 0), 0.0);
        assert_eq!(seconds_between(0, 500, 1000), 0.5);
    }
}
