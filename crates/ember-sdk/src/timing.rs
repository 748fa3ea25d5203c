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

//! Frame timing: the FPS window, the fixed-timestep accumulator and the
//! rolling frame-cost average.

/// Simulated seconds per fixed tick.
pub const FIXED_TICK: f64 = 0.032;

/// Number of frames averaged by [`FrameTimer::ms`].
pub const MS_FRAME_WINDOW: usize = 100;

const NANOS_PER_SECOND: f64 = 1e9;
const FIXED_TICK_NANOS: u64 = 32_000_000;
const MICROS_PER_MS: f64 = 1000.0;
/// Microseconds summed over the window that make up 0.1 ms of average.
const TENTH_MS_WINDOW_MICROS: u64 = 100 * MS_FRAME_WINDOW as u64;

/// Per-frame timing state of the loop.
///
/// The FPS window restarts from the duration of the frame that closed the
/// previous window rather than from zero, and that frame is not counted.
/// Reported values are therefore what the counter saw, not the true rate.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    fps: u32,
    fps_count: u32,
    fps_timer: f64,
    fps_windows: u64,
    accumulator_nanos: u64,
    max_ticks_per_frame: Option<u32>,
    ticks_this_frame: u32,
    dropped_ticks: u64,
    ms_frames: [u64; MS_FRAME_WINDOW],
    ms_index: usize,
}

impl FrameTimer {
    /// Creates a timer. `max_ticks_per_frame` bounds catch-up; `None` never drops time.
    ///
    /// A bound of zero would never advance the simulation and is treated as `None`.
    pub fn new(max_ticks_per_frame: Option<u32>) -> Self {
        if max_ticks_per_frame == Some(0) {
            log::warn!("A tick bound of 0 would stall the simulation, running unbounded instead.");
        }
        let max_ticks_per_frame = max_ticks_per_frame.filter(|&max| max > 0);
        Self {
            fps: 0,
            fps_count: 0,
            fps_timer: 0.0,
            fps_windows: 0,
            accumulator_nanos: 0,
            max_ticks_per_frame,
            ticks_this_frame: 0,
            dropped_ticks: 0,
            ms_frames: [0; MS_FRAME_WINDOW],
            ms_index: 0,
        }
    }

    /// Starts a frame that lasted `elapsed` seconds since the previous one.
    ///
    /// ## Returns
    /// `true` when this frame closed an FPS window and [`FrameTimer::fps`] changed.
    pub fn begin_frame(&mut self, elapsed: f64) -> bool {
        let rolled = if self.fps_timer >= 1.0 {
            self.fps = self.fps_count;
            self.fps_count = 0;
            self.fps_timer = elapsed;
            self.fps_windows += 1;
            true
        } else {
            self.fps_timer += elapsed;
            self.fps_count += 1;
            false
        };

        // Whole clock units keep k ticks of elapsed time worth exactly k ticks.
        self.accumulator_nanos += (elapsed.max(0.0) * NANOS_PER_SECOND).round() as u64;
        self.ticks_this_frame = 0;
        rolled
    }

    /// Takes one fixed tick out of the accumulator if a whole tick is available.
    ///
    /// When the frame's tick budget is spent, the whole-tick backlog is dropped,
    /// keeping only the sub-tick remainder, and `false` is returned.
    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator_nanos < FIXED_TICK_NANOS {
            return false;
        }
        if let Some(max) = self.max_ticks_per_frame {
            if self.ticks_this_frame >= max {
                let backlog = self.accumulator_nanos / FIXED_TICK_NANOS;
                self.accumulator_nanos %= FIXED_TICK_NANOS;
                self.dropped_ticks += backlog;
                log::warn!(
                    "Simulation is falling behind: dropped {backlog} ticks after running {max} this frame."
                );
                return false;
            }
        }
        self.accumulator_nanos -= FIXED_TICK_NANOS;
        self.ticks_this_frame += 1;
        true
    }

    /// Records the cost of a frame in milliseconds.
    pub fn record_frame_cost(&mut self, ms: f64) {
        self.ms_frames[self.ms_index] = (ms.max(0.0) * MICROS_PER_MS).round() as u64;
        self.ms_index = (self.ms_index + 1) % MS_FRAME_WINDOW;
    }

    /// Average frame cost over the window, rounded up to one decimal.
    pub fn ms(&self) -> f64 {
        let total: u64 = self.ms_frames.iter().sum();
        total.div_ceil(TENTH_MS_WINDOW_MICROS) as f64 / 10.0
    }

    /// Frames counted in the last closed FPS window.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Number of FPS windows closed so far.
    pub fn fps_windows(&self) -> u64 {
        self.fps_windows
    }

    /// Simulated time not yet consumed by a tick, in `[0, FIXED_TICK)` between frames.
    pub fn accumulator(&self) -> f64 {
        self.accumulator_nanos as f64 / NANOS_PER_SECOND
    }

    /// Ticks run since the current frame began.
    pub fn ticks_this_frame(&self) -> u32 {
        self.ticks_this_frame
    }

    /// Total number of ticks dropped by the catch-up bound.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(None)
    }
}
