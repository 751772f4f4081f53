//! Frame timing utilities
//!
//! [`FrameTimer`] is fed absolute clock readings instead of sampling
//! [`Instant`] itself, so the game loop can drive it from the window clock
//! (`glfwGetTime`) and tests can drive it from a scripted one.

use std::time::{Duration, Instant};

/// Default upper bound for a single frame delta, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Timing snapshot handed to the per-frame hooks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame (clamped); drive game logic with this
    pub delta: f32,
    /// Seconds since the previous frame as measured by the clock (unclamped)
    pub clock_delta: f32,
    /// Game seconds accumulated since the loop started (sum of clamped deltas)
    pub elapsed: f64,
    /// Index of the current frame, starting at 1 for the first frame
    pub frame: u64,
}

/// Frame timer for the game loop
///
/// Keeps two notions of time: game time, built from deltas clamped to
/// `max_delta`, and clock time, the raw span since the timer started. Frame
/// rates are reported from clock time so a stall lowers them.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    start: f64,
    last_frame: f64,
    delta_time: f32,
    clock_delta: f32,
    total_time: f64,
    clock_time: f64,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_MAX_DELTA)
    }
}

impl FrameTimer {
    /// Create a timer whose first frame is measured from `now`
    pub fn new(now: f64, max_delta: f32) -> Self {
        Self {
            start: now,
            last_frame: now,
            delta_time: 0.0,
            clock_delta: 0.0,
            total_time: 0.0,
            clock_time: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }

    /// Restart measurement from `now`, dropping all accumulated state
    pub fn reset(&mut self, now: f64) {
        *self = Self::new(now, self.max_delta);
    }

    /// Advance the timer to `now` (call once per frame)
    ///
    /// Returns the snapshot for the new frame. A clock that went backwards
    /// produces a zero delta; a long stall is clamped to `max_delta`.
    pub fn update(&mut self, now: f64) -> FrameTime {
        let raw = (now - self.last_frame).max(0.0) as f32;
        self.clock_delta = raw;
        self.delta_time = raw.min(self.max_delta);
        self.total_time += f64::from(self.delta_time);
        self.clock_time = (now - self.start).max(self.clock_time);
        self.last_frame = now;
        self.frame_count += 1;
        self.frame_time()
    }

    /// Current snapshot
    pub fn frame_time(&self) -> FrameTime {
        FrameTime {
            delta: self.delta_time,
            clock_delta: self.clock_delta,
            elapsed: self.total_time,
            frame: self.frame_count,
        }
    }

    /// Get the clamped time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the game time accumulated since the timer started
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the clock time that passed between the start and the latest frame
    pub fn clock_time(&self) -> f64 {
        self.clock_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Largest delta a single frame may report
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Get the average FPS over clock time
    pub fn average_fps(&self) -> f32 {
        if self.clock_time > 0.0 {
            (self.frame_count as f64 / self.clock_time) as f32
        } else {
            0.0
        }
    }

    /// Get the current FPS from the unclamped last frame time
    pub fn current_fps(&self) -> f32 {
        if self.clock_delta > 0.0 {
            1.0 / self.clock_delta
        } else {
            0.0
        }
    }
}

/// Wall-clock stopwatch used to hold the frame cap
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start measuring now
    pub fn start_new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Measure from now on
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Wall time since the last start
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
