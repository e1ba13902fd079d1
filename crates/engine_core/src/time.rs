//! Frame timing for the render loop.

use std::time::Instant;

/// Tracks per-frame delta and total elapsed time.
///
/// `tick` reads the wall clock; `advance` steps by an explicit delta so
/// simulations can be driven deterministically (tests, replays).
#[derive(Debug, Clone)]
pub struct Clock {
    /// Time when the clock started.
    start_time: Instant,
    /// Duration of the last frame in seconds.
    delta: f32,
    /// Seconds since start.
    elapsed: f32,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            delta: 0.0,
            elapsed: 0.0,
        }
    }

    /// Sample the wall clock at the start of a new frame.
    pub fn tick(&mut self) {
        let now = self.start_time.elapsed().as_secs_f32();
        self.delta = (now - self.elapsed).max(0.0);
        self.elapsed = now;
    }

    /// Step the clock by a fixed delta instead of reading the wall clock.
    pub fn advance(&mut self, delta: f32) {
        self.delta = delta.max(0.0);
        self.elapsed += self.delta;
    }

    /// Delta time of the last frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    /// Total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }
}

/// Frames-per-second averaged over one-second windows.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: f32,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new(start_seconds: f32) -> Self {
        Self {
            window_start: start_seconds,
            frames: 0,
            fps: 0,
        }
    }

    /// Count one frame at `now_seconds`. Returns true when a new reading was produced.
    pub fn update(&mut self, now_seconds: f32) -> bool {
        self.frames += 1;
        let window = now_seconds - self.window_start;
        if window >= 1.0 {
            self.fps = (self.frames as f32 / window).round() as u32;
            self.window_start = now_seconds;
            self.frames = 0;
            return true;
        }
        false
    }

    /// Last completed reading.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}
