//! Frame timing

use std::time::Instant;

/// Frame clock producing per-frame delta times
///
/// Measures wall-clock time between ticks, or hands out a constant step when
/// configured with a fixed delta (headless runs and tests).
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    fixed_delta: Option<f32>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock measuring real elapsed time
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            fixed_delta: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Create a clock that advances by `delta` seconds every tick
    pub fn fixed(delta: f32) -> Self {
        Self {
            fixed_delta: Some(delta),
            ..Self::new()
        }
    }

    /// Advance to the next frame and return its delta time in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = match self.fixed_delta {
            Some(delta) => delta,
            None => now.duration_since(self.last_frame).as_secs_f32(),
        };
        self.last_frame = now;
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Delta time of the most recent tick
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Sum of all deltas so far
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
