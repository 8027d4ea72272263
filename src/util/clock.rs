// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Frame clock. Replaces a process-wide "last frame" timestamp: each render
//! loop owns one and asks it for the frame rate.

use std::thread;
use std::time::{Duration, Instant};

/// default target framerate
pub const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Instant,
    tick_rate: Duration,
    fps: f32,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            last_tick: Instant::now(),
            tick_rate: Duration::from_nanos(1_000_000_000 / target_fps.max(1) as u64),
            fps: 0.0,
            frames: 0,
        }
    }

    /// Marks the end of a frame and returns the instantaneous frame rate,
    /// i.e. 1 / (time since previous tick). Returns 0.0 if no time passed.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let et = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.frames += 1;
        let dt = et.as_secs_f32();
        self.fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        self.fps
    }

    /// Frame rate measured by the last tick.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Time left in the current frame budget.
    pub fn remaining(&self) -> Duration {
        self.tick_rate
            .checked_sub(self.last_tick.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Sleeps out the rest of the frame budget, then ticks.
    pub fn wait_next_frame(&mut self) -> f32 {
        let left = self.remaining();
        if !left.is_zero() {
            thread::sleep(left);
        }
        self.tick()
    }
}
