//! Frame clock for the demo loop
//!
//! The loop takes one step per frame. The step length feeds the screen update
//! (and through it the lore reveal); the totals are only reported on exit.
//! Every operation has an `_at` form taking the current instant so the
//! arithmetic can be checked without sleeping.

use std::time::{Duration, Instant};

/// Wall-clock steps between frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    last_tick: Instant,
    frames: u64,
}

impl FrameClock {
    /// Start counting from now
    pub fn start() -> Self {
        Self::start_at(Instant::now())
    }

    /// Start counting from `now`
    pub fn start_at(now: Instant) -> Self {
        Self {
            started: now,
            last_tick: now,
            frames: 0,
        }
    }

    /// Seconds since the previous tick (or since start), counting one frame
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Like [`tick`](Self::tick) with an explicit instant
    ///
    /// An instant earlier than the previous tick yields a zero step.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let step = now.saturating_duration_since(self.last_tick);
        self.last_tick = now.max(self.last_tick);
        self.frames += 1;
        step.as_secs_f32()
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time from start to the latest tick
    pub fn elapsed(&self) -> Duration {
        self.last_tick.duration_since(self.started)
    }

    /// Frames per second over [`elapsed`](Self::elapsed), 0 before any time has passed
    pub fn average_fps(&self) -> f32 {
        let seconds = self.elapsed().as_secs_f32();
        if seconds > 0.0 {
            self.frames as f32 / seconds
        } else {
            0.0
        }
    }
}
