use std::time::{Duration, Instant};

/// Timing of a single frame as seen by the render loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameTiming {
    pub frame: u64,
    pub dt: Duration,
    /// milliseconds since the clock started, the shader's notion of time
    pub time_ms: f32,
}

/// Frame counter plus the bookkeeping the trace shader needs to decide how
/// much of the previous frame to keep.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    frame: u64,
    frames_since_change: u32,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            frame: 0,
            frames_since_change: 0,
        }
    }

    /// `now` earlier than the previous tick yields a zero delta
    pub fn tick(&mut self, now: Instant) -> FrameTiming {
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now.max(self.last_frame);
        self.frame += 1;

        FrameTiming {
            frame: self.frame,
            dt,
            time_ms: now.saturating_duration_since(self.start).as_secs_f32() * 1000.0,
        }
    }

    /// Returns how many frames of undisturbed history the current frame builds on.
    pub fn record(&mut self, changed: bool) -> u32 {
        if changed || self.frame <= 1 {
            self.frames_since_change = 0;
        } else {
            self.frames_since_change = self.frames_since_change.saturating_add(1);
        }
        self.frames_since_change
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
