use std::time::Instant;

/// A frame longer than this (debugger pause, window drag) would let walkers
/// step through walls in a single update; clamp the delta instead.
const MAX_FRAME_DT: f32 = 0.1;

pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32().min(MAX_FRAME_DT);
        self.last = now;
    }
}
